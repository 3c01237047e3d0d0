pub mod dashboard;
pub mod database;
pub mod memory;
pub mod metrics;
pub mod store;

pub use dashboard::{load_month_snapshot, load_monthly_summary};
pub use database::Database;
pub use memory::MemoryStore;
pub use metrics::{get_metrics, init_metrics};
pub use store::FinanceStore;
