pub mod params;
pub mod user_id;

pub use params::{PathParam, QueryParams};
pub use user_id::UserId;
