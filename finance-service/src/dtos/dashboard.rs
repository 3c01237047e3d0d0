use serde::{Deserialize, Serialize};
use service_core::error::AppError;

use crate::analytics::MonthlySummary;
use crate::models::Month;

#[derive(Debug, Default, Deserialize)]
pub struct MonthParams {
    /// `YYYY-MM`; the current UTC month when absent.
    pub month: Option<String>,
}

impl MonthParams {
    pub fn month(&self) -> Result<Month, AppError> {
        parse_month(self.month.as_deref())
    }
}

pub(crate) fn parse_month(raw: Option<&str>) -> Result<Month, AppError> {
    match raw {
        None => Ok(Month::current()),
        Some(raw) => raw
            .parse()
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("{}", e))),
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub month: Month,
    #[serde(flatten)]
    pub summary: MonthlySummary,
}
