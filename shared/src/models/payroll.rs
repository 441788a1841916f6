//! Payroll periods and payments

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Payroll period status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayrollStatus {
    Open,
    Finalized,
    Paid,
}

impl PayrollStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Finalized => "FINALIZED",
            Self::Paid => "PAID",
        }
    }
}

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Approved,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Paid => "PAID",
        }
    }
}

/// One week of an employer's payroll, `[starting_at, ending_at)`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PayrollPeriod {
    pub id: i64,
    pub employer_id: i64,
    pub starting_at: i64,
    pub ending_at: i64,
    pub status: PayrollStatus,
    pub total_hours: f64,
    pub total_amount: f64,
    pub created_at: i64,
}

/// Payment for a single clock-in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PayrollPayment {
    pub id: i64,
    pub period_id: i64,
    pub employee_id: i64,
    pub shift_id: i64,
    pub clockin_id: i64,
    pub regular_hours: f64,
    pub over_time: f64,
    pub breaktime_minutes: i64,
    pub hourly_rate: f64,
    pub total_amount: f64,
    pub status: PaymentStatus,
}

/// Period with its payments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollPeriodDetail {
    #[serde(flatten)]
    pub period: PayrollPeriod,
    pub payments: Vec<PayrollPayment>,
}

/// Employer edit of a payment (period must be OPEN)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PaymentUpdate {
    #[validate(range(min = 0.0, max = 168.0))]
    pub regular_hours: Option<f64>,
    #[validate(range(min = 0.0, max = 168.0))]
    pub over_time: Option<f64>,
    #[validate(range(min = 0, max = 1440))]
    pub breaktime_minutes: Option<i64>,
    #[validate(range(min = 0.0, max = 10000.0))]
    pub hourly_rate: Option<f64>,
}

/// Result of a generation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateResult {
    pub periods_created: usize,
    pub payments_created: usize,
    pub periods: Vec<PayrollPeriod>,
}

/// Period list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayrollQuery {
    pub status: Option<PayrollStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
