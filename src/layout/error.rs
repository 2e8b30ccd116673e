use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("{what} {value} is out of range (expected {min}..={max})")]
    OutOfRange {
        what: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("booking {id} checks out on {check_out} which is not after check-in {check_in}")]
    InvalidBookingRange {
        id: String,
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
}

pub type LayoutResult<T> = Result<T, LayoutError>;
