use thiserror::Error;

#[derive(Debug, Error)]
pub enum EcomError {
	#[error("order_date {0:?} is not a recognized date or datetime")]
	MalformedOrderDate(String),

	#[error("invalid REPORT_AS_OF value {0:?}, expected YYYY-MM-DD")]
	InvalidAsOfDate(String),
}
