use anyhow::Result;
use chrono::{ NaiveDate, Utc };

use crate::error::EcomError;

/// Path of the SQLite database, `ECOM_DB` or `./data/ecom.db`.
pub fn db_path() -> String {
	std::env::var("ECOM_DB").unwrap_or_else(|_| "./data/ecom.db".to_string())
}

/// Directory holding the source CSV files, `ECOM_DATA_DIR` or `./data`.
pub fn data_dir() -> String {
	std::env::var("ECOM_DATA_DIR").unwrap_or_else(|_| "./data".to_string())
}

/// The date the report is evaluated against: `REPORT_AS_OF` when set
/// (YYYY-MM-DD), otherwise today's UTC date.
pub fn report_as_of() -> Result<NaiveDate> {
	match std::env::var("REPORT_AS_OF") {
		Ok(raw) =>
			NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_|
				EcomError::InvalidAsOfDate(raw).into()
			),
		Err(_) => Ok(Utc::now().date_naive()),
	}
}
