use anyhow::Result;
use async_trait::async_trait;
use chrono::{ DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime };

use crate::error::EcomError;
use crate::models::ReportRow;

/// Orders whose calendar date falls within this many days of the as-of
/// date count as recent.
pub const RECENT_WINDOW_DAYS: i64 = 30;

#[async_trait]
pub trait ReportSource {
	/// Every order_date in the orders relation, whether or not the order
	/// joins to a customer and a product.
	async fn order_dates(&self) -> Result<Vec<NaiveDateTime>>;

	/// Orders inner-joined to their customer and product rows. Orders with
	/// a dangling customer_id or product_id are silently excluded.
	async fn joined_orders(&self) -> Result<Vec<ReportRow>>;
}

/// First day (inclusive) of the recency window ending at `as_of`.
pub fn window_start(as_of: NaiveDate) -> NaiveDate {
	as_of - Duration::days(RECENT_WINDOW_DAYS)
}

/// Build the recent-orders report as of the given date.
///
/// When at least one row of the orders relation is recent, the report
/// keeps only the recent joined orders; when none is, the filter is
/// bypassed and every joined order is reported. The cutoff comparison
/// looks at the calendar date only, never the time of day.
///
/// Rows come back newest calendar date first. Rows sharing a date keep
/// whatever order the source returned them in, which is unspecified.
pub async fn recent_orders<S: ReportSource + Sync>(
	source: &S,
	as_of: NaiveDate
) -> Result<Vec<ReportRow>> {
	let cutoff = window_start(as_of);

	// Counted once, over all orders, before the join
	let recent_count = source
		.order_dates().await?
		.iter()
		.filter(|date| date.date() >= cutoff)
		.count();

	let mut rows = source.joined_orders().await?;
	if recent_count > 0 {
		rows.retain(|row| row.order_date.date() >= cutoff);
	}

	rows.sort_by(|a, b| b.order_date.date().cmp(&a.order_date.date()));

	Ok(rows)
}

// Accepted datetime forms, most common in the data first
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse an order_date TEXT value as stored in the database.
///
/// Accepts `YYYY-MM-DD HH:MM:SS[.fff]` with a space or `T` separator,
/// RFC 3339 (normalized to UTC), and bare `YYYY-MM-DD` at midnight.
pub fn parse_order_date(raw: &str) -> Result<NaiveDateTime, EcomError> {
	let raw = raw.trim();

	for format in DATETIME_FORMATS {
		if let Ok(date_time) = NaiveDateTime::parse_from_str(raw, format) {
			return Ok(date_time);
		}
	}

	if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
		return Ok(date_time.naive_utc());
	}

	if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
		return Ok(date.and_time(NaiveTime::MIN));
	}

	Err(EcomError::MalformedOrderDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;

	struct FakeSource {
		rows: Vec<ReportRow>,
		dangling_dates: Vec<NaiveDateTime>,
	}

	#[async_trait]
	impl ReportSource for FakeSource {
		async fn order_dates(&self) -> Result<Vec<NaiveDateTime>> {
			let mut dates: Vec<NaiveDateTime> = self.rows
				.iter()
				.map(|row| row.order_date)
				.collect();
			dates.extend(self.dangling_dates.iter().copied());
			Ok(dates)
		}

		async fn joined_orders(&self) -> Result<Vec<ReportRow>> {
			Ok(self.rows.clone())
		}
	}

	fn source(rows: Vec<ReportRow>) -> FakeSource {
		FakeSource { rows, dangling_dates: Vec::new() }
	}

	fn row(customer_id: i64, date: &str) -> ReportRow {
		ReportRow {
			customer_id,
			customer_name: format!("Customer {}", customer_id),
			product_id: customer_id + 100,
			product_name: format!("Product {}", customer_id + 100),
			order_date: parse_order_date(date).unwrap(),
			total_price: 9.99,
		}
	}

	fn date(raw: &str) -> NaiveDate {
		NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
	}

	#[tokio::test]
	async fn keeps_only_recent_orders_when_any_are_recent() {
		let source = source(
			vec![row(1, "2024-02-25 10:00:00"), row(2, "2024-01-01 10:00:00")]
		);

		let rows = recent_orders(&source, date("2024-03-01")).await.unwrap();

		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0].customer_id, 1);
	}

	#[tokio::test]
	async fn reports_everything_when_nothing_is_recent() {
		let source = source(
			vec![row(1, "2019-03-14 09:00:00"), row(2, "2019-11-02 16:30:00")]
		);

		let rows = recent_orders(&source, date("2024-06-01")).await.unwrap();

		assert_eq!(rows.len(), 2);
		assert_eq!(rows[0].customer_id, 2);
		assert_eq!(rows[1].customer_id, 1);
	}

	#[tokio::test]
	async fn cutoff_compares_calendar_dates_only() {
		// Exactly 30 days before the as-of date, late in the day
		let source = source(vec![row(1, "2024-01-31 23:59:59")]);

		let rows = recent_orders(&source, date("2024-03-01")).await.unwrap();

		assert_eq!(rows.len(), 1);
	}

	#[tokio::test]
	async fn newest_date_comes_first() {
		let source = source(
			vec![
				row(1, "2024-02-10 08:00:00"),
				row(2, "2024-02-28 08:00:00"),
				row(3, "2024-02-19 08:00:00")
			]
		);

		let rows = recent_orders(&source, date("2024-03-01")).await.unwrap();

		let ids: Vec<i64> = rows
			.iter()
			.map(|row| row.customer_id)
			.collect();
		assert_eq!(ids, vec![2, 3, 1]);
	}

	#[tokio::test]
	async fn dangling_recent_order_still_arms_the_filter() {
		// The only recent order never joins, so the report comes back
		// empty instead of falling back to the old orders
		let source = FakeSource {
			rows: vec![row(1, "2019-05-05 12:00:00")],
			dangling_dates: vec![parse_order_date("2024-02-28 12:00:00").unwrap()],
		};

		let rows = recent_orders(&source, date("2024-03-01")).await.unwrap();

		assert!(rows.is_empty());
	}

	#[tokio::test]
	async fn single_old_order_survives_through_the_fallback() {
		let order = row(1, "2024-01-01 00:00:00");

		// Within the window: the order is reported as recent
		let recent = recent_orders(&source(vec![order.clone()]), date("2024-01-05")).await.unwrap();
		assert_eq!(recent, vec![order.clone()]);

		// A year later the order is stale, but it is the only one, so the
		// fallback reports it anyway
		let stale = recent_orders(&source(vec![order.clone()]), date("2025-01-05")).await.unwrap();
		assert_eq!(stale, vec![order]);
	}

	#[test]
	fn accepts_common_datetime_forms() {
		let expected = date("2024-01-01").and_hms_opt(9, 30, 0).unwrap();

		assert_eq!(parse_order_date("2024-01-01 09:30:00").unwrap(), expected);
		assert_eq!(parse_order_date("2024-01-01T09:30:00").unwrap(), expected);
		assert_eq!(parse_order_date("2024-01-01T09:30:00Z").unwrap(), expected);
		assert_eq!(
			parse_order_date("2024-01-01").unwrap(),
			date("2024-01-01").and_time(NaiveTime::MIN)
		);
	}

	#[test]
	fn rejects_unparseable_order_dates() {
		let error = parse_order_date("next tuesday").unwrap_err();

		match error {
			EcomError::MalformedOrderDate(raw) => assert_eq!(raw, "next tuesday"),
			other => panic!("unexpected error: {:?}", other),
		}
	}
}
