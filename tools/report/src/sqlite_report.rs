use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use common::{
	models::ReportRow,
	report::{ parse_order_date, ReportSource },
};
use rusqlite::params;
use tokio_rusqlite::Connection as AsyncConnection;

pub struct SqliteReportStore {
	conn: AsyncConnection,
}

impl SqliteReportStore {
	pub async fn open(db_path: &str) -> Result<Self> {
		let conn = AsyncConnection::open(db_path).await?;

		conn.call(|conn| {
			conn.execute("PRAGMA foreign_keys = ON", [])?;
			Ok(())
		}).await?;

		Ok(Self { conn })
	}

	/// Rewrite the report_output table with the given rows, keeping their
	/// order, and return the row count of the new table.
	pub async fn materialize(&self, rows: Vec<ReportRow>) -> Result<usize> {
		let count = self.conn.call(move |conn| {
			let tx = conn.transaction()?;

			// Replace any output from a previous run
			tx.execute("DROP TABLE IF EXISTS report_output", [])?;
			tx.execute(
				"CREATE TABLE report_output (
                    customer_id INTEGER,
                    customer_name TEXT,
                    product_id INTEGER,
                    product_name TEXT,
                    order_date TEXT,
                    total_price REAL
                )",
				[]
			)?;

			for row in &rows {
				tx.execute(
					"INSERT INTO report_output (customer_id, customer_name, product_id, product_name, order_date, total_price) VALUES (?, ?, ?, ?, ?, ?)",
					params![
						row.customer_id,
						row.customer_name,
						row.product_id,
						row.product_name,
						row.order_date,
						row.total_price
					]
				)?;
			}

			tx.commit()?;

			let count: i64 = conn.query_row(
				"SELECT COUNT(*) FROM report_output",
				[],
				|row| row.get(0)
			)?;

			Ok(count as usize)
		}).await?;

		Ok(count)
	}
}

#[async_trait]
impl ReportSource for SqliteReportStore {
	async fn order_dates(&self) -> Result<Vec<NaiveDateTime>> {
		let raw_dates = self.conn.call(|conn| {
			let mut stmt = conn.prepare("SELECT order_date FROM orders")?;
			let dates: Vec<String> = stmt
				.query_map([], |row| row.get(0))?
				.collect::<Result<Vec<_>, _>>()?;

			Ok(dates)
		}).await?;

		let mut dates = Vec::with_capacity(raw_dates.len());
		for raw in raw_dates {
			dates.push(parse_order_date(&raw)?);
		}

		Ok(dates)
	}

	async fn joined_orders(&self) -> Result<Vec<ReportRow>> {
		let raw_rows = self.conn.call(|conn| {
			let query =
				"
				SELECT c.ID, c.name, p.ID, p.name, o.order_date, o.total_price
				FROM orders o
				JOIN customers c ON o.customer_id = c.ID
				JOIN products p ON o.product_id = p.ID
			";

			let mut stmt = conn.prepare(query)?;

			let rows: Vec<(i64, String, i64, String, String, f64)> = stmt
				.query_map([], |row| {
					Ok((
						row.get(0)?,
						row.get(1)?,
						row.get(2)?,
						row.get(3)?,
						row.get(4)?,
						row.get(5)?,
					))
				})?
				.collect::<Result<Vec<_>, _>>()?;

			Ok(rows)
		}).await?;

		let mut rows = Vec::with_capacity(raw_rows.len());
		for (customer_id, customer_name, product_id, product_name, raw_date, total_price) in raw_rows {
			rows.push(ReportRow {
				customer_id,
				customer_name,
				product_id,
				product_name,
				order_date: parse_order_date(&raw_date)?,
				total_price,
			});
		}

		Ok(rows)
	}
}
