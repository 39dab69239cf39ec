use anyhow::Result;
mod sqlite_report;

use crate::sqlite_report::SqliteReportStore;
use common::{ config, report::recent_orders };
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
	dotenvy::dotenv().ok();
	tracing_subscriber::fmt::init();

	let db_path = config::db_path();
	let store = SqliteReportStore::open(&db_path).await?;

	let as_of = config::report_as_of()?;
	info!("building recent-orders report from {} as of {}", db_path, as_of);

	let rows = recent_orders(&store, as_of).await?;
	let stored = store.materialize(rows).await?;

	info!("inserted {} rows into report_output", stored);

	Ok(())
}
