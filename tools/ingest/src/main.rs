use anyhow::Result;
mod ingest;

use crate::ingest::{ read_csv, SqliteIngest };
use common::config;
use common::models::{ Category, Customer, Order, Product, Review };
use std::path::{ Path, PathBuf };
use tracing::{ info, warn };

#[tokio::main]
async fn main() -> Result<()> {
	dotenvy::dotenv().ok();
	tracing_subscriber::fmt::init();

	let db_path = config::db_path();
	let data_dir = PathBuf::from(config::data_dir());

	let ingest = SqliteIngest::open(&db_path).await?;
	ingest.init().await?;
	info!("loading CSV data from {} into {}", data_dir.display(), db_path);

	let mut summary: Vec<(&str, usize)> = Vec::new();

	// Load in foreign key dependency order
	if let Some(path) = csv_path(&data_dir, "categories.csv") {
		let inserted = ingest.insert_categories(read_csv::<Category>(&path)?).await?;
		summary.push(("categories", inserted));
	}
	if let Some(path) = csv_path(&data_dir, "products.csv") {
		let inserted = ingest.insert_products(read_csv::<Product>(&path)?).await?;
		summary.push(("products", inserted));
	}
	if let Some(path) = csv_path(&data_dir, "customers.csv") {
		let inserted = ingest.insert_customers(read_csv::<Customer>(&path)?).await?;
		summary.push(("customers", inserted));
	}
	if let Some(path) = csv_path(&data_dir, "orders.csv") {
		let inserted = ingest.insert_orders(read_csv::<Order>(&path)?).await?;
		summary.push(("orders", inserted));
	}
	if let Some(path) = csv_path(&data_dir, "reviews.csv") {
		let inserted = ingest.insert_reviews(read_csv::<Review>(&path)?).await?;
		summary.push(("reviews", inserted));
	}

	info!("insertion summary:");
	for (table, inserted) in summary {
		info!("- {}: {} rows inserted", table, inserted);
	}

	Ok(())
}

fn csv_path(data_dir: &Path, file_name: &str) -> Option<PathBuf> {
	let path = data_dir.join(file_name);

	if path.exists() {
		Some(path)
	} else {
		warn!("{} not found, skipping", path.display());
		None
	}
}
