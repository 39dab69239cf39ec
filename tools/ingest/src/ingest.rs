use anyhow::Result;
use common::models::{ Category, Customer, Order, Product, Review };
use rusqlite::params;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio_rusqlite::Connection as AsyncConnection;

pub struct SqliteIngest {
	conn: AsyncConnection,
}

/// Read every record of a CSV file into typed rows.
pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
	let mut reader = csv::Reader::from_path(path)?;
	let mut rows = Vec::new();

	for record in reader.deserialize() {
		rows.push(record?);
	}

	Ok(rows)
}

fn table_count(conn: &rusqlite::Connection, table: &str) -> Result<i64, rusqlite::Error> {
	conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
}

impl SqliteIngest {
	pub async fn open(db_path: &str) -> Result<Self> {
		// Make sure the database directory exists
		if let Some(parent) = Path::new(db_path).parent() {
			if !parent.as_os_str().is_empty() && !parent.exists() {
				std::fs::create_dir_all(parent)?;
			}
		}

		let conn = AsyncConnection::open(db_path).await?;

		conn.call(|conn| {
			conn.execute("PRAGMA foreign_keys = ON", [])?;
			Ok(())
		}).await?;

		Ok(Self { conn })
	}

	pub async fn init(&self) -> Result<()> {
		self.conn.call(|conn| {
			// Create categories table
			conn.execute(
				"CREATE TABLE IF NOT EXISTS categories (
                    ID INTEGER PRIMARY KEY,
                    category_name TEXT NOT NULL,
                    parent_category_id INTEGER,
                    FOREIGN KEY (parent_category_id) REFERENCES categories (ID)
                )",
				[]
			)?;

			// Create products table
			conn.execute(
				"CREATE TABLE IF NOT EXISTS products (
                    ID INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    category INTEGER,
                    price REAL,
                    stock_quantity INTEGER,
                    FOREIGN KEY (category) REFERENCES categories (ID)
                )",
				[]
			)?;

			// Create customers table
			conn.execute(
				"CREATE TABLE IF NOT EXISTS customers (
                    ID INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    email TEXT,
                    registration_date TEXT
                )",
				[]
			)?;

			// Create orders table with foreign keys
			conn.execute(
				"CREATE TABLE IF NOT EXISTS orders (
                    ID INTEGER PRIMARY KEY,
                    customer_id INTEGER,
                    product_id INTEGER,
                    order_date TEXT,
                    quantity INTEGER,
                    total_price REAL,
                    FOREIGN KEY (customer_id) REFERENCES customers (ID),
                    FOREIGN KEY (product_id) REFERENCES products (ID)
                )",
				[]
			)?;

			// Create reviews table with foreign keys
			conn.execute(
				"CREATE TABLE IF NOT EXISTS reviews (
                    ID INTEGER PRIMARY KEY,
                    product_id INTEGER,
                    customer_id INTEGER,
                    rating INTEGER,
                    review_text TEXT,
                    review_date TEXT,
                    FOREIGN KEY (product_id) REFERENCES products (ID),
                    FOREIGN KEY (customer_id) REFERENCES customers (ID)
                )",
				[]
			)?;

			Ok(())
		}).await?;

		Ok(())
	}

	pub async fn insert_categories(&self, rows: Vec<Category>) -> Result<usize> {
		self.conn.call(move |conn| {
			let before = table_count(conn, "categories")?;

			let tx = conn.transaction()?;
			for row in &rows {
				tx.execute(
					"INSERT OR IGNORE INTO categories (ID, category_name, parent_category_id) VALUES (?, ?, ?)",
					params![row.id, row.category_name, row.parent_category_id]
				)?;
			}
			tx.commit()?;

			let after = table_count(conn, "categories")?;
			Ok((after - before) as usize)
		}).await.map_err(anyhow::Error::from)
	}

	pub async fn insert_products(&self, rows: Vec<Product>) -> Result<usize> {
		self.conn.call(move |conn| {
			let before = table_count(conn, "products")?;

			let tx = conn.transaction()?;
			for row in &rows {
				tx.execute(
					"INSERT OR IGNORE INTO products (ID, name, category, price, stock_quantity) VALUES (?, ?, ?, ?, ?)",
					params![row.id, row.name, row.category, row.price, row.stock_quantity]
				)?;
			}
			tx.commit()?;

			let after = table_count(conn, "products")?;
			Ok((after - before) as usize)
		}).await.map_err(anyhow::Error::from)
	}

	pub async fn insert_customers(&self, rows: Vec<Customer>) -> Result<usize> {
		self.conn.call(move |conn| {
			let before = table_count(conn, "customers")?;

			let tx = conn.transaction()?;
			for row in &rows {
				tx.execute(
					"INSERT OR IGNORE INTO customers (ID, name, email, registration_date) VALUES (?, ?, ?, ?)",
					params![row.id, row.name, row.email, row.registration_date]
				)?;
			}
			tx.commit()?;

			let after = table_count(conn, "customers")?;
			Ok((after - before) as usize)
		}).await.map_err(anyhow::Error::from)
	}

	pub async fn insert_orders(&self, rows: Vec<Order>) -> Result<usize> {
		self.conn.call(move |conn| {
			let before = table_count(conn, "orders")?;

			let tx = conn.transaction()?;
			for row in &rows {
				tx.execute(
					"INSERT OR IGNORE INTO orders (ID, customer_id, product_id, order_date, quantity, total_price) VALUES (?, ?, ?, ?, ?, ?)",
					params![
						row.id,
						row.customer_id,
						row.product_id,
						row.order_date,
						row.quantity,
						row.total_price
					]
				)?;
			}
			tx.commit()?;

			let after = table_count(conn, "orders")?;
			Ok((after - before) as usize)
		}).await.map_err(anyhow::Error::from)
	}

	pub async fn insert_reviews(&self, rows: Vec<Review>) -> Result<usize> {
		self.conn.call(move |conn| {
			let before = table_count(conn, "reviews")?;

			let tx = conn.transaction()?;
			for row in &rows {
				tx.execute(
					"INSERT OR IGNORE INTO reviews (ID, product_id, customer_id, rating, review_text, review_date) VALUES (?, ?, ?, ?, ?, ?)",
					params![
						row.id,
						row.product_id,
						row.customer_id,
						row.rating,
						row.review_text,
						row.review_date
					]
				)?;
			}
			tx.commit()?;

			let after = table_count(conn, "reviews")?;
			Ok((after - before) as usize)
		}).await.map_err(anyhow::Error::from)
	}
}
