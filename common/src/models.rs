use chrono::NaiveDateTime;
use serde::{ Deserialize, Serialize };

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
	#[serde(rename = "ID")]
	pub id: i64,
	pub category_name: String,
	pub parent_category_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
	#[serde(rename = "ID")]
	pub id: i64,
	pub name: String,
	pub category: Option<i64>,
	pub price: Option<f64>,
	pub stock_quantity: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
	#[serde(rename = "ID")]
	pub id: i64,
	pub name: String,
	pub email: Option<String>,
	pub registration_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
	#[serde(rename = "ID")]
	pub id: i64,
	pub customer_id: Option<i64>,
	pub product_id: Option<i64>,
	pub order_date: Option<String>,
	pub quantity: Option<i64>,
	pub total_price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
	#[serde(rename = "ID")]
	pub id: i64,
	pub product_id: Option<i64>,
	pub customer_id: Option<i64>,
	pub rating: Option<i64>,
	pub review_text: Option<String>,
	pub review_date: Option<String>,
}

/// One row of the recent-orders report, fields in output column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
	pub customer_id: i64,
	pub customer_name: String,
	pub product_id: i64,
	pub product_name: String,
	pub order_date: NaiveDateTime,
	pub total_price: f64,
}
