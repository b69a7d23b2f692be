//! Value objects returned by the persistence layer.
//!
//! All of these are flat records carrying foreign keys as plain fields; relations
//! are resolved by querying other tables, never by in-memory references. Create
//! operations echo these back from the caller's arguments (the row is not
//! re-read), so a returned object reflects the inputs, not database-side defaults.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A supermarket chain, identified by its unique name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supermarket {
    pub name: String,
}

/// A branch of a supermarket. The owning supermarket is referenced by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub address: String,
    pub market_segment: String,
    /// Floor area in square meters
    pub floor_area: i64,
    pub supermarket: String,
}

/// A product sold by the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub presentation: String,
    pub barcode: String,
    pub unit_of_measure: String,
    pub category: String,
    pub subtype: String,
}

/// Warehouse space of a branch, holding stock of a single product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: i64,
    /// Capacity in cubic meters
    pub volume_capacity: f64,
    /// Capacity in kilograms
    pub weight_capacity: f64,
    pub stock: i64,
    pub product_id: i64,
    pub branch_id: i64,
}

/// Shelf space of a branch, holding stock of a single product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shelf {
    pub id: i64,
    pub volume_capacity: f64,
    pub weight_capacity: f64,
    pub stock: i64,
    pub product_id: i64,
    pub branch_id: i64,
    /// Minimum shelf stock before pulling units from the warehouse
    pub restock_threshold: i64,
}

/// A supplier, identified by its tax id (nit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub nit: i64,
    pub name: String,
    pub rating: i64,
}

/// A purchase order placed by a branch with a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub supplier_id: i64,
    pub branch_id: i64,
    pub delivery_date: DateTime<Utc>,
    /// Free-text state label, see [`ORDER_PENDING`] and [`ORDER_DELIVERED`]
    pub status: String,
    pub quantity: i64,
    pub rating: i64,
    pub total_cost: f64,
}

/// Status label for an order that has been placed but not delivered.
pub const ORDER_PENDING: &str = "pending";
/// Status label for an order that has been delivered.
pub const ORDER_DELIVERED: &str = "delivered";

/// Product line of a purchase order; shares the order's generated id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubOrder {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub cost: f64,
}

/// Many-to-many link stating a supplier offers a product at a unit cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub product_id: i64,
    pub supplier_id: i64,
    pub cost: f64,
}

/// A client of the chain, either a person or a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// "person" or "company"
    pub client_type: String,
    pub address: String,
}

/// A time-bounded promotion on a synthetic product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: i64,
    pub price: f64,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub available_units: i64,
    pub product_id: i64,
}

/// Relation stating a branch sells a product at given prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sell {
    pub branch_id: i64,
    pub product_id: i64,
    pub reorder_level: i64,
    pub unit_price: f64,
    pub unit_of_measure_price: f64,
}
