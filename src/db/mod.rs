pub mod admin;
pub mod branches;
pub mod clients;
pub mod connection;
pub mod offers;
pub mod orders;
pub mod products;
pub mod promotions;
pub(crate) mod schema;
pub(crate) mod sequence;
pub mod sells;
pub mod shelves;
pub mod supermarkets;
pub mod suppliers;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod warehouses;

pub use admin::clear_all;
pub use branches::{
    add_branch, delete_branch_by_id, delete_branches_by_name, get_branch_by_id, list_branches,
    list_branches_by_supermarket,
};
pub use clients::{
    add_client, delete_client_by_id, delete_clients_by_name, get_client_by_id, list_clients,
    list_clients_by_name, list_clients_by_type,
};
pub use connection::{DbPool, init_db};
pub use offers::{add_offer, delete_offer, list_offers, suppliers_with_offer_counts};
pub use orders::{
    NewOrderArgs, add_order, add_suborder, delete_delivered_orders, delete_order_by_id,
    delete_suborder_by_order, get_order_by_id, get_suborder_by_order, list_orders,
    list_orders_by_branch, list_orders_by_delivery_date, list_orders_by_rating,
    list_orders_by_supplier, list_orders_by_supplier_and_branch, list_suborders,
    list_suborders_by_product, set_order_rating, set_order_status,
};
pub use products::{
    NewProductArgs, add_product, delete_product_by_id, delete_products_by_name, list_products,
    list_products_by_name,
};
pub use promotions::{NewPromotionArgs, add_promotion};
pub use sells::{add_sell, delete_sell, delete_sells_by_branch, delete_sells_by_product, list_sells};
pub use shelves::{
    add_shelf, delete_shelf_by_id, get_shelf_by_id, list_shelves, list_shelves_by_branch,
    restock_shelf,
};
pub use supermarkets::{
    add_supermarket, delete_supermarket_by_name, get_supermarket_by_name, list_supermarkets,
};
pub use suppliers::{
    add_supplier, delete_supplier_by_nit, delete_suppliers_by_name, list_suppliers,
    list_suppliers_by_name,
};
pub use warehouses::{
    add_warehouse, delete_warehouse_by_id, get_warehouse_by_id, list_warehouses,
    list_warehouses_by_branch, restock_warehouse,
};

/// Fixed number of units added by a restock operation.
pub const RESTOCK_DELTA: i64 = 10;
