//! Domain facade over the persistence layer.
//!
//! `SuperAndes` owns the shared connection pool and the configured table names,
//! both injected at construction. Every method is a thin delegation to the
//! matching `db` function; logging lives down there.

use crate::config::TableNames;
use crate::db::{self, DbPool};
use crate::errors::Result;
use crate::models::{
    Branch, Client, Offer, Order, Product, Promotion, Sell, Shelf, SubOrder, Supermarket,
    Supplier, Warehouse,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub use crate::db::orders::NewOrderArgs;
pub use crate::db::products::NewProductArgs;
pub use crate::db::promotions::NewPromotionArgs;

/// Entry point for every domain operation.
#[derive(Clone)]
pub struct SuperAndes {
    pool: DbPool,
    tables: Arc<TableNames>,
}

impl SuperAndes {
    pub fn new(pool: DbPool, tables: TableNames) -> Self {
        Self {
            pool,
            tables: Arc::new(tables),
        }
    }

    // Supermarkets

    pub async fn add_supermarket(&self, name: &str) -> Result<Supermarket> {
        db::add_supermarket(&self.pool, &self.tables, name).await
    }

    pub async fn delete_supermarket_by_name(&self, name: &str) -> Result<usize> {
        db::delete_supermarket_by_name(&self.pool, &self.tables, name).await
    }

    pub async fn get_supermarket_by_name(&self, name: &str) -> Result<Option<Supermarket>> {
        db::get_supermarket_by_name(&self.pool, &self.tables, name).await
    }

    pub async fn list_supermarkets(&self) -> Result<Vec<Supermarket>> {
        db::list_supermarkets(&self.pool, &self.tables).await
    }

    // Branches

    #[allow(clippy::too_many_arguments)]
    pub async fn add_branch(
        &self,
        name: &str,
        city: &str,
        address: &str,
        market_segment: &str,
        floor_area: i64,
        supermarket: &str,
    ) -> Result<Branch> {
        db::add_branch(
            &self.pool,
            &self.tables,
            name,
            city,
            address,
            market_segment,
            floor_area,
            supermarket,
        )
        .await
    }

    pub async fn delete_branch_by_id(&self, id: i64) -> Result<usize> {
        db::delete_branch_by_id(&self.pool, &self.tables, id).await
    }

    pub async fn delete_branches_by_name(&self, name: &str) -> Result<usize> {
        db::delete_branches_by_name(&self.pool, &self.tables, name).await
    }

    pub async fn get_branch_by_id(&self, id: i64) -> Result<Option<Branch>> {
        db::get_branch_by_id(&self.pool, &self.tables, id).await
    }

    pub async fn list_branches_by_supermarket(&self, supermarket: &str) -> Result<Vec<Branch>> {
        db::list_branches_by_supermarket(&self.pool, &self.tables, supermarket).await
    }

    pub async fn list_branches(&self) -> Result<Vec<Branch>> {
        db::list_branches(&self.pool, &self.tables).await
    }

    // Products

    pub async fn add_product(&self, args: &NewProductArgs<'_>) -> Result<Product> {
        db::add_product(&self.pool, &self.tables, args).await
    }

    pub async fn delete_products_by_name(&self, name: &str) -> Result<usize> {
        db::delete_products_by_name(&self.pool, &self.tables, name).await
    }

    pub async fn delete_product_by_id(&self, id: i64) -> Result<usize> {
        db::delete_product_by_id(&self.pool, &self.tables, id).await
    }

    pub async fn list_products_by_name(&self, name: &str) -> Result<Vec<Product>> {
        db::list_products_by_name(&self.pool, &self.tables, name).await
    }

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        db::list_products(&self.pool, &self.tables).await
    }

    // Warehouses

    pub async fn add_warehouse(
        &self,
        volume_capacity: f64,
        weight_capacity: f64,
        stock: i64,
        product_id: i64,
        branch_id: i64,
    ) -> Result<Warehouse> {
        db::add_warehouse(
            &self.pool,
            &self.tables,
            volume_capacity,
            weight_capacity,
            stock,
            product_id,
            branch_id,
        )
        .await
    }

    pub async fn delete_warehouse_by_id(&self, id: i64) -> Result<usize> {
        db::delete_warehouse_by_id(&self.pool, &self.tables, id).await
    }

    pub async fn get_warehouse_by_id(&self, id: i64) -> Result<Option<Warehouse>> {
        db::get_warehouse_by_id(&self.pool, &self.tables, id).await
    }

    pub async fn list_warehouses_by_branch(&self, branch_id: i64) -> Result<Vec<Warehouse>> {
        db::list_warehouses_by_branch(&self.pool, &self.tables, branch_id).await
    }

    pub async fn list_warehouses(&self) -> Result<Vec<Warehouse>> {
        db::list_warehouses(&self.pool, &self.tables).await
    }

    /// Adds the fixed restock delta to a warehouse's stock.
    pub async fn restock_warehouse(&self, id: i64) -> Result<usize> {
        db::restock_warehouse(&self.pool, &self.tables, id).await
    }

    // Shelves

    #[allow(clippy::too_many_arguments)]
    pub async fn add_shelf(
        &self,
        volume_capacity: f64,
        weight_capacity: f64,
        stock: i64,
        product_id: i64,
        branch_id: i64,
        restock_threshold: i64,
    ) -> Result<Shelf> {
        db::add_shelf(
            &self.pool,
            &self.tables,
            volume_capacity,
            weight_capacity,
            stock,
            product_id,
            branch_id,
            restock_threshold,
        )
        .await
    }

    pub async fn delete_shelf_by_id(&self, id: i64) -> Result<usize> {
        db::delete_shelf_by_id(&self.pool, &self.tables, id).await
    }

    pub async fn get_shelf_by_id(&self, id: i64) -> Result<Option<Shelf>> {
        db::get_shelf_by_id(&self.pool, &self.tables, id).await
    }

    pub async fn list_shelves_by_branch(&self, branch_id: i64) -> Result<Vec<Shelf>> {
        db::list_shelves_by_branch(&self.pool, &self.tables, branch_id).await
    }

    pub async fn list_shelves(&self) -> Result<Vec<Shelf>> {
        db::list_shelves(&self.pool, &self.tables).await
    }

    /// Adds the fixed restock delta to a shelf's stock.
    pub async fn restock_shelf(&self, id: i64) -> Result<usize> {
        db::restock_shelf(&self.pool, &self.tables, id).await
    }

    // Suppliers

    pub async fn add_supplier(&self, name: &str, rating: i64) -> Result<Supplier> {
        db::add_supplier(&self.pool, &self.tables, name, rating).await
    }

    pub async fn delete_suppliers_by_name(&self, name: &str) -> Result<usize> {
        db::delete_suppliers_by_name(&self.pool, &self.tables, name).await
    }

    pub async fn delete_supplier_by_nit(&self, nit: i64) -> Result<usize> {
        db::delete_supplier_by_nit(&self.pool, &self.tables, nit).await
    }

    pub async fn list_suppliers_by_name(&self, name: &str) -> Result<Vec<Supplier>> {
        db::list_suppliers_by_name(&self.pool, &self.tables, name).await
    }

    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>> {
        db::list_suppliers(&self.pool, &self.tables).await
    }

    // Orders and sub-orders

    /// Creates an order and its sub-order line in one transaction.
    pub async fn add_order(&self, args: &NewOrderArgs<'_>) -> Result<Order> {
        db::add_order(&self.pool, &self.tables, args).await
    }

    pub async fn add_suborder(
        &self,
        product_id: i64,
        quantity: i64,
        cost: f64,
    ) -> Result<SubOrder> {
        db::add_suborder(&self.pool, &self.tables, product_id, quantity, cost).await
    }

    pub async fn delete_order_by_id(&self, id: i64) -> Result<usize> {
        db::delete_order_by_id(&self.pool, &self.tables, id).await
    }

    pub async fn delete_suborder_by_order(&self, order_id: i64) -> Result<usize> {
        db::delete_suborder_by_order(&self.pool, &self.tables, order_id).await
    }

    pub async fn delete_delivered_orders(&self) -> Result<usize> {
        db::delete_delivered_orders(&self.pool, &self.tables).await
    }

    pub async fn get_order_by_id(&self, id: i64) -> Result<Option<Order>> {
        db::get_order_by_id(&self.pool, &self.tables, id).await
    }

    pub async fn get_suborder_by_order(&self, order_id: i64) -> Result<Option<SubOrder>> {
        db::get_suborder_by_order(&self.pool, &self.tables, order_id).await
    }

    pub async fn list_orders_by_branch(&self, branch_id: i64) -> Result<Vec<Order>> {
        db::list_orders_by_branch(&self.pool, &self.tables, branch_id).await
    }

    pub async fn list_orders_by_supplier(&self, supplier_id: i64) -> Result<Vec<Order>> {
        db::list_orders_by_supplier(&self.pool, &self.tables, supplier_id).await
    }

    pub async fn list_orders_by_supplier_and_branch(
        &self,
        supplier_id: i64,
        branch_id: i64,
    ) -> Result<Vec<Order>> {
        db::list_orders_by_supplier_and_branch(&self.pool, &self.tables, supplier_id, branch_id)
            .await
    }

    pub async fn list_orders_by_rating(&self, rating: i64) -> Result<Vec<Order>> {
        db::list_orders_by_rating(&self.pool, &self.tables, rating).await
    }

    pub async fn list_orders_by_delivery_date(
        &self,
        delivery_date: DateTime<Utc>,
    ) -> Result<Vec<Order>> {
        db::list_orders_by_delivery_date(&self.pool, &self.tables, delivery_date).await
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        db::list_orders(&self.pool, &self.tables).await
    }

    pub async fn list_suborders_by_product(&self, product_id: i64) -> Result<Vec<SubOrder>> {
        db::list_suborders_by_product(&self.pool, &self.tables, product_id).await
    }

    pub async fn list_suborders(&self) -> Result<Vec<SubOrder>> {
        db::list_suborders(&self.pool, &self.tables).await
    }

    pub async fn set_order_status(&self, id: i64, status: &str) -> Result<usize> {
        db::set_order_status(&self.pool, &self.tables, id, status).await
    }

    pub async fn set_order_rating(&self, id: i64, rating: i64) -> Result<usize> {
        db::set_order_rating(&self.pool, &self.tables, id, rating).await
    }

    // Offers

    pub async fn add_offer(&self, product_id: i64, supplier_id: i64, cost: f64) -> Result<Offer> {
        db::add_offer(&self.pool, &self.tables, product_id, supplier_id, cost).await
    }

    pub async fn delete_offer(&self, product_id: i64, supplier_id: i64) -> Result<usize> {
        db::delete_offer(&self.pool, &self.tables, product_id, supplier_id).await
    }

    pub async fn list_offers(&self) -> Result<Vec<Offer>> {
        db::list_offers(&self.pool, &self.tables).await
    }

    /// (supplier id, offered product count) pairs for every supplier with offers.
    pub async fn suppliers_with_offer_counts(&self) -> Result<Vec<(i64, i64)>> {
        db::suppliers_with_offer_counts(&self.pool, &self.tables).await
    }

    // Clients

    pub async fn add_client(
        &self,
        name: &str,
        email: &str,
        client_type: &str,
        address: &str,
    ) -> Result<Client> {
        db::add_client(&self.pool, &self.tables, name, email, client_type, address).await
    }

    pub async fn delete_client_by_id(&self, id: i64) -> Result<usize> {
        db::delete_client_by_id(&self.pool, &self.tables, id).await
    }

    pub async fn delete_clients_by_name(&self, name: &str) -> Result<usize> {
        db::delete_clients_by_name(&self.pool, &self.tables, name).await
    }

    pub async fn get_client_by_id(&self, id: i64) -> Result<Option<Client>> {
        db::get_client_by_id(&self.pool, &self.tables, id).await
    }

    pub async fn list_clients_by_name(&self, name: &str) -> Result<Vec<Client>> {
        db::list_clients_by_name(&self.pool, &self.tables, name).await
    }

    pub async fn list_clients_by_type(&self, client_type: &str) -> Result<Vec<Client>> {
        db::list_clients_by_type(&self.pool, &self.tables, client_type).await
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        db::list_clients(&self.pool, &self.tables).await
    }

    // Promotions

    /// Creates a promotion and its synthetic product in one transaction.
    pub async fn add_promotion(&self, args: &NewPromotionArgs<'_>) -> Result<Promotion> {
        db::add_promotion(&self.pool, &self.tables, args).await
    }

    // Sells

    pub async fn add_sell(
        &self,
        branch_id: i64,
        product_id: i64,
        reorder_level: i64,
        unit_price: f64,
        unit_of_measure_price: f64,
    ) -> Result<Sell> {
        db::add_sell(
            &self.pool,
            &self.tables,
            branch_id,
            product_id,
            reorder_level,
            unit_price,
            unit_of_measure_price,
        )
        .await
    }

    pub async fn delete_sell(&self, branch_id: i64, product_id: i64) -> Result<usize> {
        db::delete_sell(&self.pool, &self.tables, branch_id, product_id).await
    }

    pub async fn delete_sells_by_branch(&self, branch_id: i64) -> Result<usize> {
        db::delete_sells_by_branch(&self.pool, &self.tables, branch_id).await
    }

    pub async fn delete_sells_by_product(&self, product_id: i64) -> Result<usize> {
        db::delete_sells_by_product(&self.pool, &self.tables, product_id).await
    }

    pub async fn list_sells(&self) -> Result<Vec<Sell>> {
        db::list_sells(&self.pool, &self.tables).await
    }

    // Admin

    /// Wipes every entity table, returning the per-table deletion counts.
    pub async fn clear_all(&self) -> Result<[usize; 14]> {
        db::clear_all(&self.pool, &self.tables).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{init_test_tracing, setup_test_db};
    use crate::errors::Result;

    async fn setup_store() -> Result<SuperAndes> {
        let (pool, tables) = setup_test_db().await?;
        Ok(SuperAndes::new(pool, tables))
    }

    #[tokio::test]
    async fn test_facade_delegates_to_persistence() -> Result<()> {
        init_test_tracing();
        let store = setup_store().await?;

        let market = store.add_supermarket("Exito").await?;
        assert_eq!(market.name, "Exito");

        let branch = store
            .add_branch("Centro", "Bogota", "Cl 1 #2-3", "mid", 1200, "Exito")
            .await?;
        assert_eq!(
            store.list_branches_by_supermarket("Exito").await?,
            vec![branch.clone()]
        );

        assert_eq!(store.delete_branch_by_id(branch.id).await?, 1);
        assert_eq!(store.delete_supermarket_by_name("Exito").await?, 1);
        assert!(store.list_supermarkets().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_facade_clear_all() -> Result<()> {
        init_test_tracing();
        let store = setup_store().await?;

        store.add_supermarket("Exito").await?;
        store.add_client("A", "a@x.co", "person", "x").await?;
        let counts = store.clear_all().await?;
        assert_eq!(counts.iter().sum::<usize>(), 2);
        assert!(store.list_clients().await?.is_empty());
        Ok(())
    }
}
