//! Explicit command surface for front ends.
//!
//! Each operation the domain exposes is a data-carrying enum variant, resolved
//! to its handler by a plain `match`. A front end builds a `Command` (by hand or
//! deserialized from JSON) and gets back a serializable `Outcome`.

use crate::errors::Result;
use crate::store::{NewOrderArgs, NewProductArgs, NewPromotionArgs, SuperAndes};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Product fields carried by the commands that create one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,
    pub brand: String,
    pub presentation: String,
    pub barcode: String,
    pub unit_of_measure: String,
    pub category: String,
    pub subtype: String,
}

impl ProductFields {
    fn as_args(&self) -> NewProductArgs<'_> {
        NewProductArgs {
            name: &self.name,
            brand: &self.brand,
            presentation: &self.presentation,
            barcode: &self.barcode,
            unit_of_measure: &self.unit_of_measure,
            category: &self.category,
            subtype: &self.subtype,
        }
    }
}

/// One variant per domain operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    AddSupermarket { name: String },
    DeleteSupermarketByName { name: String },
    GetSupermarketByName { name: String },
    ListSupermarkets,

    AddBranch {
        name: String,
        city: String,
        address: String,
        market_segment: String,
        floor_area: i64,
        supermarket: String,
    },
    DeleteBranchById { id: i64 },
    DeleteBranchesByName { name: String },
    GetBranchById { id: i64 },
    ListBranchesBySupermarket { supermarket: String },
    ListBranches,

    AddProduct { product: ProductFields },
    DeleteProductsByName { name: String },
    DeleteProductById { id: i64 },
    ListProductsByName { name: String },
    ListProducts,

    AddWarehouse {
        volume_capacity: f64,
        weight_capacity: f64,
        stock: i64,
        product_id: i64,
        branch_id: i64,
    },
    DeleteWarehouseById { id: i64 },
    GetWarehouseById { id: i64 },
    ListWarehousesByBranch { branch_id: i64 },
    ListWarehouses,
    RestockWarehouse { id: i64 },

    AddShelf {
        volume_capacity: f64,
        weight_capacity: f64,
        stock: i64,
        product_id: i64,
        branch_id: i64,
        restock_threshold: i64,
    },
    DeleteShelfById { id: i64 },
    GetShelfById { id: i64 },
    ListShelvesByBranch { branch_id: i64 },
    ListShelves,
    RestockShelf { id: i64 },

    AddSupplier { name: String, rating: i64 },
    DeleteSuppliersByName { name: String },
    DeleteSupplierByNit { nit: i64 },
    ListSuppliersByName { name: String },
    ListSuppliers,

    AddOrder {
        supplier_id: i64,
        branch_id: i64,
        delivery_date: DateTime<Utc>,
        status: String,
        quantity: i64,
        rating: i64,
        total_cost: f64,
        product_id: i64,
        sub_quantity: i64,
        sub_cost: f64,
    },
    AddSuborder { product_id: i64, quantity: i64, cost: f64 },
    DeleteOrderById { id: i64 },
    DeleteSuborderByOrder { order_id: i64 },
    DeleteDeliveredOrders,
    GetOrderById { id: i64 },
    GetSuborderByOrder { order_id: i64 },
    ListOrdersByBranch { branch_id: i64 },
    ListOrdersBySupplier { supplier_id: i64 },
    ListOrdersBySupplierAndBranch { supplier_id: i64, branch_id: i64 },
    ListOrdersByRating { rating: i64 },
    ListOrdersByDeliveryDate { delivery_date: DateTime<Utc> },
    ListOrders,
    ListSubordersByProduct { product_id: i64 },
    ListSuborders,
    SetOrderStatus { id: i64, status: String },
    SetOrderRating { id: i64, rating: i64 },

    AddOffer { product_id: i64, supplier_id: i64, cost: f64 },
    DeleteOffer { product_id: i64, supplier_id: i64 },
    ListOffers,
    SuppliersWithOfferCounts,

    AddClient {
        name: String,
        email: String,
        client_type: String,
        address: String,
    },
    DeleteClientById { id: i64 },
    DeleteClientsByName { name: String },
    GetClientById { id: i64 },
    ListClientsByName { name: String },
    ListClientsByType { client_type: String },
    ListClients,

    AddPromotion {
        product: ProductFields,
        price: f64,
        description: String,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        available_units: i64,
    },

    AddSell {
        branch_id: i64,
        product_id: i64,
        reorder_level: i64,
        unit_price: f64,
        unit_of_measure_price: f64,
    },
    DeleteSell { branch_id: i64, product_id: i64 },
    DeleteSellsByBranch { branch_id: i64 },
    DeleteSellsByProduct { product_id: i64 },
    ListSells,

    ClearAll,
}

/// What an executed command hands back to the front end.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Outcome {
    /// Created entity, echoed field-for-field
    Record(Value),
    /// Single lookup, `null` when nothing matched
    MaybeRecord(Option<Value>),
    Records(Vec<Value>),
    RowCount(usize),
    /// Per-table counts from a full wipe, in deletion order
    ClearCounts([usize; 14]),
    OfferCounts(Vec<(i64, i64)>),
}

fn record<T: Serialize>(value: T) -> Result<Outcome> {
    Ok(Outcome::Record(serde_json::to_value(value)?))
}

fn maybe<T: Serialize>(value: Option<T>) -> Result<Outcome> {
    Ok(Outcome::MaybeRecord(
        value.map(serde_json::to_value).transpose()?,
    ))
}

fn records<T: Serialize>(values: Vec<T>) -> Result<Outcome> {
    Ok(Outcome::Records(
        values
            .into_iter()
            .map(serde_json::to_value)
            .collect::<serde_json::Result<_>>()?,
    ))
}

/// Resolves a command to its store method and wraps the result.
pub async fn dispatch(store: &SuperAndes, command: Command) -> Result<Outcome> {
    debug!(?command, "Dispatching command");
    match command {
        Command::AddSupermarket { name } => record(store.add_supermarket(&name).await?),
        Command::DeleteSupermarketByName { name } => {
            Ok(Outcome::RowCount(store.delete_supermarket_by_name(&name).await?))
        }
        Command::GetSupermarketByName { name } => {
            maybe(store.get_supermarket_by_name(&name).await?)
        }
        Command::ListSupermarkets => records(store.list_supermarkets().await?),

        Command::AddBranch {
            name,
            city,
            address,
            market_segment,
            floor_area,
            supermarket,
        } => record(
            store
                .add_branch(&name, &city, &address, &market_segment, floor_area, &supermarket)
                .await?,
        ),
        Command::DeleteBranchById { id } => {
            Ok(Outcome::RowCount(store.delete_branch_by_id(id).await?))
        }
        Command::DeleteBranchesByName { name } => {
            Ok(Outcome::RowCount(store.delete_branches_by_name(&name).await?))
        }
        Command::GetBranchById { id } => maybe(store.get_branch_by_id(id).await?),
        Command::ListBranchesBySupermarket { supermarket } => {
            records(store.list_branches_by_supermarket(&supermarket).await?)
        }
        Command::ListBranches => records(store.list_branches().await?),

        Command::AddProduct { product } => record(store.add_product(&product.as_args()).await?),
        Command::DeleteProductsByName { name } => {
            Ok(Outcome::RowCount(store.delete_products_by_name(&name).await?))
        }
        Command::DeleteProductById { id } => {
            Ok(Outcome::RowCount(store.delete_product_by_id(id).await?))
        }
        Command::ListProductsByName { name } => records(store.list_products_by_name(&name).await?),
        Command::ListProducts => records(store.list_products().await?),

        Command::AddWarehouse {
            volume_capacity,
            weight_capacity,
            stock,
            product_id,
            branch_id,
        } => record(
            store
                .add_warehouse(volume_capacity, weight_capacity, stock, product_id, branch_id)
                .await?,
        ),
        Command::DeleteWarehouseById { id } => {
            Ok(Outcome::RowCount(store.delete_warehouse_by_id(id).await?))
        }
        Command::GetWarehouseById { id } => maybe(store.get_warehouse_by_id(id).await?),
        Command::ListWarehousesByBranch { branch_id } => {
            records(store.list_warehouses_by_branch(branch_id).await?)
        }
        Command::ListWarehouses => records(store.list_warehouses().await?),
        Command::RestockWarehouse { id } => {
            Ok(Outcome::RowCount(store.restock_warehouse(id).await?))
        }

        Command::AddShelf {
            volume_capacity,
            weight_capacity,
            stock,
            product_id,
            branch_id,
            restock_threshold,
        } => record(
            store
                .add_shelf(
                    volume_capacity,
                    weight_capacity,
                    stock,
                    product_id,
                    branch_id,
                    restock_threshold,
                )
                .await?,
        ),
        Command::DeleteShelfById { id } => {
            Ok(Outcome::RowCount(store.delete_shelf_by_id(id).await?))
        }
        Command::GetShelfById { id } => maybe(store.get_shelf_by_id(id).await?),
        Command::ListShelvesByBranch { branch_id } => {
            records(store.list_shelves_by_branch(branch_id).await?)
        }
        Command::ListShelves => records(store.list_shelves().await?),
        Command::RestockShelf { id } => Ok(Outcome::RowCount(store.restock_shelf(id).await?)),

        Command::AddSupplier { name, rating } => {
            record(store.add_supplier(&name, rating).await?)
        }
        Command::DeleteSuppliersByName { name } => {
            Ok(Outcome::RowCount(store.delete_suppliers_by_name(&name).await?))
        }
        Command::DeleteSupplierByNit { nit } => {
            Ok(Outcome::RowCount(store.delete_supplier_by_nit(nit).await?))
        }
        Command::ListSuppliersByName { name } => {
            records(store.list_suppliers_by_name(&name).await?)
        }
        Command::ListSuppliers => records(store.list_suppliers().await?),

        Command::AddOrder {
            supplier_id,
            branch_id,
            delivery_date,
            status,
            quantity,
            rating,
            total_cost,
            product_id,
            sub_quantity,
            sub_cost,
        } => record(
            store
                .add_order(&NewOrderArgs {
                    supplier_id,
                    branch_id,
                    delivery_date,
                    status: &status,
                    quantity,
                    rating,
                    total_cost,
                    product_id,
                    sub_quantity,
                    sub_cost,
                })
                .await?,
        ),
        Command::AddSuborder {
            product_id,
            quantity,
            cost,
        } => record(store.add_suborder(product_id, quantity, cost).await?),
        Command::DeleteOrderById { id } => {
            Ok(Outcome::RowCount(store.delete_order_by_id(id).await?))
        }
        Command::DeleteSuborderByOrder { order_id } => {
            Ok(Outcome::RowCount(store.delete_suborder_by_order(order_id).await?))
        }
        Command::DeleteDeliveredOrders => {
            Ok(Outcome::RowCount(store.delete_delivered_orders().await?))
        }
        Command::GetOrderById { id } => maybe(store.get_order_by_id(id).await?),
        Command::GetSuborderByOrder { order_id } => {
            maybe(store.get_suborder_by_order(order_id).await?)
        }
        Command::ListOrdersByBranch { branch_id } => {
            records(store.list_orders_by_branch(branch_id).await?)
        }
        Command::ListOrdersBySupplier { supplier_id } => {
            records(store.list_orders_by_supplier(supplier_id).await?)
        }
        Command::ListOrdersBySupplierAndBranch {
            supplier_id,
            branch_id,
        } => records(
            store
                .list_orders_by_supplier_and_branch(supplier_id, branch_id)
                .await?,
        ),
        Command::ListOrdersByRating { rating } => {
            records(store.list_orders_by_rating(rating).await?)
        }
        Command::ListOrdersByDeliveryDate { delivery_date } => {
            records(store.list_orders_by_delivery_date(delivery_date).await?)
        }
        Command::ListOrders => records(store.list_orders().await?),
        Command::ListSubordersByProduct { product_id } => {
            records(store.list_suborders_by_product(product_id).await?)
        }
        Command::ListSuborders => records(store.list_suborders().await?),
        Command::SetOrderStatus { id, status } => {
            Ok(Outcome::RowCount(store.set_order_status(id, &status).await?))
        }
        Command::SetOrderRating { id, rating } => {
            Ok(Outcome::RowCount(store.set_order_rating(id, rating).await?))
        }

        Command::AddOffer {
            product_id,
            supplier_id,
            cost,
        } => record(store.add_offer(product_id, supplier_id, cost).await?),
        Command::DeleteOffer {
            product_id,
            supplier_id,
        } => Ok(Outcome::RowCount(
            store.delete_offer(product_id, supplier_id).await?,
        )),
        Command::ListOffers => records(store.list_offers().await?),
        Command::SuppliersWithOfferCounts => Ok(Outcome::OfferCounts(
            store.suppliers_with_offer_counts().await?,
        )),

        Command::AddClient {
            name,
            email,
            client_type,
            address,
        } => record(store.add_client(&name, &email, &client_type, &address).await?),
        Command::DeleteClientById { id } => {
            Ok(Outcome::RowCount(store.delete_client_by_id(id).await?))
        }
        Command::DeleteClientsByName { name } => {
            Ok(Outcome::RowCount(store.delete_clients_by_name(&name).await?))
        }
        Command::GetClientById { id } => maybe(store.get_client_by_id(id).await?),
        Command::ListClientsByName { name } => records(store.list_clients_by_name(&name).await?),
        Command::ListClientsByType { client_type } => {
            records(store.list_clients_by_type(&client_type).await?)
        }
        Command::ListClients => records(store.list_clients().await?),

        Command::AddPromotion {
            product,
            price,
            description,
            start_date,
            end_date,
            available_units,
        } => record(
            store
                .add_promotion(&NewPromotionArgs {
                    product: product.as_args(),
                    price,
                    description: &description,
                    start_date,
                    end_date,
                    available_units,
                })
                .await?,
        ),

        Command::AddSell {
            branch_id,
            product_id,
            reorder_level,
            unit_price,
            unit_of_measure_price,
        } => record(
            store
                .add_sell(
                    branch_id,
                    product_id,
                    reorder_level,
                    unit_price,
                    unit_of_measure_price,
                )
                .await?,
        ),
        Command::DeleteSell {
            branch_id,
            product_id,
        } => Ok(Outcome::RowCount(
            store.delete_sell(branch_id, product_id).await?,
        )),
        Command::DeleteSellsByBranch { branch_id } => {
            Ok(Outcome::RowCount(store.delete_sells_by_branch(branch_id).await?))
        }
        Command::DeleteSellsByProduct { product_id } => {
            Ok(Outcome::RowCount(store.delete_sells_by_product(product_id).await?))
        }
        Command::ListSells => records(store.list_sells().await?),

        Command::ClearAll => Ok(Outcome::ClearCounts(store.clear_all().await?)),
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
    async fn test_dispatch_supermarket_round() -> Result<()> {
        init_test_tracing();
        let store = setup_store().await?;

        let created = dispatch(
            &store,
            Command::AddSupermarket {
                name: "Exito".to_string(),
            },
        )
        .await?;
        match created {
            Outcome::Record(value) => assert_eq!(value["name"], "Exito"),
            other => panic!("Expected a record, got {:?}", other),
        }

        let found = dispatch(
            &store,
            Command::GetSupermarketByName {
                name: "Nowhere".to_string(),
            },
        )
        .await?;
        assert!(matches!(found, Outcome::MaybeRecord(None)));

        let deleted = dispatch(
            &store,
            Command::DeleteSupermarketByName {
                name: "Exito".to_string(),
            },
        )
        .await?;
        assert!(matches!(deleted, Outcome::RowCount(1)));
        Ok(())
    }

    #[tokio::test]
    async fn test_command_deserializes_from_json() -> Result<()> {
        init_test_tracing();
        let store = setup_store().await?;

        let command: Command = serde_json::from_str(
            r#"{"op": "add_client", "name": "Maria", "email": "m@x.co",
                "client_type": "person", "address": "Cl 1"}"#,
        )?;
        let outcome = dispatch(&store, command).await?;
        match outcome {
            Outcome::Record(value) => {
                assert_eq!(value["name"], "Maria");
                assert!(value["id"].as_i64().unwrap() > 0);
            }
            other => panic!("Expected a record, got {:?}", other),
        }

        let listed = dispatch(&store, Command::ListClients).await?;
        assert!(matches!(listed, Outcome::Records(v) if v.len() == 1));
        Ok(())
    }
}
