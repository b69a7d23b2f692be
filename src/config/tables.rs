//! Table-name mapping configuration.
//!
//! The physical schema's table names are an indirection layer: every SQL string in
//! the persistence layer goes through [`TableNames`], so the same code can run
//! against differently-named schemas. The original system took the names as a
//! positional 15-element list, where a list of the wrong shape silently remapped
//! every accessor; here the configuration is a typed struct with named fields, and
//! the legacy positional form is only accepted through a length-checked bridge.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Number of configured names: the sequence plus the 14 entity tables.
pub const TABLE_COUNT: usize = 15;

/// Physical names of the shared sequence and the 14 entity tables.
///
/// Field order is the documented positional order of the legacy configuration
/// list (index 0 = sequence, 1..=14 = tables).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableNames {
    pub sequence: String,
    pub supermarket: String,
    pub branch: String,
    pub product: String,
    pub warehouse: String,
    pub shelf: String,
    pub sells: String,
    pub supplier: String,
    pub order: String,
    pub suborder: String,
    pub offers: String,
    pub client: String,
    pub invoice: String,
    pub promotion: String,
    pub sale: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            sequence: "superandes_sequence".to_string(),
            supermarket: "SUPERMARKET".to_string(),
            branch: "BRANCH".to_string(),
            product: "PRODUCT".to_string(),
            warehouse: "WAREHOUSE".to_string(),
            shelf: "SHELF".to_string(),
            sells: "SELLS".to_string(),
            supplier: "SUPPLIER".to_string(),
            order: "PURCHASE_ORDER".to_string(),
            suborder: "SUBORDER".to_string(),
            offers: "OFFERS".to_string(),
            client: "CLIENT".to_string(),
            invoice: "INVOICE".to_string(),
            promotion: "PROMOTION".to_string(),
            sale: "SALE".to_string(),
        }
    }
}

impl TableNames {
    /// Builds the mapping from the legacy positional list.
    ///
    /// The list must hold exactly [`TABLE_COUNT`] names in the documented order;
    /// any other length is rejected instead of silently remapping tables.
    pub fn from_positional(names: &[String]) -> Result<Self> {
        if names.len() != TABLE_COUNT {
            return Err(Error::Config(format!(
                "Table-name list must have exactly {} entries, got {}",
                TABLE_COUNT,
                names.len()
            )));
        }
        Ok(Self {
            sequence: names[0].clone(),
            supermarket: names[1].clone(),
            branch: names[2].clone(),
            product: names[3].clone(),
            warehouse: names[4].clone(),
            shelf: names[5].clone(),
            sells: names[6].clone(),
            supplier: names[7].clone(),
            order: names[8].clone(),
            suborder: names[9].clone(),
            offers: names[10].clone(),
            client: names[11].clone(),
            invoice: names[12].clone(),
            promotion: names[13].clone(),
            sale: names[14].clone(),
        })
    }

    /// Returns all names in the documented positional order.
    #[must_use]
    pub fn positional(&self) -> [&str; TABLE_COUNT] {
        [
            &self.sequence,
            &self.supermarket,
            &self.branch,
            &self.product,
            &self.warehouse,
            &self.shelf,
            &self.sells,
            &self.supplier,
            &self.order,
            &self.suborder,
            &self.offers,
            &self.client,
            &self.invoice,
            &self.promotion,
            &self.sale,
        ]
    }

    /// Positional accessor: `table(i)` is the name at position `i` of the
    /// documented order.
    #[must_use]
    pub fn table(&self, index: usize) -> &str {
        self.positional()[index]
    }
}

/// On-disk shape of the table-name configuration file.
#[derive(Debug, Deserialize)]
pub struct PersistenceConfig {
    /// Label for the schema/environment this mapping targets
    #[serde(default)]
    pub persistence_unit: String,
    /// Table-name mapping; missing fields fall back to the defaults
    #[serde(default)]
    pub tables: TableNames,
}

/// Loads the table-name mapping from a JSON configuration file.
///
/// A missing or malformed file is not fatal: a warning is logged and the
/// hardcoded default names are used, matching the original startup behavior.
pub fn load_table_names<P: AsRef<Path>>(path: P) -> TableNames {
    let path = path.as_ref();
    match try_load(path) {
        Ok(config) => {
            info!(
                "Loaded table-name configuration from {} (persistence unit: '{}')",
                path.display(),
                config.persistence_unit
            );
            config.tables
        }
        Err(e) => {
            warn!(
                "Could not load table-name configuration from {}: {}. Using default table names.",
                path.display(),
                e
            );
            TableNames::default()
        }
    }
}

fn try_load(path: &Path) -> Result<PersistenceConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;
    serde_json::from_str(&contents)
        .map_err(|e| Error::Config(format!("Failed to parse table configuration: {e}")))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn documented_order() -> Vec<String> {
        [
            "seq", "t_supermarket", "t_branch", "t_product", "t_warehouse", "t_shelf", "t_sells",
            "t_supplier", "t_order", "t_suborder", "t_offers", "t_client", "t_invoice",
            "t_promotion", "t_sale",
        ]
        .iter()
        .map(ToString::to_string)
        .collect()
    }

    #[test]
    fn test_positional_accessor_matches_configured_list() {
        let list = documented_order();
        let tables = TableNames::from_positional(&list).unwrap();
        for (i, name) in list.iter().enumerate() {
            assert_eq!(tables.table(i), name, "position {i} mismatch");
        }
    }

    #[test]
    fn test_positional_accessor_matches_defaults() {
        let tables = TableNames::default();
        let expected = [
            "superandes_sequence",
            "SUPERMARKET",
            "BRANCH",
            "PRODUCT",
            "WAREHOUSE",
            "SHELF",
            "SELLS",
            "SUPPLIER",
            "PURCHASE_ORDER",
            "SUBORDER",
            "OFFERS",
            "CLIENT",
            "INVOICE",
            "PROMOTION",
            "SALE",
        ];
        for (i, name) in expected.iter().enumerate() {
            assert_eq!(tables.table(i), *name);
        }
    }

    #[test]
    fn test_from_positional_rejects_wrong_length() {
        let mut list = documented_order();
        list.pop();
        assert!(TableNames::from_positional(&list).is_err());

        list.push("t_promotion".to_string());
        list.push("extra".to_string());
        assert!(TableNames::from_positional(&list).is_err());
    }

    #[test]
    fn test_parse_named_json_config() {
        let json = r#"{
            "persistence_unit": "SuperAndes",
            "tables": {
                "sequence": "sa_seq",
                "supermarket": "SA_SUPERMARKET",
                "order": "SA_ORDER"
            }
        }"#;
        let config: PersistenceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.persistence_unit, "SuperAndes");
        assert_eq!(config.tables.sequence, "sa_seq");
        assert_eq!(config.tables.supermarket, "SA_SUPERMARKET");
        assert_eq!(config.tables.order, "SA_ORDER");
        // Unspecified fields keep their defaults
        assert_eq!(config.tables.client, "CLIENT");
    }

    #[test]
    fn test_load_falls_back_to_defaults_on_missing_file() {
        let tables = load_table_names("definitely/not/a/real/path.json");
        assert_eq!(tables, TableNames::default());
    }
}
