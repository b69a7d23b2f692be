/// Database path resolution
pub mod database;

/// Table-name mapping configuration
pub mod tables;

pub use database::{database_path, tables_config_path};
pub use tables::{TABLE_COUNT, TableNames, load_table_names};
