//! Database location configuration.
//!
//! The database file path comes from the `DATABASE_PATH` environment variable and
//! falls back to a local SQLite file, so the same binary can run against different
//! environments without rebuilding.

/// Returns the database file path from `DATABASE_PATH`, or the default local file.
#[must_use]
pub fn database_path() -> String {
    std::env::var("DATABASE_PATH").unwrap_or_else(|_| "superandes.sqlite".to_string())
}

/// Returns the table-name configuration path from `TABLES_CONFIG_PATH`,
/// or the default `tables.json` next to the binary.
#[must_use]
pub fn tables_config_path() -> String {
    std::env::var("TABLES_CONFIG_PATH").unwrap_or_else(|_| "tables.json".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_default() {
        // Only meaningful when the variable is unset in the test environment
        if std::env::var("DATABASE_PATH").is_err() {
            assert_eq!(database_path(), "superandes.sqlite");
        }
    }

    #[test]
    fn test_tables_config_path_default() {
        if std::env::var("TABLES_CONFIG_PATH").is_err() {
            assert_eq!(tables_config_path(), "tables.json");
        }
    }
}
