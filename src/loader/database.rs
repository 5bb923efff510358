use tracing::debug;

use crate::error::{Error, Result};
use crate::loader::{Row, RowSource};

/// A live database connection supplied by the caller.
/// The crate does not ship a driver; implement this over one.
pub trait Connection {
    fn query(&self, sql: &str) -> Result<Vec<Row>>;
}

/// Reads columns of a table through a [`Connection`].
/// The descriptor is the table name.
pub struct DatabaseSource<'c> {
    connection: &'c dyn Connection,
}

impl<'c> DatabaseSource<'c> {
    pub fn new(connection: &'c dyn Connection) -> Self {
        Self { connection }
    }

    /// `select a,b from table;`
    pub fn select_statement(table: &str, columns: &[&str]) -> Result<String> {
        if columns.is_empty() {
            return Err(Error::InvalidConfig("no columns requested".to_string()));
        }
        check_identifier(table)?;
        for column in columns {
            check_identifier(column)?;
        }
        Ok(format!("select {} from {};", columns.join(","), table))
    }
}

/// plain identifiers only: `[A-Za-z0-9_.]+`
fn check_identifier(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!("`{name}` is not a valid SQL identifier")))
    }
}

impl RowSource for DatabaseSource<'_> {
    fn read(&self, descriptor: &str, columns: &[&str]) -> Result<Vec<Row>> {
        let sql = Self::select_statement(descriptor, columns)?;
        debug!(%sql, "querying row source");
        self.connection.query(&sql)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::loader::{row, Value};

    struct RecordingConnection {
        statements: RefCell<Vec<String>>,
    }

    impl Connection for RecordingConnection {
        fn query(&self, sql: &str) -> Result<Vec<Row>> {
            self.statements.borrow_mut().push(sql.to_string());
            Ok(vec![row([("id", Value::Int(1))])])
        }
    }

    #[test]
    fn builds_select_statement() {
        assert_eq!(
            DatabaseSource::select_statement("shop.product", &["product_name", "product_id"]).unwrap(),
            "select product_name,product_id from shop.product;"
        );
    }

    #[test]
    fn rejects_unsafe_identifiers() {
        assert!(DatabaseSource::select_statement("product; drop table x", &["id"]).is_err());
        assert!(DatabaseSource::select_statement("product", &["id, 1"]).is_err());
        assert!(DatabaseSource::select_statement("product", &[]).is_err());
    }

    #[test]
    fn delegates_to_connection() {
        let connection = RecordingConnection { statements: RefCell::new(Vec::new()) };
        let source = DatabaseSource::new(&connection);
        let rows = source.read("product", &["id"]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(connection.statements.borrow().as_slice(), ["select id from product;"]);
    }
}
