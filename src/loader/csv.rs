use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::loader::{Row, RowSource, Value};

/// Reads comma-separated files with a header row.
/// The descriptor is the file path. Each column is typed as a whole, see
/// [`Value::parse_column`].
#[derive(Debug, Clone)]
pub struct CsvSource {
    delimiter: u8,
}

impl CsvSource {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn read_path(&self, path: &Path, columns: &[&str]) -> Result<Vec<Row>> {
        let load_err = |message: String| Error::Load {
            descriptor: path.display().to_string(),
            message,
        };

        let mut reader = ::csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_path(path)
            .map_err(|e| load_err(format!("failed to open CSV: {e}")))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| load_err(format!("failed to read headers: {e}")))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let positions = columns
            .iter()
            .map(|&column| {
                headers.iter().position(|h| h == column).ok_or_else(|| {
                    Error::InvalidConfig(format!(
                        "column `{column}` not found in {}; available columns: {headers:?}",
                        path.display()
                    ))
                })
            })
            .collect::<Result<Vec<usize>>>()?;

        // raw fields per requested column; short records read as empty
        let mut raw: Vec<Vec<String>> = vec![Vec::new(); columns.len()];
        let mut record_count = 0usize;
        for (line, record) in reader.records().enumerate() {
            // header is line 1
            let record = record.map_err(|e| load_err(format!("line {}: {e}", line + 2)))?;
            for (cells, &pos) in raw.iter_mut().zip(&positions) {
                cells.push(record.get(pos).unwrap_or("").trim_start().to_string());
            }
            record_count += 1;
        }

        let typed: Vec<Vec<Value>> = raw.iter().map(|cells| Value::parse_column(cells.as_slice())).collect();
        let rows: Vec<Row> = (0..record_count)
            .map(|i| {
                columns
                    .iter()
                    .zip(&typed)
                    .map(|(&column, values)| (column.to_string(), values[i].clone()))
                    .collect()
            })
            .collect();
        debug!(path = %path.display(), rows = rows.len(), "csv rows read");
        Ok(rows)
    }
}

impl Default for CsvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RowSource for CsvSource {
    fn read(&self, descriptor: &str, columns: &[&str]) -> Result<Vec<Row>> {
        self.read_path(Path::new(descriptor), columns)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_requested_columns_typed() {
        let file = write_csv("product_id, product_name, price\n1, кольцо серебряное, 10.5\n2,, 7\n");
        let rows = CsvSource::new()
            .read(file.path().to_str().unwrap(), &["product_name", "product_id"])
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("product_id"), Some(&Value::Int(1)));
        assert_eq!(rows[0].get("product_name"), Some(&Value::from("кольцо серебряное")));
        assert_eq!(rows[1].get("product_name"), Some(&Value::Null));
        assert!(rows[0].get("price").is_none());
        // requested order is kept
        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["product_name", "product_id"]);
    }

    #[test]
    fn mixed_columns_stay_text() {
        let file = write_csv("id,name,price\n007,Кольцо серебряное,10\np2,585,12.5\n");
        let rows = CsvSource::new()
            .read(file.path().to_str().unwrap(), &["id", "name", "price"])
            .unwrap();
        assert_eq!(rows[0].get("id"), Some(&Value::from("007")));
        assert_eq!(rows[1].get("id"), Some(&Value::from("p2")));
        assert_eq!(rows[1].get("name"), Some(&Value::from("585")));
        assert_eq!(rows[0].get("price"), Some(&Value::Float(10.0)));
    }

    #[test]
    fn unknown_column_is_a_config_error() {
        let file = write_csv("a,b\n1,2\n");
        let err = CsvSource::new().read(file.path().to_str().unwrap(), &["c"]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(msg) if msg.contains("`c`")));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = CsvSource::new().read("/nonexistent/items.csv", &["a"]).unwrap_err();
        assert!(matches!(err, Error::Load { .. }));
    }

    #[test]
    fn short_rows_read_as_null() {
        let file = write_csv("user;item;weight\nu1;a\n");
        let rows = CsvSource::new()
            .with_delimiter(b';')
            .read(file.path().to_str().unwrap(), &["user", "weight"])
            .unwrap();
        assert_eq!(rows[0].get("user"), Some(&Value::from("u1")));
        assert_eq!(rows[0].get("weight"), Some(&Value::Null));
    }
}
