//! Row sources and content merging
//!
//! Rows are ordered maps from column name to [`Value`]. Where the rows come
//! from (a CSV file, a database query, memory) is hidden behind
//! [`RowSource`].

pub mod csv;
pub mod database;
pub mod merge;

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use self::csv::CsvSource;
pub use self::database::{Connection, DatabaseSource};
pub use self::merge::ContentMerger;

/// A cell value as delivered by a row source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Type a raw field: empty → Null, then integer, float, text.
    /// Zero-padded numbers such as `007` stay text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }
        match ColumnType::of_field(trimmed) {
            ColumnType::Int => trimmed.parse().map(Value::Int).unwrap_or_else(|_| Value::Text(raw.to_string())),
            ColumnType::Float => trimmed.parse().map(Value::Float).unwrap_or_else(|_| Value::Text(raw.to_string())),
            ColumnType::Text => Value::Text(raw.to_string()),
        }
    }

    /// Type a whole column at once.
    /// The column is integer (or float) only when every non-empty field is;
    /// otherwise every non-empty field is kept as text.
    pub fn parse_column<T>(raw: &[T]) -> Vec<Value>
    where
        T: AsRef<str>,
    {
        let kind = raw
            .iter()
            .map(|field| field.as_ref().trim())
            .filter(|field| !field.is_empty())
            .map(ColumnType::of_field)
            .fold(ColumnType::Int, ColumnType::widen);
        raw.iter()
            .map(|field| {
                let field = field.as_ref();
                let trimmed = field.trim();
                if trimmed.is_empty() {
                    return Value::Null;
                }
                match kind {
                    ColumnType::Int => trimmed.parse().map(Value::Int).unwrap_or(Value::Null),
                    ColumnType::Float => trimmed.parse().map(Value::Float).unwrap_or(Value::Null),
                    ColumnType::Text => Value::Text(field.to_string()),
                }
            })
            .collect()
    }

    /// Null and NaN count as missing
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// numeric view; text is parsed when it holds a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) if !f.is_nan() => Some(*f),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|f| !f.is_nan()),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

/// Narrowest type that holds every field seen so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ColumnType {
    Int,
    Float,
    Text,
}

impl ColumnType {
    fn of_field(trimmed: &str) -> Self {
        let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
        let mut chars = digits.chars();
        if let (Some('0'), Some(c)) = (chars.next(), chars.next()) {
            if c.is_ascii_digit() {
                return ColumnType::Text;
            }
        }
        if trimmed.parse::<i64>().is_ok() {
            ColumnType::Int
        } else if trimmed.parse::<f64>().is_ok() {
            ColumnType::Float
        } else {
            ColumnType::Text
        }
    }

    #[inline]
    fn widen(self, other: Self) -> Self {
        self.max(other)
    }
}

/// External identifier taken from a row.
/// Ordering: integers before text, each in natural order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    Int(i64),
    Text(String),
}

impl Key {
    /// Only integer and text values identify things
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(Key::Int(*i)),
            Value::Text(s) => Some(Key::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{i}"),
            Key::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Text(s.to_string())
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

/// column name → value
pub type Row = IndexMap<String, Value>;

/// Build a row from (column, value) pairs
pub fn row<I, C, V>(cells: I) -> Row
where
    I: IntoIterator<Item = (C, V)>,
    C: Into<String>,
    V: Into<Value>,
{
    cells.into_iter().map(|(c, v)| (c.into(), v.into())).collect()
}

/// Provider of rows with named columns
pub trait RowSource {
    /// Read `columns` of every row found at `descriptor`
    /// (a file path, a table name, ...).
    fn read(&self, descriptor: &str, columns: &[&str]) -> Result<Vec<Row>>;
}

impl<T> RowSource for &T
where
    T: RowSource + ?Sized,
{
    fn read(&self, descriptor: &str, columns: &[&str]) -> Result<Vec<Row>> {
        (**self).read(descriptor, columns)
    }
}

/// Rows held in memory; the descriptor is ignored.
/// Requested columns absent from a row read as `Null`.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: Vec<Row>,
}

impl MemorySource {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}

impl RowSource for MemorySource {
    fn read(&self, _descriptor: &str, columns: &[&str]) -> Result<Vec<Row>> {
        Ok(self
            .rows
            .iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|&c| (c.to_string(), r.get(c).cloned().unwrap_or(Value::Null)))
                    .collect()
            })
            .collect())
    }
}

/// Supported source kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Csv,
    Database,
}

impl FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(SourceKind::Csv),
            "db" | "database" => Ok(SourceKind::Database),
            other => Err(Error::InvalidConfig(format!("no loader available for source kind `{other}`"))),
        }
    }
}

/// Open a row source of the given kind.
/// A database source needs a live connection.
pub fn open_source<'c>(kind: SourceKind, connection: Option<&'c dyn Connection>) -> Result<Box<dyn RowSource + 'c>> {
    match kind {
        SourceKind::Csv => Ok(Box::new(CsvSource::new())),
        SourceKind::Database => {
            let connection = connection.ok_or_else(|| {
                Error::InvalidConfig("database source requested without a connection".to_string())
            })?;
            Ok(Box::new(DatabaseSource::new(connection)))
        }
    }
}
