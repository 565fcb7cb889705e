//! SQLite data source.
//!
//! The dashboard data lives in four tables (`DimCustomer`, `DimPrice`,
//! `DimCateg`, `FactVolumes` by default). Tables are read whole with
//! `SELECT *` and handed to the store as raw tables; column checks happen
//! in the store, not here.

use crate::{
    config::SchemaConfig,
    error::{ReportError, ReportResult},
    store::DatasetStore,
    table::{Cell, RawTable},
};
use rusqlite::{
    params,
    types::{ToSqlOutput, Value, ValueRef},
    Connection, ToSql,
};

pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> ReportResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ReportResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Raw connection, for ad-hoc SQL against the staged tables.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn has_table(&self, name: &str) -> ReportResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Read a whole table, header included.
    pub fn read_table(&self, name: &str) -> ReportResult<RawTable> {
        if !self.has_table(name)? {
            return Err(ReportError::MissingTable {
                table: name.to_string(),
            });
        }

        let mut stmt = self
            .conn
            .prepare(&format!("SELECT * FROM {}", quote_ident(name)))?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get::<_, Value>(i).map(Cell::from))
                    .collect::<Result<Vec<_>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("read {} row(s) from {name}", rows.len());
        Ok(RawTable {
            name: name.to_string(),
            columns,
            rows,
        })
    }

    /// Write a raw table, replacing any table of the same name.
    /// Runs in one transaction.
    pub fn import(&self, table: &RawTable) -> ReportResult<()> {
        let name = quote_ident(&table.name);
        let columns = table
            .columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=table.columns.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(&format!("DROP TABLE IF EXISTS {name}"), [])?;
        tx.execute(&format!("CREATE TABLE {name} ({columns})"), [])?;
        {
            let mut stmt = tx.prepare(&format!("INSERT INTO {name} VALUES ({placeholders})"))?;
            for row in &table.rows {
                stmt.execute(rusqlite::params_from_iter(row.iter()))?;
            }
        }
        tx.commit()?;

        log::debug!("imported {} row(s) into {}", table.rows.len(), table.name);
        Ok(())
    }

    /// Read the four tables named in `schema` and build a store.
    pub fn load_store(&self, schema: &SchemaConfig) -> ReportResult<DatasetStore> {
        let customers = self.read_table(&schema.customers.table)?;
        let prices = self.read_table(&schema.prices.table)?;
        let categories = self.read_table(&schema.categories.table)?;
        let volumes = self.read_table(&schema.volumes.table)?;
        DatasetStore::load(&customers, &prices, &categories, &volumes, schema)
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Cell::Null,
            Value::Integer(v) => Cell::Int(v),
            Value::Real(v) => Cell::Real(v),
            Value::Text(s) => Cell::Text(s),
            Value::Blob(b) => Cell::Text(String::from_utf8_lossy(&b).into_owned()),
        }
    }
}

impl ToSql for Cell {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Cell::Null => ToSqlOutput::Owned(Value::Null),
            Cell::Int(v) => ToSqlOutput::Owned(Value::Integer(*v)),
            Cell::Real(v) => ToSqlOutput::Owned(Value::Real(*v)),
            Cell::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}
