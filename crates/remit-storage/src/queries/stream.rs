//! Forward-only streaming over transactions.
//!
//! The total comes from a count query run before the cursor opens, so
//! callers can show progress. Rows are materialized one at a time; the
//! stream can be iterated once.

use remit_core::errors::{StorageError, StorageResult};
use remit_core::types::records::Row;
use rusqlite::{Connection, Statement};

use super::transactions::count_transactions;
use super::{bind_params, column_names, read_row, select_list, where_suffix, QueryParams};
use crate::schema::ddl::TRANSACTIONS_TABLE;
use crate::schema::SchemaManager;

/// One streamed row with its 1-based position and the pre-counted total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamItem {
    pub row: Row,
    pub index: usize,
    pub total: usize,
}

/// A prepared, parameter-bound transaction query borrowing its connection.
pub struct TransactionStream<'c> {
    stmt: Statement<'c>,
    names: Vec<String>,
    total: usize,
    consumed: bool,
}

impl<'c> TransactionStream<'c> {
    pub fn prepare(
        conn: &'c Connection,
        schema: &SchemaManager,
        columns: Option<&[&str]>,
        filter: Option<&str>,
        params: QueryParams<'_>,
    ) -> StorageResult<Self> {
        let select = select_list(schema, columns)?;
        let total = count_transactions(conn, filter, params)?;

        let sql = format!("SELECT {select} FROM {TRANSACTIONS_TABLE}{}", where_suffix(filter));
        let mut stmt = conn.prepare(&sql)?;
        bind_params(&mut stmt, params)?;
        let names = column_names(&stmt);

        Ok(Self {
            stmt,
            names,
            total,
            consumed: false,
        })
    }

    /// Row count reported by the count query.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Result column names, in select order.
    pub fn columns(&self) -> &[String] {
        &self.names
    }

    /// Open the cursor. A second call fails with [`StorageError::StreamConsumed`].
    pub fn rows(&mut self) -> StorageResult<impl Iterator<Item = StorageResult<StreamItem>> + '_> {
        if self.consumed {
            return Err(StorageError::StreamConsumed);
        }
        self.consumed = true;

        let total = self.total;
        let names = &self.names;
        let mut index = 0;
        let rows = self.stmt.raw_query().mapped(move |row| {
            index += 1;
            Ok(StreamItem {
                row: read_row(row, names)?,
                index,
                total,
            })
        });
        Ok(rows.map(|item| item.map_err(StorageError::from)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(n: usize) -> (Connection, SchemaManager) {
        let conn = Connection::open_in_memory().unwrap();
        let mut schema = SchemaManager::initialize(&conn, false).unwrap();
        schema.ensure_columns(&conn, ["RUN"]).unwrap();
        for i in 0..n {
            let run = if i % 2 == 0 { "even" } else { "odd" };
            conn.execute(
                "INSERT INTO edi_transactions (transaction_uid, RUN) VALUES (?1, ?2)",
                [format!("u{i}"), run.to_string()],
            )
            .unwrap();
        }
        (conn, schema)
    }

    #[test]
    fn yields_ordinal_and_total() {
        let (conn, schema) = seeded(5);
        let mut stream =
            TransactionStream::prepare(&conn, &schema, Some(&["RUN"]), Some("RUN = ?1"), &[&"even"]).unwrap();
        assert_eq!(stream.total(), 3);
        assert_eq!(stream.columns(), ["RUN"]);

        let items: Vec<_> = stream.rows().unwrap().collect::<Result<_, _>>().unwrap();
        let positions: Vec<_> = items.iter().map(|i| (i.index, i.total)).collect();
        assert_eq!(positions, vec![(1, 3), (2, 3), (3, 3)]);
        assert!(items.iter().all(|i| i.row["RUN"] == "even"));
    }

    #[test]
    fn second_iteration_is_refused() {
        let (conn, schema) = seeded(2);
        let mut stream = TransactionStream::prepare(&conn, &schema, None, None, &[]).unwrap();
        assert_eq!(stream.rows().unwrap().count(), 2);
        assert!(matches!(stream.rows().err(), Some(StorageError::StreamConsumed)));
    }

    #[test]
    fn empty_table_streams_nothing() {
        let (conn, schema) = seeded(0);
        let mut stream = TransactionStream::prepare(&conn, &schema, None, None, &[]).unwrap();
        assert_eq!(stream.total(), 0);
        assert_eq!(stream.rows().unwrap().count(), 0);
    }
}
