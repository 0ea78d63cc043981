//! Column plan for one insert call.
//!
//! Fixes the column order for the whole call and resolves which display
//! names feed each column. Built before anything is written, so collision
//! and reserved-name errors leave the database untouched.

use std::collections::{BTreeMap, BTreeSet};

use remit_core::config::CollisionPolicy;
use remit_core::errors::{StorageError, StorageResult};
use remit_core::types::records::Row;

use crate::schema::sanitize::{column_key, is_internal_column, sanitize_column_name};
use crate::schema::SchemaManager;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    /// Column names as spelled on disk (or as first sanitized, for new
    /// columns), sorted by column key.
    columns: Vec<String>,
    /// Display names feeding `columns[i]`, sorted. One entry unless merged.
    sources: Vec<Vec<String>>,
}

impl ColumnPlan {
    /// Union the field names of every row and map them onto columns.
    pub fn build<'r>(
        rows: impl IntoIterator<Item = &'r Row>,
        schema: &SchemaManager,
        policy: CollisionPolicy,
    ) -> StorageResult<Self> {
        let names: BTreeSet<&str> = rows
            .into_iter()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect();

        // Keyed by column key: names differing only in case share a column.
        let mut grouped: BTreeMap<String, (String, Vec<String>)> = BTreeMap::new();
        for name in names {
            let column = sanitize_column_name(name);
            if is_internal_column(&column) {
                return Err(StorageError::ReservedColumn {
                    field: name.to_string(),
                    column,
                });
            }

            let (target, group) = grouped.entry(column_key(&column)).or_insert_with(|| {
                let target = schema.resolve_column(&column).unwrap_or(&column).to_string();
                (target, Vec::new())
            });

            if policy == CollisionPolicy::Reject {
                let first = schema
                    .source_of(&column)
                    .filter(|registered| *registered != name)
                    .or_else(|| group.first().map(String::as_str));
                if let Some(first) = first {
                    return Err(StorageError::ColumnCollision {
                        column: target.clone(),
                        first: first.to_string(),
                        second: name.to_string(),
                    });
                }
            }
            group.push(name.to_string());
        }

        let (columns, sources): (Vec<String>, Vec<Vec<String>>) = grouped.into_values().unzip();
        Ok(Self { columns, sources })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Every display name in the plan, for column creation.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().flatten().map(String::as_str)
    }

    /// Values of `row` in column order; `""` where the row has no source.
    pub fn project<'p, 'r: 'p>(&'p self, row: &'r Row) -> impl Iterator<Item = &'r str> + 'p {
        self.sources.iter().map(move |names| {
            names
                .iter()
                .find_map(|name| row.get(name))
                .map(String::as_str)
                .unwrap_or("")
        })
    }
}
