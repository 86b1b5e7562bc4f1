//! Field projections over a QuerySet
//!
//! Projection is a view over mapped records: rows are cut out of the Field
//! Mapper output already cached, in record order. It never changes what is
//! fetched.

use crate::cache::Mapped;
use crate::queryset::{QuerySet, Walk};
use futures::stream::{Stream, StreamExt};
use patent_client_core::{FieldValue, Model, Result};
use std::sync::Arc;

fn project_row<M>(fields: &[&'static str], item: &Mapped<M>) -> Vec<FieldValue> {
    fields
        .iter()
        .map(|name| item.record.get(name).cloned().unwrap_or(FieldValue::Absent))
        .collect()
}

/// Rows of selected fields, one per record
///
/// Created by [`QuerySet::values_list`].
pub struct ValuesList<'a, M: Model> {
    queryset: &'a QuerySet<M>,
    fields: Arc<[&'static str]>,
}

impl<'a, M: Model> ValuesList<'a, M> {
    pub(crate) fn new(queryset: &'a QuerySet<M>, fields: Vec<&'static str>) -> Self {
        ValuesList {
            queryset,
            fields: fields.into(),
        }
    }

    /// Projected field names, in row order
    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }

    /// Iterate rows from the first record
    pub fn iter(&self) -> impl Iterator<Item = Result<Vec<FieldValue>>> + 'a {
        let fields = self.fields.clone();
        Walk::new(self.queryset, move |item: &Mapped<M>| project_row(&fields, item))
    }

    /// Materialize every row
    pub fn to_vec(&self) -> Result<Vec<Vec<FieldValue>>> {
        self.iter().collect()
    }

    /// Async form of [`iter`](Self::iter)
    pub fn stream(&self) -> impl Stream<Item = Result<Vec<FieldValue>>> + 'a {
        let fields = self.fields.clone();
        self.queryset
            .stream_with(move |item: &Mapped<M>| project_row(&fields, item))
    }

    /// Async form of [`to_vec`](Self::to_vec)
    pub async fn to_vec_async(&self) -> Result<Vec<Vec<FieldValue>>> {
        let mut rows = Vec::new();
        let mut stream = Box::pin(self.stream());
        while let Some(row) = stream.next().await {
            rows.push(row?);
        }
        Ok(rows)
    }
}

/// Values of one field, one per record
///
/// Created by [`QuerySet::values`].
pub struct Values<'a, M: Model> {
    rows: ValuesList<'a, M>,
}

impl<'a, M: Model> Values<'a, M> {
    pub(crate) fn new(rows: ValuesList<'a, M>) -> Self {
        Values { rows }
    }

    /// Iterate values from the first record
    pub fn iter(&self) -> impl Iterator<Item = Result<FieldValue>> + 'a {
        self.rows.iter().map(|row| row.map(first_cell))
    }

    /// Materialize every value
    pub fn to_vec(&self) -> Result<Vec<FieldValue>> {
        self.iter().collect()
    }

    /// Async form of [`iter`](Self::iter)
    pub fn stream(&self) -> impl Stream<Item = Result<FieldValue>> + 'a {
        self.rows.stream().map(|row| row.map(first_cell))
    }

    /// Async form of [`to_vec`](Self::to_vec)
    pub async fn to_vec_async(&self) -> Result<Vec<FieldValue>> {
        let rows = self.rows.to_vec_async().await?;
        Ok(rows.into_iter().map(first_cell).collect())
    }
}

fn first_cell(row: Vec<FieldValue>) -> FieldValue {
    row.into_iter().next().unwrap_or(FieldValue::Absent)
}
