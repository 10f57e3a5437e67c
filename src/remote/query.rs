//! Declarative request descriptions.
//!
//! Builders mirror the shape of the backend's query builder: start from a
//! table, narrow with filters, then pick ordering, limit and cardinality.

use serde::Serialize;
use serde_json::{Map, Value};

// == Filter ==
/// Row predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Filter {
    Eq { column: String, value: Value },
    Gt { column: String, value: Value },
    /// Case-insensitive substring match
    ILike { column: String, pattern: String },
    /// Matches when any inner filter matches
    Any { filters: Vec<Filter> },
}

// == Order ==
/// Sort key applied to a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

// == Cardinality ==
/// How many rows the caller expects back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// A JSON array of rows
    #[default]
    Many,
    /// Exactly one row; zero or several is a backend error
    Single,
    /// Zero or one row; zero yields no data
    MaybeSingle,
}

// == Query ==
/// A read against one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    pub table: String,
    pub columns: String,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub limit: Option<usize>,
    pub cardinality: Cardinality,
}

impl Query {
    /// Starts a query selecting every column of `table`.
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
            cardinality: Cardinality::Many,
        }
    }

    /// Replaces the selected column list.
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    /// Keeps rows where `column` equals `value`.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    /// Keeps rows where `column` is greater than `value`.
    pub fn gt(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Gt {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    /// Keeps rows where any of `columns` contains `term`, ignoring case.
    pub fn search(mut self, columns: &[&str], term: &str) -> Self {
        let filters = columns
            .iter()
            .map(|column| Filter::ILike {
                column: column.to_string(),
                pattern: format!("%{}%", term),
            })
            .collect();
        self.filters.push(Filter::Any { filters });
        self
    }

    /// Appends a sort key; earlier keys take precedence.
    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order.push(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    /// Caps the number of rows returned.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Expects exactly one row back.
    pub fn single(mut self) -> Self {
        self.cardinality = Cardinality::Single;
        self
    }

    /// Expects zero or one row back.
    pub fn maybe_single(mut self) -> Self {
        self.cardinality = Cardinality::MaybeSingle;
        self
    }
}

// == Mutation ==
/// Kind of write, carrying the row values where it needs them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum MutationKind {
    Insert(Value),
    Update(Value),
    Upsert(Value),
    Delete,
}

/// A write against one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mutation {
    pub table: String,
    pub kind: MutationKind,
    pub filters: Vec<Filter>,
    /// `None` writes without reading the affected rows back
    pub returning: Option<Cardinality>,
}

impl Mutation {
    fn new(table: impl Into<String>, kind: MutationKind) -> Self {
        Self {
            table: table.into(),
            kind,
            filters: Vec::new(),
            returning: None,
        }
    }

    /// Inserts `values` as new rows.
    pub fn insert(table: impl Into<String>, values: Value) -> Self {
        Self::new(table, MutationKind::Insert(values))
    }

    /// Updates the rows matched by the filters with `values`.
    pub fn update(table: impl Into<String>, values: Value) -> Self {
        Self::new(table, MutationKind::Update(values))
    }

    /// Inserts `values`, replacing rows with the same primary key.
    pub fn upsert(table: impl Into<String>, values: Value) -> Self {
        Self::new(table, MutationKind::Upsert(values))
    }

    /// Deletes the rows matched by the filters.
    pub fn delete(table: impl Into<String>) -> Self {
        Self::new(table, MutationKind::Delete)
    }

    /// Restricts the write to rows where `column` equals `value`.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    /// Reads the affected rows back with the given cardinality.
    pub fn returning(mut self, cardinality: Cardinality) -> Self {
        self.returning = Some(cardinality);
        self
    }
}

// == Remote Request ==
/// Everything the executor can be asked to run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RemoteRequest {
    Select(Query),
    Modify(Mutation),
    Rpc {
        procedure: String,
        params: Map<String, Value>,
    },
}

impl RemoteRequest {
    /// Table or procedure the request targets, for logging.
    pub fn target(&self) -> &str {
        match self {
            RemoteRequest::Select(query) => &query.table,
            RemoteRequest::Modify(mutation) => &mutation.table,
            RemoteRequest::Rpc { procedure, .. } => procedure,
        }
    }
}
