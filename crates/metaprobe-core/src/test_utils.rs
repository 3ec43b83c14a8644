//! In-memory connection double for unit tests.

use crate::connection::{Connection, StatementHandle};
use crate::error::BackendError;
use crate::format::{ExaFormatter, SqlFormatter};
use crate::types::{ColumnInfo, FetchedRow, StatementOptions};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// A statement the mock was asked to prepare.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub sql: String,
    pub options: StatementOptions,
}

/// Canned outcome for the next `prepare_statement` call.
#[derive(Debug, Clone, Default)]
pub struct MockResult {
    columns: Vec<ColumnInfo>,
    rows: Vec<FetchedRow>,
    prepare_error: Option<String>,
    fetch_error: Option<String>,
    close_error: Option<String>,
}

impl MockResult {
    /// Mapping rows built from JSON objects.
    pub fn rows(rows: Vec<serde_json::Value>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| match row {
                serde_json::Value::Object(map) => FetchedRow::Mapping(map),
                other => panic!("mock rows must be JSON objects, got {other}"),
            })
            .collect();
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Positional rows with the given column names.
    pub fn tuples(names: &[&str], rows: Vec<Vec<serde_json::Value>>) -> Self {
        Self {
            columns: names.iter().map(|n| ColumnInfo::new(*n, None)).collect(),
            rows: rows.into_iter().map(FetchedRow::Tuple).collect(),
            ..Self::default()
        }
    }

    /// Column metadata only, for plan-only statements.
    pub fn columns(columns: &[(&str, Option<&str>)]) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|(name, ty)| ColumnInfo::new(*name, ty.map(str::to_string)))
                .collect(),
            ..Self::default()
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            prepare_error: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn fetch_error(message: &str) -> Self {
        Self {
            fetch_error: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_close(mut self, message: &str) -> Self {
        self.close_error = Some(message.to_string());
        self
    }
}

#[derive(Default)]
struct Counters {
    fetches: Cell<usize>,
    closes: Cell<usize>,
}

/// Records every prepared statement and replays queued [`MockResult`]s.
///
/// When the queue is empty, statements succeed with no rows.
pub struct MockConnection {
    formatter: ExaFormatter,
    current_schema: RefCell<String>,
    closed: Cell<bool>,
    queue: RefCell<VecDeque<MockResult>>,
    prepared: RefCell<Vec<Prepared>>,
    counters: Rc<Counters>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::with_formatter(ExaFormatter::default())
    }

    pub fn with_formatter(formatter: ExaFormatter) -> Self {
        Self {
            formatter,
            current_schema: RefCell::new("S1".to_string()),
            closed: Cell::new(false),
            queue: RefCell::new(VecDeque::new()),
            prepared: RefCell::new(Vec::new()),
            counters: Rc::new(Counters::default()),
        }
    }

    pub fn push_result(&self, result: MockResult) {
        self.queue.borrow_mut().push_back(result);
    }

    pub fn set_current_schema(&self, schema: &str) {
        *self.current_schema.borrow_mut() = schema.to_string();
    }

    pub fn close(&self) {
        self.closed.set(true);
    }

    pub fn prepared(&self) -> Vec<Prepared> {
        self.prepared.borrow().clone()
    }

    pub fn last_sql(&self) -> String {
        self.prepared
            .borrow()
            .last()
            .map(|p| p.sql.clone())
            .unwrap_or_default()
    }

    pub fn fetch_calls(&self) -> usize {
        self.counters.fetches.get()
    }

    pub fn closed_statements(&self) -> usize {
        self.counters.closes.get()
    }
}

impl Default for MockConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection for MockConnection {
    fn prepare_statement(
        &self,
        sql: &str,
        options: StatementOptions,
    ) -> Result<Box<dyn StatementHandle>, BackendError> {
        self.prepared.borrow_mut().push(Prepared {
            sql: sql.to_string(),
            options,
        });

        let result = self.queue.borrow_mut().pop_front().unwrap_or_default();
        if let Some(message) = &result.prepare_error {
            return Err(BackendError::new(message.clone()));
        }

        Ok(Box::new(MockStatement {
            row_count: result.rows.len() as u64,
            result,
            counters: Rc::clone(&self.counters),
        }))
    }

    fn current_schema(&self) -> Result<String, BackendError> {
        Ok(self.current_schema.borrow().clone())
    }

    fn formatter(&self) -> &dyn SqlFormatter {
        &self.formatter
    }

    fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

struct MockStatement {
    row_count: u64,
    result: MockResult,
    counters: Rc<Counters>,
}

impl StatementHandle for MockStatement {
    fn columns(&self) -> Result<Vec<ColumnInfo>, BackendError> {
        Ok(self.result.columns.clone())
    }

    fn row_count(&self) -> u64 {
        self.row_count
    }

    fn fetch_all(&mut self) -> Result<Vec<FetchedRow>, BackendError> {
        self.counters.fetches.set(self.counters.fetches.get() + 1);
        if let Some(message) = &self.result.fetch_error {
            return Err(BackendError::new(message.clone()));
        }
        Ok(std::mem::take(&mut self.result.rows))
    }

    fn close(&mut self) -> Result<(), BackendError> {
        self.counters.closes.set(self.counters.closes.get() + 1);
        match &self.result.close_error {
            Some(message) => Err(BackendError::new(message.clone())),
            None => Ok(()),
        }
    }
}
