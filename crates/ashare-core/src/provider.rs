//! Upstream boundary: the only shape of the provider the core depends on.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::QueryDescriptor;

/// Status code the provider uses for success.
pub const SUCCESS_CODE: &str = "0";

/// Status attached to a login attempt or a query cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub code: String,
    pub message: String,
}

impl ProviderStatus {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn success() -> Self {
        Self::new(SUCCESS_CODE, "success")
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// Unclassified transport or internal failure raised by a provider client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderFault {
    message: String,
}

impl ProviderFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Row iterator returned by a provider query.
pub trait RowCursor: Send {
    fn status(&self) -> &ProviderStatus;
    fn fields(&self) -> &[String];
    fn next_row(&mut self) -> Result<Option<Vec<String>>, ProviderFault>;
}

/// Provider client contract.
///
/// Login binds the process-wide provider session; callers reach `query` only
/// through a [`ProviderSession`](crate::ProviderSession).
pub trait ProviderClient: Send + Sync {
    fn login(&self) -> ProviderStatus;
    fn logout(&self) -> Result<(), ProviderFault>;
    fn query(&self, query: &QueryDescriptor) -> Result<Box<dyn RowCursor>, ProviderFault>;
}

/// Cursor over rows already held in memory.
#[derive(Debug, Clone)]
pub struct BufferedCursor {
    status: ProviderStatus,
    fields: Vec<String>,
    rows: VecDeque<Vec<String>>,
    fault_after: Option<(usize, ProviderFault)>,
    yielded: usize,
}

impl BufferedCursor {
    pub fn new(status: ProviderStatus, fields: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            status,
            fields,
            rows: rows.into(),
            fault_after: None,
            yielded: 0,
        }
    }

    pub fn ok(fields: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self::new(ProviderStatus::success(), fields, rows)
    }

    /// Cursor with a non-success status and no rows.
    pub fn failed(status: ProviderStatus) -> Self {
        Self::new(status, Vec::new(), Vec::new())
    }

    /// Fails with `fault` once `rows` rows have been yielded.
    pub fn with_fault_after(mut self, rows: usize, fault: ProviderFault) -> Self {
        self.fault_after = Some((rows, fault));
        self
    }
}

impl RowCursor for BufferedCursor {
    fn status(&self) -> &ProviderStatus {
        &self.status
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn next_row(&mut self) -> Result<Option<Vec<String>>, ProviderFault> {
        if let Some((after, fault)) = &self.fault_after {
            if self.yielded >= *after {
                return Err(fault.clone());
            }
        }
        let row = self.rows.pop_front();
        if row.is_some() {
            self.yielded += 1;
        }
        Ok(row)
    }
}
