use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Deserialize;
use serde_json::Value;

use crate::classify::NO_RECORD_CODE;
use crate::provider::SUCCESS_CODE;
use crate::{
    BufferedCursor, CoreError, DatasetKind, ProviderClient, ProviderFault, ProviderStatus,
    QueryDescriptor, RowCursor,
};

/// One recorded interaction with a [`ScriptedProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Login,
    Query(QueryDescriptor),
    Logout,
}

/// Canned answer for every query against one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedResponse {
    Cursor {
        status: ProviderStatus,
        fields: Vec<String>,
        rows: Vec<Vec<String>>,
        fault_after: Option<(usize, String)>,
    },
    QueryFault(String),
}

impl ScriptedResponse {
    fn open(&self) -> Result<Box<dyn RowCursor>, ProviderFault> {
        match self {
            Self::QueryFault(message) => Err(ProviderFault::new(message.clone())),
            Self::Cursor {
                status,
                fields,
                rows,
                fault_after,
            } => {
                let cursor = BufferedCursor::new(status.clone(), fields.clone(), rows.clone());
                Ok(Box::new(match fault_after {
                    Some((after, message)) => {
                        cursor.with_fault_after(*after, ProviderFault::new(message.clone()))
                    }
                    None => cursor,
                }))
            }
        }
    }
}

#[derive(Debug)]
struct ScriptState {
    login: ProviderStatus,
    logout_fault: Option<String>,
    responses: HashMap<DatasetKind, ScriptedResponse>,
    calls: Vec<ProviderCall>,
}

/// Provider stub answering from per-dataset scripts and recording every call.
///
/// Clones share state, so a test can hand one clone to a
/// [`SessionGuard`](crate::SessionGuard) and inspect the call log through
/// another. Datasets without a script answer "no record found".
#[derive(Debug, Clone)]
pub struct ScriptedProvider {
    state: Arc<Mutex<ScriptState>>,
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ScriptState {
                login: ProviderStatus::success(),
                logout_fault: None,
                responses: HashMap::new(),
                calls: Vec::new(),
            })),
        }
    }

    /// Loads scripts from a JSON fixture.
    ///
    /// ```json
    /// { "login": {"code": "0", "message": "success"},
    ///   "datasets": { "trade_dates": { "fields": ["calendar_date", "is_trading_day"],
    ///                                  "rows": [["2025-01-02", "1"]] } } }
    /// ```
    ///
    /// Non-string cells are stringified; `null` becomes an empty string.
    pub fn from_fixture_str(json: &str) -> Result<Self, CoreError> {
        let fixture: Fixture = serde_json::from_str(json)?;
        let mut provider = Self::new();
        if let Some(login) = fixture.login {
            provider = provider.with_login_status(login);
        }

        for (name, dataset) in fixture.datasets {
            let kind = DatasetKind::from_str(&name)?;
            let rows = dataset
                .rows
                .into_iter()
                .map(|row| row.into_iter().map(cell_text).collect())
                .collect();
            provider = provider.with_response(
                kind,
                ScriptedResponse::Cursor {
                    status: ProviderStatus::new(dataset.code, dataset.message),
                    fields: dataset.fields,
                    rows,
                    fault_after: None,
                },
            );
        }
        Ok(provider)
    }

    pub fn with_login_status(self, status: ProviderStatus) -> Self {
        self.lock().login = status;
        self
    }

    pub fn failing_logout(self, message: impl Into<String>) -> Self {
        self.lock().logout_fault = Some(message.into());
        self
    }

    pub fn with_response(self, kind: DatasetKind, response: ScriptedResponse) -> Self {
        self.lock().responses.insert(kind, response);
        self
    }

    /// Successful cursor over `rows`.
    pub fn with_table(self, kind: DatasetKind, fields: &[&str], rows: &[&[&str]]) -> Self {
        self.with_response(
            kind,
            ScriptedResponse::Cursor {
                status: ProviderStatus::success(),
                fields: owned(fields),
                rows: rows.iter().map(|row| owned(row)).collect(),
                fault_after: None,
            },
        )
    }

    /// Cursor carrying a non-success status.
    pub fn with_status(self, kind: DatasetKind, status: ProviderStatus) -> Self {
        self.with_response(
            kind,
            ScriptedResponse::Cursor {
                status,
                fields: Vec::new(),
                rows: Vec::new(),
                fault_after: None,
            },
        )
    }

    /// The query call itself fails.
    pub fn with_query_fault(self, kind: DatasetKind, message: impl Into<String>) -> Self {
        self.with_response(kind, ScriptedResponse::QueryFault(message.into()))
    }

    /// Cursor that faults after yielding `after` of `rows`.
    pub fn with_fault_after(
        self,
        kind: DatasetKind,
        fields: &[&str],
        rows: &[&[&str]],
        after: usize,
        message: impl Into<String>,
    ) -> Self {
        self.with_response(
            kind,
            ScriptedResponse::Cursor {
                status: ProviderStatus::success(),
                fields: owned(fields),
                rows: rows.iter().map(|row| owned(row)).collect(),
                fault_after: Some((after, message.into())),
            },
        )
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.lock().calls.clone()
    }

    pub fn query_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| matches!(call, ProviderCall::Query(_)))
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProviderClient for ScriptedProvider {
    fn login(&self) -> ProviderStatus {
        let mut state = self.lock();
        state.calls.push(ProviderCall::Login);
        state.login.clone()
    }

    fn logout(&self) -> Result<(), ProviderFault> {
        let mut state = self.lock();
        state.calls.push(ProviderCall::Logout);
        match &state.logout_fault {
            Some(message) => Err(ProviderFault::new(message.clone())),
            None => Ok(()),
        }
    }

    fn query(&self, query: &QueryDescriptor) -> Result<Box<dyn RowCursor>, ProviderFault> {
        let mut state = self.lock();
        state.calls.push(ProviderCall::Query(query.clone()));
        match state.responses.get(&query.dataset()) {
            Some(response) => response.open(),
            None => Ok(Box::new(BufferedCursor::failed(ProviderStatus::new(
                NO_RECORD_CODE,
                "no record found",
            )))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    login: Option<ProviderStatus>,
    #[serde(default)]
    datasets: BTreeMap<String, FixtureDataset>,
}

#[derive(Debug, Deserialize)]
struct FixtureDataset {
    #[serde(default = "success_code")]
    code: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

fn success_code() -> String {
    SUCCESS_CODE.to_owned()
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade_dates_query() -> QueryDescriptor {
        QueryDescriptor::builder(DatasetKind::TradeDates).build()
    }

    #[test]
    fn records_calls_in_order() {
        let provider = ScriptedProvider::new();
        let observer = provider.clone();

        assert!(provider.login().is_success());
        let cursor = provider.query(&trade_dates_query()).expect("cursor");
        assert_eq!(cursor.status().code, NO_RECORD_CODE);
        provider.logout().expect("logout succeeds");

        assert_eq!(
            observer.calls(),
            vec![
                ProviderCall::Login,
                ProviderCall::Query(trade_dates_query()),
                ProviderCall::Logout,
            ]
        );
        assert_eq!(observer.query_count(), 1);
    }

    #[test]
    fn query_fault_and_logout_fault_are_injectable() {
        let provider = ScriptedProvider::new()
            .with_query_fault(DatasetKind::TradeDates, "socket closed")
            .failing_logout("already logged out");

        let fault = provider
            .query(&trade_dates_query())
            .err()
            .expect("query must fault");
        assert_eq!(fault.message(), "socket closed");
        assert!(provider.logout().is_err());
    }

    #[test]
    fn fixture_stringifies_cells() {
        let provider = ScriptedProvider::from_fixture_str(
            r#"{
                "login": {"code": "0", "message": "success"},
                "datasets": {
                    "trade_dates": {
                        "fields": ["calendar_date", "is_trading_day"],
                        "rows": [["2025-01-02", 1], ["2025-01-04", null]]
                    }
                }
            }"#,
        )
        .expect("fixture parses");

        let mut cursor = provider.query(&trade_dates_query()).expect("cursor");
        assert!(cursor.status().is_success());
        let first = cursor.next_row().expect("no fault").expect("row");
        assert_eq!(first, vec!["2025-01-02".to_owned(), "1".to_owned()]);
        let second = cursor.next_row().expect("no fault").expect("row");
        assert_eq!(second[1], "");
    }

    #[test]
    fn fixture_rejects_unknown_dataset() {
        let err = ScriptedProvider::from_fixture_str(r#"{"datasets": {"tick_data": {}}}"#)
            .expect_err("unknown dataset");
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
