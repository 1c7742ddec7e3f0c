//! Session lifecycle contract shared by every dataset method.
//!
//! Every call logs in once, queries once and logs out once, whatever the
//! outcome of the query.

use std::panic::{catch_unwind, AssertUnwindSafe};

use ashare_core::{
    DataConfig, DataErrorKind, DataSource, DatasetKind, KDataOptions, ProviderCall,
    ProviderDataSource, ProviderStatus, ScriptedProvider, SessionGuard, YearType,
};

fn quiet() -> DataConfig {
    DataConfig {
        suppress_provider_stdout: false,
        ..DataConfig::default()
    }
}

fn source(provider: &ScriptedProvider) -> ProviderDataSource<ScriptedProvider> {
    ProviderDataSource::with_config(provider.clone(), &quiet())
}

fn is_bracketed(calls: &[ProviderCall]) -> bool {
    matches!(
        calls,
        [ProviderCall::Login, ProviderCall::Query(_), ProviderCall::Logout]
    )
}

// =============================================================================
// Contract: one session per call
// =============================================================================

#[test]
fn successful_call_logs_in_queries_once_and_logs_out() {
    // Given: a provider scripted with one profit row
    let provider = ScriptedProvider::new().with_table(
        DatasetKind::Profit,
        &["code", "pubDate", "statDate", "roeAvg"],
        &[&["sh.600000", "2024-08-30", "2024-06-30", "0.051"]],
    );
    let source = source(&provider);

    // When: profit data is requested
    let table = source
        .profit_data("sh.600000", "2024", 2)
        .expect("scripted row is returned");

    // Then: the session brackets exactly one query
    assert_eq!(table.len(), 1);
    assert!(is_bracketed(&provider.calls()), "calls: {:?}", provider.calls());
    assert!(!source.guard().is_active());
}

#[test]
fn every_dataset_method_uses_its_own_session() {
    // Given: a provider with no scripts, so every dataset answers "no record found"
    let provider = ScriptedProvider::new();
    let source = source(&provider);
    let options = KDataOptions::default();

    // When: each method is called once
    let outcomes = [
        source.historical_k_data("sh.600000", "2025-01-02", "2025-01-10", &options),
        source.stock_basic_info("sh.600000", None),
        source.dividend_data("sh.600000", "2024", YearType::Report),
        source.adjust_factor_data("sh.600000", "2024-01-01", "2024-12-31"),
        source.operation_data("sh.600000", "2024", 1),
        source.growth_data("sh.600000", "2024", 1),
        source.balance_data("sh.600000", "2024", 1),
        source.cash_flow_data("sh.600000", "2024", 1),
        source.dupont_data("sh.600000", "2024", 1),
        source.performance_express_report("sh.600000", "2024-01-01", "2024-12-31"),
        source.forecast_report("sh.600000", "2024-01-01", "2024-12-31"),
        source.stock_industry(None, None),
        source.sz50_stocks(None),
        source.hs300_stocks(None),
        source.zz500_stocks(None),
        source.trade_dates(None, None),
        source.all_stock(None),
        source.deposit_rate_data(None, None),
        source.loan_rate_data(None, None),
        source.money_supply_data_month(None, None),
        source.money_supply_data_year(None, None),
    ];

    // Then: each one reports NoData and the call log is a chain of brackets
    for outcome in &outcomes {
        let err = outcome.as_ref().expect_err("nothing is scripted");
        assert_eq!(err.kind(), DataErrorKind::NoData);
    }
    let calls = provider.calls();
    assert_eq!(calls.len(), outcomes.len() * 3);
    assert!(calls.chunks(3).all(is_bracketed));
}

#[test]
fn query_sees_the_validated_arguments() {
    // Given: a provider scripted for k-data
    let provider = ScriptedProvider::new().with_table(
        DatasetKind::KData,
        &["date", "close"],
        &[&["2025-01-02", "10.01"]],
    );
    let source = source(&provider);
    let options = KDataOptions {
        fields: Some(vec!["date".to_owned(), "close".to_owned()]),
        ..KDataOptions::default()
    };

    // When: the caller passes an upper-case code
    source
        .historical_k_data("SH.600000", "2025-01-02", "2025-01-02", &options)
        .expect("scripted row");

    // Then: the descriptor carries the canonical code and the wire parameters
    let calls = provider.calls();
    let ProviderCall::Query(query) = &calls[1] else {
        panic!("expected a query, got {calls:?}");
    };
    let params = query.parameters();
    assert_eq!(params["code"], "sh.600000");
    assert_eq!(params["fields"], "date,close");
    assert_eq!(params["frequency"], "d");
    assert_eq!(params["adjustflag"], "3");
}

// =============================================================================
// Contract: logout on every exit path
// =============================================================================

#[test]
fn failed_login_never_queries_or_logs_out() {
    // Given: a provider that refuses the login
    let provider =
        ScriptedProvider::new().with_login_status(ProviderStatus::new("10001001", "bad user"));
    let source = source(&provider);

    // When: any dataset is requested
    let err = source.trade_dates(None, None).expect_err("login fails");

    // Then: the error is Login with the raw code and only the login was attempted
    assert_eq!(err.kind(), DataErrorKind::Login);
    assert_eq!(err.code(), Some("10001001"));
    assert_eq!(provider.calls(), vec![ProviderCall::Login]);
}

#[test]
fn query_fault_still_logs_out() {
    // Given: a provider whose query call fails outright
    let provider =
        ScriptedProvider::new().with_query_fault(DatasetKind::TradeDates, "socket closed");
    let source = source(&provider);

    // When: trade dates are requested
    let err = source.trade_dates(None, None).expect_err("query fails");

    // Then: the fault is a ProviderError and the session was closed
    assert_eq!(err.kind(), DataErrorKind::ProviderError);
    assert!(err.message().contains("socket closed"));
    assert!(is_bracketed(&provider.calls()));
}

#[test]
fn fault_while_draining_rows_still_logs_out() {
    // Given: a cursor that fails after its first row
    let provider = ScriptedProvider::new().with_fault_after(
        DatasetKind::AllStock,
        &["code", "tradeStatus", "code_name"],
        &[
            &["sh.600000", "1", "浦发银行"],
            &["sh.600036", "1", "招商银行"],
        ],
        1,
        "connection reset",
    );
    let source = source(&provider);

    // When: the roster is requested
    let err = source.all_stock(Some("2025-01-06")).expect_err("drain fails");

    // Then: no partial table escapes and logout still ran
    assert_eq!(err.kind(), DataErrorKind::ProviderError);
    assert!(is_bracketed(&provider.calls()));
}

#[test]
fn logout_failure_does_not_replace_the_result() {
    // Given: a provider whose logout fails
    let provider = ScriptedProvider::new()
        .with_table(
            DatasetKind::DepositRate,
            &["pubDate", "demandDepositRate"],
            &[&["2015-10-24", "0.35"]],
        )
        .failing_logout("already logged out");
    let source = source(&provider);

    // When: deposit rates are requested
    let table = source
        .deposit_rate_data(None, None)
        .expect("logout failure is only logged");

    // Then: the data is returned and logout was attempted
    assert_eq!(table.len(), 1);
    assert!(is_bracketed(&provider.calls()));
}

#[test]
fn panic_inside_a_session_still_logs_out() {
    // Given: a guard over a scripted provider
    let provider = ScriptedProvider::new();
    let guard = SessionGuard::with_config(provider.clone(), &quiet());

    // When: the session body panics
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        guard.with_session::<(), _>(|_| panic!("body failed"))
    }));

    // Then: the panic propagates, logout ran and the slot is free again
    assert!(outcome.is_err());
    assert_eq!(provider.calls(), vec![ProviderCall::Login, ProviderCall::Logout]);
    assert!(!guard.is_active());
    guard
        .with_session(|_| Ok(()))
        .expect("a new session can open after the panic");
}

// =============================================================================
// Contract: validation happens before the provider is contacted
// =============================================================================

#[test]
fn invalid_arguments_never_reach_the_provider() {
    // Given: a scripted provider
    let provider = ScriptedProvider::new();
    let source = source(&provider);

    // When: calls are made with malformed arguments
    let failures = [
        source.profit_data("600000", "2024", 1),
        source.profit_data("sh.600000", "24", 1),
        source.profit_data("sh.600000", "2024", 0),
        source.adjust_factor_data("sh.600000", "2024/01/01", "2024-12-31"),
        source.stock_industry(Some("bad"), None),
        source.money_supply_data_month(Some("2024-13"), None),
        source.money_supply_data_year(Some("2024-01"), None),
    ];

    // Then: each is InvalidInput and no session was opened
    for failure in failures {
        let err = failure.expect_err("argument is malformed");
        assert_eq!(err.kind(), DataErrorKind::InvalidInput);
    }
    assert!(provider.calls().is_empty());
}
