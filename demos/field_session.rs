use std::time::{Duration, Instant};

use strategy_expr::remote::{
    ExpressionField, FieldConfig, IndicatorConfig, RemoteError, RemoteRequest, RemoteResponse,
};
use strategy_expr::ConditionCatalog;
use tracing_subscriber::EnvFilter;

/// Stand-in for an HTTP call: rejects RSI periods shorter than 5 and fails
/// outright for expressions mentioning `ema`.
fn fake_server(request: &RemoteRequest) -> Result<RemoteResponse, RemoteError> {
    if request.expression.contains("ema") {
        return Err(RemoteError::Status(503));
    }
    let short_period = request.indicators.iter().any(|i| {
        i.id == "rsi"
            && i
                .parameters
                .get("period")
                .and_then(|v| v.as_f64())
                .is_some_and(|p| p < 5.0)
    });
    if short_period {
        Ok(RemoteResponse::invalid("rsi period must be at least 5", None))
    } else {
        Ok(RemoteResponse::valid())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("strategy_expr=debug"))
        .init();

    let catalog = ConditionCatalog::new()
        .indicator("rsi", [("rsi_oversold", "RSI below 30")])
        .indicator("ema", [("ema_cross_up", "fast EMA crosses above slow EMA")]);
    let indicators = vec![
        IndicatorConfig::new("rsi").param("period", 3_i64),
        IndicatorConfig::new("ema").param("fast", 9_i64).param("slow", 21_i64),
    ];

    let mut field =
        ExpressionField::new(FieldConfig::default().with_debounce(Duration::from_millis(300)));
    let t0 = Instant::now();
    let at = |ms: u64| t0 + Duration::from_millis(ms);

    // Keystrokes: each edit validates locally and restarts the debounce window.
    for (ms, text) in [(0, "rsi_"), (100, "rsi_oversold"), (200, "rsi_oversold AND")] {
        let verdict = field.edit(text, at(ms), &catalog);
        println!("[{ms:>4} ms] {text:<32} local: {verdict}");
    }

    // Invalid locally, so nothing is sent.
    assert!(field.poll_remote(at(600), &indicators).is_none());

    field.edit("rsi_oversold", at(700), &catalog);
    let stale = field.poll_remote(at(1_000), &indicators);

    // The user edits again before the response arrives.
    field.edit("rsi_oversold OR ema_cross_up", at(1_050), &catalog);
    if let Some(ticket) = stale {
        let outcome = fake_server(ticket.request());
        let applied = field.apply_remote(&ticket, outcome);
        println!("[1100 ms] stale response applied: {applied}");
    }

    // The newer text fails remotely; the local verdict stands.
    field.validate_remote(&fake_server, at(1_400), &indicators);
    println!("[1400 ms] {:<32} shown: {}", field.source(), field.result());

    field.edit("rsi_oversold", at(1_500), &catalog);
    field.validate_remote(&fake_server, at(1_800), &indicators);
    println!("[1800 ms] {:<32} shown: {}", field.source(), field.result());
}
