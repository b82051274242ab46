use std::sync::Arc;
use std::thread;

use strategy_expr::{ConditionCatalog, Signal, SignalRules};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let catalog = ConditionCatalog::new()
        .indicator(
            "rsi",
            [
                ("rsi_oversold", "RSI below 30"),
                ("rsi_overbought", "RSI above 70"),
            ],
        )
        .indicator(
            "macd",
            [
                ("macd_cross_up", "MACD crosses above signal"),
                ("macd_cross_down", "MACD crosses below signal"),
            ],
        );

    // Exits are checked before entries.
    let rules = SignalRules::builder()
        .rule(Signal::Short, "rsi_overbought AND macd_cross_down", 0)
        .rule(Signal::Long, "rsi_oversold AND macd_cross_up", 10)
        .compile_with_catalog(&catalog)
        .expect("failed to compile signal rules");

    println!("{rules}");
    for (signal, priority) in rules.rule_order() {
        if let Some(expr) = rules.expression(signal) {
            println!("  {signal} (priority {priority}): {expr}");
        }
    }

    // A toy series of bars, each a tuple of
    // (oversold, overbought, cross_up, cross_down).
    let bars = [
        (false, false, false, false),
        (true, false, false, false),
        (true, false, true, false),
        (false, false, true, false),
        (false, true, false, true),
        (false, true, false, false),
    ];

    let rules = Arc::new(rules);
    let halves: Vec<_> = bars
        .chunks(3)
        .enumerate()
        .map(|(part, chunk)| {
            let rules = Arc::clone(&rules);
            let chunk = chunk.to_vec();
            thread::spawn(move || {
                chunk
                    .into_iter()
                    .enumerate()
                    .map(|(i, (oversold, overbought, up, down))| {
                        let bar = rules
                            .bindings_builder()
                            .set("rsi_oversold", oversold)
                            .set("rsi_overbought", overbought)
                            .set("macd_cross_up", up)
                            .set("macd_cross_down", down)
                            .build();
                        (part * 3 + i, rules.signal_indexed(&bar))
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in halves {
        for (bar, signal) in handle.join().expect("worker panicked") {
            match signal {
                Ok(signal) => println!("bar {bar}: {signal}"),
                Err(err) => println!("bar {bar}: {err}"),
            }
        }
    }
}
