use std::sync::Arc;
use std::thread;

use strategy_expr::{Bindings, Signal, SignalRules};

fn rules() -> SignalRules {
    SignalRules::builder()
        .rule(Signal::Short, "rsi_overbought AND macd_cross_down", 0)
        .rule(
            Signal::Long,
            "(rsi_oversold AND macd_cross_up) OR ema_cross_up",
            10,
        )
        .compile()
        .unwrap()
}

fn bar(overbought: bool, cross_down: bool, oversold: bool, cross_up: bool, ema: bool) -> Bindings {
    Bindings::new()
        .set("rsi_overbought", overbought)
        .set("macd_cross_down", cross_down)
        .set("rsi_oversold", oversold)
        .set("macd_cross_up", cross_up)
        .set("ema_cross_up", ema)
}

#[test]
fn evaluate_across_threads() {
    let rules = Arc::new(rules());

    let cases = vec![
        (bar(true, true, false, false, true), Signal::Short),
        (bar(false, false, true, true, false), Signal::Long),
        (bar(false, false, false, false, true), Signal::Long),
        (bar(true, false, true, false, false), Signal::Cash),
    ];

    let handles: Vec<_> = cases
        .into_iter()
        .map(|(bindings, expected)| {
            let rules = Arc::clone(&rules);
            thread::spawn(move || (rules.signal(&bindings), expected))
        })
        .collect();

    for handle in handles {
        let (got, expected) = handle.join().unwrap();
        assert_eq!(got, Ok(expected));
    }
}

#[test]
fn indexed_path_across_threads() {
    let rules = Arc::new(rules());

    let handles: Vec<_> = (0..8_u32)
        .map(|seed| {
            let rules = Arc::clone(&rules);
            thread::spawn(move || {
                let mut long = 0_u32;
                for i in 0..1_000_u32 {
                    let v = i.wrapping_mul(2_654_435_761).wrapping_add(seed);
                    let bindings = rules
                        .bindings_builder()
                        .set("rsi_overbought", v & 1 != 0)
                        .set("macd_cross_down", v & 2 != 0)
                        .set("rsi_oversold", v & 4 != 0)
                        .set("macd_cross_up", v & 8 != 0)
                        .set("ema_cross_up", v & 16 != 0)
                        .build();
                    let map = bar(v & 1 != 0, v & 2 != 0, v & 4 != 0, v & 8 != 0, v & 16 != 0);

                    let indexed = rules.signal_indexed(&bindings).unwrap();
                    assert_eq!(indexed, rules.signal(&map).unwrap());
                    if indexed == Signal::Long {
                        long += 1;
                    }
                }
                long
            })
        })
        .collect();

    let total: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert!(total > 0);
}

#[test]
fn rules_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SignalRules>();
    assert_send_sync::<strategy_expr::Expression>();
    assert_send_sync::<strategy_expr::remote::ExpressionField>();
}
