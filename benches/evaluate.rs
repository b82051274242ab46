use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strategy_expr::{
    build_display_tree, enumerate_truth_table, evaluate, parse, validate_local, Bindings,
    ConditionCatalog, IndexedBindings, Signal, SignalRules,
};

/// Expression text over `n` conditions alternating `AND`/`OR`, with a
/// parenthesized pair every few terms.
fn chain_source(n: usize) -> String {
    let mut terms = Vec::new();
    let mut i = 0;
    while i < n {
        if i % 5 == 0 && i + 1 < n {
            terms.push(format!("(c{i} AND c{})", i + 1));
            i += 2;
        } else {
            terms.push(format!("c{i}"));
            i += 1;
        }
    }

    let mut out = String::new();
    for (k, term) in terms.iter().enumerate() {
        if k > 0 {
            out.push_str(if k % 2 == 0 { " OR " } else { " AND " });
        }
        out.push_str(term);
    }
    out
}

fn catalog(n: usize) -> ConditionCatalog {
    (0..n).map(|i| (format!("c{i}"), format!("condition {i}"))).collect()
}

fn bindings(n: usize) -> Bindings {
    let mut b = Bindings::new();
    for i in 0..n {
        b.insert(&format!("c{i}"), i % 3 != 0);
    }
    b
}

fn build_rules(n: usize) -> (SignalRules, IndexedBindings) {
    let rules = SignalRules::builder()
        .rule(Signal::Long, &chain_source(n), 0)
        .compile()
        .unwrap();
    let mut builder = rules.bindings_builder();
    for i in 0..n {
        builder.insert(&format!("c{i}"), i % 3 != 0);
    }
    let indexed = builder.build();
    (rules, indexed)
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_eval");

    for &n in &[5, 20, 50] {
        let expr = parse(&chain_source(n)).unwrap();
        let b = bindings(n);
        group.bench_function(&format!("{n}_conditions_map"), |bench| {
            bench.iter(|| evaluate(black_box(&expr), black_box(&b)));
        });

        let (rules, indexed) = build_rules(n);
        group.bench_function(&format!("{n}_conditions_indexed"), |bench| {
            bench.iter(|| rules.signal_indexed(black_box(&indexed)));
        });
    }

    group.finish();
}

fn bench_keystroke(c: &mut Criterion) {
    let mut group = c.benchmark_group("keystroke");

    for &n in &[5, 20, 50] {
        let source = chain_source(n);
        let cat = catalog(n);

        group.bench_function(&format!("{n}_conditions_validate_local"), |b| {
            b.iter(|| validate_local(black_box(&source), black_box(&cat)));
        });

        group.bench_function(&format!("{n}_conditions_display_tree"), |b| {
            b.iter(|| {
                let expr = parse(black_box(&source)).unwrap();
                build_display_tree(&expr, &cat)
            });
        });
    }

    group.finish();
}

fn bench_truth_table(c: &mut Criterion) {
    let expr = parse("(rsi_oversold AND macd_cross_up) OR ema_cross_up AND volume_spike").unwrap();
    let conditions = expr.conditions();
    c.bench_function("truth_table_4_conditions", |b| {
        b.iter(|| enumerate_truth_table(black_box(&expr), black_box(&conditions)));
    });
}

criterion_group!(benches, bench_evaluate, bench_keystroke, bench_truth_table);
criterion_main!(benches);
