use strategy_expr::{
    build_display_tree, enumerate_truth_table, evaluate, parse, validate_local, Bindings,
    ConditionCatalog, DisplayGroup, DisplayItem,
};
use tracing_subscriber::EnvFilter;

fn print_tree(group: &DisplayGroup, indent: usize) {
    for entry in group.entries() {
        let pad = " ".repeat(indent);
        let op = entry.operator.map_or(String::new(), |op| format!("{op} "));
        match &entry.item {
            DisplayItem::Condition(c) => println!(
                "{pad}{op}{} - {}",
                c.name,
                c.description.as_deref().unwrap_or("?")
            ),
            DisplayItem::Group(g) => {
                println!("{pad}{op}group");
                print_tree(g, indent + 2);
            }
        }
    }
}

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
        .indicator("macd", [("macd_cross_up", "MACD crosses above signal")])
        .indicator("ema", [("ema_cross_up", "fast EMA crosses above slow EMA")]);

    for source in [
        "",
        "(rsi_oversold AND macd_cross_up) OR ema_cross_up",
        "(rsi_oversold AND",
        "foo AND bar",
        "rsi_oversold AND AND ema_cross_up",
    ] {
        println!("{source:?}: {}", validate_local(source, &catalog));
    }

    let expr = parse("(rsi_oversold AND macd_cross_up) OR ema_cross_up")
        .expect("expression should parse");

    let bar = Bindings::new()
        .set("rsi_oversold", true)
        .set("macd_cross_up", false)
        .set("ema_cross_up", true);
    match evaluate(&expr, &bar) {
        Ok(value) => println!("\n{expr} => {value}"),
        Err(err) => println!("\nevaluation failed: {err}"),
    }

    println!("\nDisplay tree:");
    print_tree(&build_display_tree(&expr, &catalog), 2);

    let conditions = expr.conditions();
    if let Ok(Some(table)) = enumerate_truth_table(&expr, &conditions) {
        println!("\nTruth table:\n{table}");
    }
}
