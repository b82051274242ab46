use strategy_expr::{
    build_display_tree, check_local, enumerate_truth_table, evaluate, parse, tokenize,
    validate_local, Bindings, ConditionCatalog, EvalError, ExpressionError, ParseErrorKind,
    Signal, SignalRules, TokenKind, MAX_NESTING, MAX_TRUTH_TABLE_CONDITIONS,
};

fn abc() -> ConditionCatalog {
    [("a", "first"), ("b", "second"), ("c", "third")]
        .into_iter()
        .collect()
}

fn parse_error(source: &str) -> (ParseErrorKind, usize) {
    match check_local(source, &abc()) {
        Err(ExpressionError::Parse(err)) => (err.kind(), err.position()),
        other => panic!("expected a parse error for {source:?}, got {other:?}"),
    }
}

#[test]
fn whitespace_only_is_valid() {
    assert!(validate_local(" \t\r\n ", &abc()).is_valid());
}

#[test]
fn junk_characters_are_skipped_by_the_tokenizer() {
    let tokens = tokenize("a && b || c");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Identifier]
    );
    // Without operators the second name has nowhere to go.
    assert_eq!(parse_error("a && b").0, ParseErrorKind::UnexpectedToken);
}

#[test]
fn reserved_words_are_never_identifiers() {
    let tokens = tokenize("and or AND Or");
    assert!(tokens.iter().all(|t| t.is_operator()));
    // Longer words that merely start with a keyword stay identifiers.
    let tokens = tokenize("android order");
    assert!(tokens.iter().all(|t| t.kind == TokenKind::Identifier));
}

#[test]
fn positions_are_character_offsets() {
    let tokens = tokenize("é a AND b");
    assert_eq!(tokens[0].text, "a");
    assert_eq!(tokens[0].position, 2);
    assert_eq!(tokens[1].position, 4);
}

#[test]
fn empty_group() {
    assert_eq!(parse_error("a AND ()"), (ParseErrorKind::EmptyGroup, 6));
}

#[test]
fn leading_operator() {
    assert_eq!(parse_error("AND a"), (ParseErrorKind::DanglingOperator, 0));
    assert_eq!(parse_error("(OR a)"), (ParseErrorKind::DanglingOperator, 1));
}

#[test]
fn operator_before_close_paren() {
    assert_eq!(parse_error("(a OR) AND b"), (ParseErrorKind::DanglingOperator, 5));
}

#[test]
fn stray_close_paren() {
    assert_eq!(parse_error("a) AND b"), (ParseErrorKind::UnbalancedParens, 1));
    assert_eq!(parse_error("(a))"), (ParseErrorKind::UnbalancedParens, 3));
}

#[test]
fn unclosed_open_paren() {
    assert_eq!(parse_error("(a AND (b OR c)"), (ParseErrorKind::UnbalancedParens, 0));
}

#[test]
fn adjacent_conditions() {
    assert_eq!(parse_error("a b"), (ParseErrorKind::UnexpectedToken, 2));
    assert_eq!(parse_error("(a) (b)"), (ParseErrorKind::UnexpectedToken, 4));
}

#[test]
fn deeply_nested_groups() {
    let depth = 64;
    let source = format!("{}a{}", "(".repeat(depth), ")".repeat(depth));
    let expr = parse(&source).unwrap();
    assert_eq!(expr.node_count(), depth + 1);
    assert_eq!(expr.to_string(), source);

    let tree = build_display_tree(&expr, &abc());
    assert_eq!(tree.depth(), depth + 1);
    assert_eq!(evaluate(&expr, &Bindings::new().set("a", true)), Ok(true));
}

#[test]
fn pasted_deep_nesting_is_an_ordinary_error() {
    let balanced = format!("{}a{}", "(".repeat(5_000), ")".repeat(5_000));
    let verdict = validate_local(&balanced, &ConditionCatalog::new());
    assert!(!verdict.is_valid());
    assert_eq!(verdict.error_position(), Some(MAX_NESTING));
    assert_eq!(parse_error(&balanced), (ParseErrorKind::NestingTooDeep, MAX_NESTING));

    let unclosed = "(".repeat(200_000);
    let verdict = validate_local(&unclosed, &ConditionCatalog::new());
    assert!(!verdict.is_valid());
    assert_eq!(verdict.error_position(), Some(MAX_NESTING));
}

#[test]
fn pasted_long_chain_validates_and_renders() {
    let source = vec!["a"; 50_000].join(" OR ");
    assert!(validate_local(&source, &abc()).is_valid());

    let expr = parse(&source).unwrap();
    assert_eq!(expr.to_string(), source);
    assert_eq!(build_display_tree(&expr, &abc()).entries().len(), 50_000);
    assert_eq!(evaluate(&expr, &Bindings::new().set("a", false)), Ok(false));
}

#[test]
fn long_flat_chain() {
    let names: Vec<String> = (0..200).map(|i| format!("c{i}")).collect();
    let source = names.join(" AND ");
    let expr = parse(&source).unwrap();

    let all_true: Bindings = names.iter().map(|n| (n.as_str(), true)).collect();
    assert_eq!(evaluate(&expr, &all_true), Ok(true));

    let one_false = all_true.set("c199", false);
    assert_eq!(evaluate(&expr, &one_false), Ok(false));

    let tree = build_display_tree(&expr, &ConditionCatalog::new());
    assert_eq!(tree.depth(), 1);
    assert_eq!(tree.entries().len(), 200);
}

#[test]
fn repeated_condition_needs_one_binding() {
    let expr = parse("a OR (a AND a)").unwrap();
    assert_eq!(expr.conditions(), vec!["a"]);
    let table = enumerate_truth_table(&expr, &["a"]).unwrap().unwrap();
    assert_eq!(table.rows().len(), 2);
    assert_eq!(table.true_count(), 1);
}

#[test]
fn truth_table_cap_is_exact() {
    assert_eq!(MAX_TRUTH_TABLE_CONDITIONS, 4);
    let expr = parse("a").unwrap();
    let five = ["a", "b", "c", "d", "e"];
    assert!(enumerate_truth_table(&expr, &five).unwrap().is_none());
    assert!(enumerate_truth_table(&expr, &five[..4]).unwrap().is_some());
    let empty_table = enumerate_truth_table(&parse("a").unwrap(), &[]);
    assert_eq!(empty_table, Err(EvalError::MissingBinding { name: "a".into() }));
}

#[test]
fn extra_bindings_are_ignored() {
    let expr = parse("a").unwrap();
    let bindings = Bindings::new().set("a", false).set("unrelated", true);
    assert_eq!(evaluate(&expr, &bindings), Ok(false));
}

#[test]
fn signal_rules_fallback_when_nothing_fires() {
    let rules = SignalRules::builder()
        .rule(Signal::Long, "a AND b", 0)
        .rule(Signal::Short, "c", 1)
        .compile()
        .unwrap();
    let bar = Bindings::new().set("a", true).set("b", false).set("c", false);
    assert_eq!(rules.signal(&bar), Ok(Signal::Cash));
}

#[test]
fn signal_rules_custom_fallback() {
    let rules = SignalRules::builder()
        .rule(Signal::Long, "a", 0)
        .fallback(Signal::Short)
        .compile()
        .unwrap();
    assert_eq!(rules.signal(&Bindings::new().set("a", false)), Ok(Signal::Short));
}
