use super::*;

fn filters() -> FilterRegistry {
    FilterRegistry::with_builtins()
}

#[test]
fn filters_bind_looser_than_arithmetic() {
    let f = filters();
    let e = parse_expr("0.2 + 3.4 | round", &f).unwrap();
    let Expr::Filter { id, args } = e else {
        panic!("expected filter at the root");
    };
    assert_eq!(Some(id), f.get_id("round"));
    let Expr::Binary { op, .. } = &args[0] else {
        panic!("expected arithmetic inside the filter");
    };
    assert_eq!(*op, BinaryOp::Add);
}

#[test]
fn ternary_branches_are_full_expressions() {
    let f = filters();
    let e = parse_expr("a ? b : c | to_upper", &f).unwrap();
    let Expr::Ternary { otherwise, .. } = e else {
        panic!("expected ternary");
    };
    assert!(matches!(*otherwise, Expr::Filter { .. }));

    let nested = parse_expr("a ? b ? 1 : 2 : 3", &f).unwrap();
    let Expr::Ternary { then, .. } = nested else {
        panic!("expected ternary");
    };
    assert!(matches!(*then, Expr::Ternary { .. }));
}

#[test]
fn call_syntax_is_a_filter_with_explicit_first_argument() {
    let f = filters();
    let e = parse_expr("format(3.0001, 2, true)", &f).unwrap();
    let Expr::Filter { args, .. } = e else {
        panic!("expected filter");
    };
    assert_eq!(args.len(), 3);
}

#[test]
fn variable_paths_collect_members_and_indices() {
    let e = parse_expr("rows[2].title", &filters()).unwrap();
    assert_eq!(e, Expr::Var(DataAddress::parse("rows[2].title").unwrap()));
}

#[test]
fn unknown_filters_fail_at_parse_time() {
    let f = filters();
    let err = parse_expr("'x' | shout", &f).unwrap_err();
    assert_eq!(err.offset, 6);
    assert!(err.message.contains("shout"));
    assert!(parse_expr("shout('x')", &f).is_err());
}

#[test]
fn malformed_expressions_are_rejected() {
    let f = filters();
    for bad in ["", "1 +", "(1", "a ? b", "a[x]", "a[-1]", "1 2", "a = 1"] {
        assert!(parse_expr(bad, &f).is_err(), "{bad:?} should not parse");
    }
}

#[test]
fn assignment_mode_accepts_statements_and_events() {
    let f = filters();
    let stmts = parse_assignment("radius = 4; color_name = 'x'; clicked(1, 2);", &f).unwrap();
    assert_eq!(stmts.len(), 3);
    let Stmt::Assign { target, .. } = &stmts[0] else {
        panic!("expected an assignment first");
    };
    assert_eq!(target.root_name(), "radius");
    let Stmt::Event { name, args } = &stmts[2] else {
        panic!("expected an event call last");
    };
    assert_eq!(name, "clicked");
    assert_eq!(args.len(), 2);

    assert!(parse_assignment("", &f).is_err());
    assert!(parse_assignment("radius == 4", &f).is_err());
    assert!(parse_assignment("size = 4", &f).is_err());
    assert!(parse_assignment("1 = 4", &f).is_err());
}

#[test]
fn runaway_nesting_is_a_parse_error() {
    let f = filters();
    let shallow = format!("{}1{}", "(".repeat(40), ")".repeat(40));
    assert!(parse_expr(&shallow, &f).is_ok());
    assert!(parse_expr(&format!("{}true", "!".repeat(100)), &f).is_ok());

    let bangs = format!("{}true", "!".repeat(10_000));
    let err = parse_expr(&bangs, &f).unwrap_err();
    assert!(err.message.contains("nested deeper"));

    let parens = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
    assert!(parse_expr(&parens, &f).is_err());

    let ternaries = format!("{}0", "a ? 1 : ".repeat(10_000));
    assert!(parse_expr(&ternaries, &f).is_err());
}
