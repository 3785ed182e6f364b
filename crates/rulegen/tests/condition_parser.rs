//! Integration tests for condition parsing and canonical serialization.

use insta::assert_snapshot;
use rulegen::{BinaryOp, ConditionError, Expr, UnaryOp, Value, parse_condition, serialize_condition};

fn canonical(input: &str) -> String {
    serialize_condition(&parse_condition(input).unwrap())
}

fn parse_error(input: &str) -> String {
    match parse_condition(input) {
        Err(ConditionError::Parse(err)) => err.to_string(),
        other => panic!("expected parse error for {input:?}, got {other:?}"),
    }
}

// =============================================================================
// Tree shape
// =============================================================================

#[test]
fn test_logical_precedence() {
    let expr = parse_condition("a || b && c").unwrap();
    assert_eq!(
        expr,
        Expr::binary(
            BinaryOp::Or,
            Expr::Variable("a".into()),
            Expr::binary(
                BinaryOp::And,
                Expr::Variable("b".into()),
                Expr::Variable("c".into())
            )
        )
    );
}

#[test]
fn test_comparison_binds_tighter_than_equality() {
    let expr = parse_condition("1 < 2 == true").unwrap();
    assert_eq!(
        expr,
        Expr::binary(
            BinaryOp::Equal,
            Expr::binary(
                BinaryOp::Less,
                Expr::Literal(Value::Number(1.0)),
                Expr::Literal(Value::Number(2.0))
            ),
            Expr::Literal(Value::Boolean(true))
        )
    );
}

#[test]
fn test_nested_unary() {
    let expr = parse_condition("!-x").unwrap();
    assert_eq!(
        expr,
        Expr::unary(
            UnaryOp::Not,
            Expr::unary(UnaryOp::Negate, Expr::Variable("x".into()))
        )
    );
}

#[test]
fn test_variables_are_collected() {
    let expr = parse_condition("[[test var]] * 2 < 16 && (x + [[test var]] > y)").unwrap();
    let names: Vec<&str> = expr.variables().into_iter().collect();
    assert_eq!(names, vec!["test var", "x", "y"]);
}

// =============================================================================
// Canonical form
// =============================================================================

#[test]
fn test_canonical_spacing_and_parentheses() {
    assert_snapshot!(canonical("((2+3))*[[count]]>=x"), @"(2 + 3) * count >= x");
    assert_snapshot!(canonical("a-(b-c)"), @"a - (b - c)");
    assert_snapshot!(canonical("(a-b)-c"), @"a - b - c");
    assert_snapshot!(canonical("a||(b&&c)"), @"a || b && c");
    assert_snapshot!(canonical("(a||b)&&c"), @"(a || b) && c");
}

#[test]
fn test_canonical_unary() {
    assert_snapshot!(canonical("-(1+2)"), @"-(1 + 2)");
    assert_snapshot!(canonical("!(a == b)"), @"!(a == b)");
    assert_snapshot!(canonical("! ! a"), @"!!a");
}

#[test]
fn test_canonical_literals_and_names() {
    assert_snapshot!(canonical(r"name == 'it\'s'"), @r"name == 'it\'s'");
    assert_snapshot!(canonical("[[first name]] != [[x]]"), @"[[first name]] != x");
    assert_snapshot!(canonical("2.50 + 0"), @"2.5 + 0");
    assert_snapshot!(canonical("false || true"), @"false || true");
}

#[test]
fn test_end_to_end_condition_canonical_form() {
    assert_snapshot!(
        canonical("[[test var]]*2<16&&(x+2*3<14&&cool_beans=='Cool beans!')"),
        @"[[test var]] * 2 < 16 && (x + 2 * 3 < 14 && cool_beans == 'Cool beans!')"
    );
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_empty_condition() {
    assert_snapshot!(parse_error("   "), @"empty condition (token 0, offset 3)");
}

#[test]
fn test_unexpected_end_of_input() {
    assert_snapshot!(parse_error("1 +"), @"unexpected end of input (token 2, offset 3)");
}

#[test]
fn test_missing_close_paren() {
    assert_snapshot!(
        parse_error("(1 + 2"),
        @"expected ')' to close '(' at offset 0, found end of input (token 4, offset 6)"
    );
}

#[test]
fn test_unmatched_close_paren() {
    assert_snapshot!(parse_error("1 + 2)"), @"unmatched ')' (token 3, offset 5)");
}

#[test]
fn test_operator_where_operand_expected() {
    assert_snapshot!(
        parse_error("x == * 3"),
        @"expected an operand, found operator '*' (token 2, offset 5)"
    );
}

#[test]
fn test_deep_nesting_is_an_error() {
    let nested = format!("{}1{}", "(".repeat(2000), ")".repeat(2000));
    assert_snapshot!(
        parse_error(&nested),
        @"condition nested too deeply (token 128, offset 128)"
    );
}

#[test]
fn test_trailing_tokens() {
    assert_snapshot!(
        parse_error("x 3"),
        @"expected an operator, found number 3 (token 1, offset 2)"
    );
}

#[test]
fn test_lex_errors_pass_through() {
    assert!(matches!(
        parse_condition("x = 3"),
        Err(ConditionError::Lex(_))
    ));
    assert_eq!(parse_condition("'open").unwrap_err().offset(), 0);
}
