//! Property tests: canonical serialization preserves meaning.

use proptest::prelude::*;
use rulegen::{
    BinaryOp, DataContext, Expr, UnaryOp, Value, evaluate, parse_condition, serialize_condition,
};

const VARIABLES: &[&str] = &["x", "test var", "flag", "name", "true"];

const BINARY_OPS: &[BinaryOp] = &[
    BinaryOp::Or,
    BinaryOp::And,
    BinaryOp::Equal,
    BinaryOp::NotEqual,
    BinaryOp::Less,
    BinaryOp::LessEqual,
    BinaryOp::Greater,
    BinaryOp::GreaterEqual,
    BinaryOp::Add,
    BinaryOp::Subtract,
    BinaryOp::Multiply,
    BinaryOp::Divide,
    BinaryOp::Remainder,
];

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Boolean),
        (0u32..400).prop_map(|n| Value::Number(f64::from(n) / 4.0)),
        (1u32..400).prop_map(|n| Value::Number(-f64::from(n) / 4.0)),
        "[a-z' !]{0,6}".prop_map(Value::String),
        (0u32..20).prop_map(|n| Value::String(n.to_string())),
    ]
}

fn arb_expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        arb_value().prop_map(Expr::Literal),
        prop::sample::select(VARIABLES).prop_map(|name| Expr::Variable(name.to_string())),
    ];
    leaf.prop_recursive(5, 48, 2, |inner| {
        prop_oneof![
            (
                prop::sample::select(vec![UnaryOp::Not, UnaryOp::Negate]),
                inner.clone()
            )
                .prop_map(|(op, operand)| Expr::unary(op, operand)),
            (prop::sample::select(BINARY_OPS), inner.clone(), inner)
                .prop_map(|(op, left, right)| Expr::binary(op, left, right)),
        ]
    })
}

fn arb_context() -> impl Strategy<Value = DataContext> {
    prop::collection::vec(arb_value(), VARIABLES.len()).prop_map(|values| {
        VARIABLES
            .iter()
            .copied()
            .zip(values)
            .collect::<DataContext>()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn serialized_condition_evaluates_identically(expr in arb_expr(), data in arb_context()) {
        let text = serialize_condition(&expr);
        let reparsed = parse_condition(&text);
        prop_assert!(reparsed.is_ok(), "failed to re-parse {:?}: {:?}", text, reparsed);
        let reparsed = reparsed.unwrap();
        prop_assert_eq!(evaluate(&expr, &data), evaluate(&reparsed, &data), "canonical form {}", text);
    }

    #[test]
    fn canonical_form_is_stable(expr in arb_expr()) {
        let once = parse_condition(&serialize_condition(&expr)).unwrap();
        let twice = parse_condition(&serialize_condition(&once)).unwrap();
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(serialize_condition(&once), serialize_condition(&twice));
    }
}
