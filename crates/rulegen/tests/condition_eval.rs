//! Integration tests for condition evaluation.

use rulegen::{
    BinaryOp, DataContext, EvalError, Value, context, evaluate, evaluate_condition,
    parse_condition,
};

fn eval(input: &str, data: &DataContext) -> Result<Value, EvalError> {
    evaluate(&parse_condition(input).unwrap(), data)
}

fn holds(input: &str, data: &DataContext) -> bool {
    evaluate_condition(&parse_condition(input).unwrap(), data).unwrap()
}

// =============================================================================
// Arithmetic and precedence
// =============================================================================

#[test]
fn test_precedence() {
    let data = DataContext::new();
    assert!(holds("2+3*4<20", &data));
    assert!(!holds("(2+3)*4<20", &data));
}

#[test]
fn test_arithmetic_values() {
    let data = DataContext::new();
    assert_eq!(eval("7 % 4 + 10 / 4", &data), Ok(Value::Number(5.5)));
    assert_eq!(eval("-2 - -3", &data), Ok(Value::Number(1.0)));
    assert_eq!(eval("7.5 % 2", &data), Ok(Value::Number(1.5)));
}

#[test]
fn test_booleans_coerce_to_numbers() {
    let data = DataContext::new();
    assert_eq!(eval("true + true", &data), Ok(Value::Number(2.0)));
}

#[test]
fn test_numeric_strings_coerce_in_arithmetic() {
    let data = context! { "x" => " 7 " };
    assert_eq!(eval("x * 2", &data), Ok(Value::Number(14.0)));
}

#[test]
fn test_no_string_concatenation() {
    let data = context! { "name" => "Ada" };
    assert_eq!(
        eval("name + 1", &data),
        Err(EvalError::TypeMismatch {
            operator: "+",
            found: "string 'Ada'".to_string()
        })
    );
}

#[test]
fn test_division_by_zero() {
    let data = DataContext::new();
    assert_eq!(
        eval("1/0>0", &data),
        Err(EvalError::DivisionByZero {
            operator: BinaryOp::Divide
        })
    );
    assert_eq!(
        eval("5 % 0", &data),
        Err(EvalError::DivisionByZero {
            operator: BinaryOp::Remainder
        })
    );
}

// =============================================================================
// Equality and comparison
// =============================================================================

#[test]
fn test_number_string_equality() {
    assert!(holds("x==7", &context! { "x" => "7" }));
    assert!(!holds("x==7", &context! { "x" => "abc" }));
    assert!(holds("x!=7", &context! { "x" => "abc" }));
    assert!(holds("x=='7.0'", &context! { "x" => 7 }));
}

#[test]
fn test_string_equality_is_textual() {
    let data = context! { "a" => "7.0", "b" => "7" };
    assert!(!holds("a == b", &data));
    assert!(holds("a == 'Cool beans!' || a == '7.0'", &data));
}

#[test]
fn test_boolean_equality_compares_truthiness() {
    let data = context! { "flag" => true, "name" => "Ada", "zero" => 0 };
    assert!(holds("flag == 1", &data));
    assert!(holds("name == true", &data));
    assert!(holds("zero == false", &data));
}

#[test]
fn test_relational_needs_numbers() {
    let data = context! { "name" => "Ada", "age" => "36" };
    assert!(holds("age >= 18", &data));
    assert!(matches!(
        eval("name < 3", &data),
        Err(EvalError::TypeMismatch { operator: "<", .. })
    ));
}

// =============================================================================
// Logic
// =============================================================================

#[test]
fn test_short_circuit_and() {
    let data = DataContext::new();
    assert_eq!(eval("false && [[missing]]", &data), Ok(Value::Boolean(false)));
}

#[test]
fn test_short_circuit_or() {
    let data = DataContext::new();
    assert_eq!(eval("1 || 1 / 0", &data), Ok(Value::Boolean(true)));
}

#[test]
fn test_logic_without_short_circuit_evaluates_right() {
    let data = DataContext::new();
    assert_eq!(
        eval("true && [[missing]]", &data),
        Err(EvalError::UndefinedVariable {
            name: "missing".to_string()
        })
    );
}

#[test]
fn test_not_and_truthiness() {
    let data = context! { "empty" => "", "name" => "Ada" };
    assert_eq!(eval("!empty", &data), Ok(Value::Boolean(true)));
    assert_eq!(eval("!name", &data), Ok(Value::Boolean(false)));
    assert!(!holds("0", &data));
    assert!(holds("'0'", &data));
}

#[test]
fn test_end_to_end_condition() {
    let data = context! {
        "test var" => 7,
        "x" => "7",
        "cool_beans" => "Cool beans!",
    };
    assert!(holds(
        "[[test var]]*2<16&&(x+2*3<14&&cool_beans=='Cool beans!')",
        &data
    ));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_error_messages() {
    let data = DataContext::new();
    assert_eq!(
        eval("1 / 0", &data).unwrap_err().to_string(),
        "division by zero in '/'"
    );
    assert_eq!(
        eval("nope", &data).unwrap_err().to_string(),
        "undefined variable 'nope'"
    );
}
