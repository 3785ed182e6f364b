pub mod condition;
pub mod generator;
pub mod rules;
pub mod types;

pub use condition::{
    BinaryOp, ConditionError, EvalError, Expr, LexError, ParseError, Token, TokenKind, UnaryOp,
    evaluate, evaluate_condition, parse_condition, serialize_condition, tokenize,
};
pub use generator::{
    FormatError, GenerateOptions, Generation, GenerationError, StateCount, count_states,
    generate, generate_with,
};
pub use rules::{
    Branch, Case, ConditionalRule, DataRule, Format, KnownKeys, LoadError, ROOT_RULE, Rule,
    RuleMap, RuleWarning, Segment, Template, TemplateError, ValidationError, compute_suggestions,
    display_name, lint_rules, load_context, load_rules, validate_rules,
};
pub use types::{DataContext, Value};

/// Creates a [`DataContext`] from key-value pairs.
///
/// Values are converted via `Into<Value>`, so numbers, strings and booleans
/// can be passed directly.
///
/// # Example
///
/// ```
/// use rulegen::{Value, context};
///
/// let data = context! { "test var" => 7, "x" => "7", "adult" => true };
/// assert_eq!(data.len(), 3);
/// assert_eq!(data.get("test var"), Some(&Value::Number(7.0)));
/// ```
#[macro_export]
macro_rules! context {
    {} => {
        $crate::DataContext::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut data = $crate::DataContext::new();
            $(
                data.insert($key, ::std::convert::Into::<$crate::Value>::into($value));
            )+
            data
        }
    };
}
