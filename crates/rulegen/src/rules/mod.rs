//! Rule maps: the declarative graph the generator walks.

mod error;
mod lint;
mod load;
mod model;
mod template;
mod validate;

pub use error::{LoadError, RuleWarning, ValidationError, compute_suggestions};
pub use lint::{lint_rules, reachable_rules};
pub use load::{load_context, load_rules};
pub use model::{
    Branch, Case, ConditionalRule, DataRule, Format, ROOT_RULE, Rule, RuleMap, display_name,
};
pub use template::{Segment, Template, TemplateError};
pub use validate::{KnownKeys, validate_rules};
