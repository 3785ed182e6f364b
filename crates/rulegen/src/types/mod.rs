mod context;
mod value;

pub use context::DataContext;
pub use value::{Value, parse_decimal};
