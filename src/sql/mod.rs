//! SQL text for the store: identifiers come from code only, values are always parameters.

mod builder;
pub use builder::*;
