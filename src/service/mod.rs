//! Request-independent rules: credential shape checks and single-field updates.

pub mod fields;
pub mod validation;
pub use fields::{AccountField, EntryField, FieldUpdate, FieldValue, SheetField, UpdatableField, UpdateBody};
