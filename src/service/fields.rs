//! Single-field updates (`PATCH {col, val}`) against a closed set of columns per resource.
//!
//! The caller names a column; it is checked against a denylist of identity/ownership columns and
//! then resolved to a variant of the resource's field enum. Only the enum's `&'static str` column
//! name is ever placed into SQL, and values are always bound as parameters.

use crate::error::FieldError;
use crate::service::validation::in_length_range;
use serde::Deserialize;
use serde_json::Value;

/// Body of every field-update endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBody {
    #[serde(default)]
    pub col: Option<String>,
    #[serde(default)]
    pub val: Option<Value>,
}

/// Bound value for an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
}

/// Column kinds an updatable field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Text with a maximum length in characters.
    Text { max: usize },
    Int,
}

/// A resource's updatable columns.
pub trait UpdatableField: Copy + Send + Sync + std::fmt::Debug + 'static {
    /// Columns that can never be changed through a field update.
    const FORBIDDEN: &'static [&'static str];

    /// Resolve a normalised (snake_case) column name.
    fn from_column(name: &str) -> Option<Self>;

    fn column(self) -> &'static str;

    fn kind(self) -> FieldKind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    Name,
    Surname,
}

impl UpdatableField for AccountField {
    const FORBIDDEN: &'static [&'static str] = &["id", "email", "password"];

    fn from_column(name: &str) -> Option<Self> {
        match name {
            "name" | "first_name" => Some(AccountField::Name),
            "surname" | "last_name" => Some(AccountField::Surname),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            AccountField::Name => "name",
            AccountField::Surname => "surname",
        }
    }

    fn kind(self) -> FieldKind {
        FieldKind::Text { max: 50 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetField {
    Name,
}

impl UpdatableField for SheetField {
    const FORBIDDEN: &'static [&'static str] = &["id", "user_id"];

    fn from_column(name: &str) -> Option<Self> {
        match name {
            "name" => Some(SheetField::Name),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        "name"
    }

    fn kind(self) -> FieldKind {
        FieldKind::Text { max: 100 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Name,
    MarkCount,
    LastMark,
}

impl UpdatableField for EntryField {
    const FORBIDDEN: &'static [&'static str] = &["id", "sheet_id"];

    fn from_column(name: &str) -> Option<Self> {
        match name {
            "name" => Some(EntryField::Name),
            "mark_count" => Some(EntryField::MarkCount),
            "last_mark" => Some(EntryField::LastMark),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            EntryField::Name => "name",
            EntryField::MarkCount => "mark_count",
            EntryField::LastMark => "last_mark",
        }
    }

    fn kind(self) -> FieldKind {
        match self {
            EntryField::Name => FieldKind::Text { max: 100 },
            EntryField::MarkCount | EntryField::LastMark => FieldKind::Int,
        }
    }
}

/// A validated single-column update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate<F> {
    pub field: F,
    pub value: FieldValue,
}

impl<F: UpdatableField> FieldUpdate<F> {
    /// Checks, in order: denylist, column present, value present and truthy, column known,
    /// value fits the column.
    pub fn parse(body: &UpdateBody) -> Result<Self, FieldError> {
        let raw = body.col.as_deref().map(str::trim).unwrap_or_default();
        let column = normalize_column(raw);
        if F::FORBIDDEN.contains(&column.as_str()) {
            return Err(FieldError::Forbidden(raw.to_string()));
        }
        if column.is_empty() {
            return Err(FieldError::MissingField);
        }
        let value = match &body.val {
            Some(v) if is_truthy(v) => v,
            _ => return Err(FieldError::MissingValue),
        };
        let field = F::from_column(&column).ok_or_else(|| FieldError::Unknown(raw.to_string()))?;
        let value = coerce(field, value)?;
        Ok(FieldUpdate { field, value })
    }
}

/// `markCount` → `mark_count`; snake_case input is unchanged.
fn normalize_column(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    for c in raw.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `null`, `false`, `0` and `""` count as no value.
fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn coerce<F: UpdatableField>(field: F, v: &Value) -> Result<FieldValue, FieldError> {
    match field.kind() {
        FieldKind::Text { max } => match v {
            Value::String(s) if in_length_range(s, 1, max) => Ok(FieldValue::Text(s.clone())),
            Value::String(_) => Err(FieldError::InvalidValue {
                field: field.column(),
                expected: format!("must be between 1-{} characters", max),
            }),
            _ => Err(FieldError::InvalidValue {
                field: field.column(),
                expected: "expects a string".into(),
            }),
        },
        FieldKind::Int => {
            let n = match v {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            };
            n.map(FieldValue::Int).ok_or_else(|| FieldError::InvalidValue {
                field: field.column(),
                expected: "expects an integer".into(),
            })
        }
    }
}
