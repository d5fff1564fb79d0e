//! Per-cell type coercion.
//!
//! Each declared column kind validates and normalizes one raw cell value.
//! All kinds share the same contract: blank values short-circuit (an error
//! for required columns, no value otherwise), anything present runs the
//! kind's conversion, and a conversion that does not produce a value
//! surfaces as the uniform [`CoerceError::InvalidValue`] — the underlying
//! failure never leaks.

use chrono::NaiveDate;
use thiserror::Error;

use rowbatch_model::Row;

/// Declared type of a column, carrying any per-kind configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKind {
    Text,
    Integer,
    Float,
    Boolean,
    /// 8-digit `YYYYMMDD` calendar date.
    Date,
    /// Decimal in `[0, 1]`, or a `%`-suffixed percentage.
    Percent,
    /// Case-insensitive membership in the allowed value set.
    Select(Vec<String>),
    /// US ZIP code: digits and hyphens only.
    PostalCode,
}

impl ColumnKind {
    /// Name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Integer => "integer",
            Self::Float => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Percent => "percent",
            Self::Select(_) => "value",
            Self::PostalCode => "postal code",
        }
    }
}

/// A coerced, strongly typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
}

impl Value {
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_integer(self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_float(self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_boolean(self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_date(self) -> Option<NaiveDate> {
        match self {
            Self::Date(value) => Some(value),
            _ => None,
        }
    }
}

/// Validation failure for one cell, keyed by column name.
#[derive(Debug, Error)]
pub enum CoerceError {
    /// A required column was blank.
    #[error("{key} is blank")]
    RequiredField { key: String },

    /// The value failed its kind's conversion.
    #[error("invalid {kind} for column: {key} (got {value:?})")]
    InvalidValue {
        key: String,
        kind: &'static str,
        value: String,
    },

    /// Percent outside the allowed range.
    #[error("invalid percent for column: {key}: {value:?} must be a decimal between 0 and 1")]
    OutOfRange { key: String, value: String },

    /// Select value not in the allowed set.
    #[error("invalid value for column: {key}; must be one of: {allowed}")]
    NotInSet {
        key: String,
        value: String,
        allowed: String,
    },
}

/// Coerces one cell.
///
/// `raw` of `None` (absent column) and whitespace-only strings are both
/// blank: [`CoerceError::RequiredField`] for required columns, `Ok(None)`
/// otherwise. Present values run the kind's conversion.
pub fn parse_cell(
    key: &str,
    raw: Option<&str>,
    required: bool,
    kind: &ColumnKind,
) -> Result<Option<Value>, CoerceError> {
    let value = match raw {
        Some(value) if !value.trim().is_empty() => value,
        _ => {
            if required {
                return Err(CoerceError::RequiredField {
                    key: key.to_string(),
                });
            }
            return Ok(None);
        }
    };

    convert(key, value, kind)?
        .ok_or_else(|| CoerceError::InvalidValue {
            key: key.to_string(),
            kind: kind.type_name(),
            value: value.to_string(),
        })
        .map(Some)
}

/// Runs the kind-specific conversion. `Ok(None)` means the value did not
/// convert; the caller maps that to the uniform invalid-value error.
fn convert(key: &str, value: &str, kind: &ColumnKind) -> Result<Option<Value>, CoerceError> {
    let converted = match kind {
        ColumnKind::Text => Some(Value::Text(value.to_string())),
        ColumnKind::Integer => value.trim().parse::<i64>().ok().map(Value::Integer),
        ColumnKind::Float => value.trim().parse::<f64>().ok().map(Value::Float),
        ColumnKind::Boolean => parse_boolean(value),
        ColumnKind::Date => parse_date(value),
        ColumnKind::Percent => return parse_percent(key, value),
        ColumnKind::Select(options) => return parse_select(key, value, options),
        ColumnKind::PostalCode => parse_postal_code(value),
    };
    Ok(converted)
}

fn parse_boolean(value: &str) -> Option<Value> {
    match value.to_lowercase().as_str() {
        "yes" | "y" | "true" => Some(Value::Boolean(true)),
        "no" | "n" | "false" => Some(Value::Boolean(false)),
        _ => None,
    }
}

fn parse_date(value: &str) -> Option<Value> {
    let value = value.trim();
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = value[0..4].parse().ok()?;
    let month: u32 = value[4..6].parse().ok()?;
    let day: u32 = value[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(Value::Date)
}

fn parse_percent(key: &str, value: &str) -> Result<Option<Value>, CoerceError> {
    let trimmed = value.trim();
    let parsed = if trimmed.contains('%') {
        trimmed
            .replace('%', "")
            .trim()
            .parse::<f64>()
            .ok()
            .map(|parsed| parsed / 100.0)
    } else {
        trimmed.parse::<f64>().ok()
    };

    let Some(parsed) = parsed else {
        return Ok(None);
    };
    if !(0.0..=1.0).contains(&parsed) {
        return Err(CoerceError::OutOfRange {
            key: key.to_string(),
            value: value.to_string(),
        });
    }
    Ok(Some(Value::Float(parsed)))
}

fn parse_select(key: &str, value: &str, options: &[String]) -> Result<Option<Value>, CoerceError> {
    let normalized = value.to_lowercase();
    if options
        .iter()
        .any(|option| option.to_lowercase() == normalized)
    {
        Ok(Some(Value::Text(normalized)))
    } else {
        Err(CoerceError::NotInSet {
            key: key.to_string(),
            value: value.to_string(),
            allowed: options.join(", "),
        })
    }
}

fn parse_postal_code(value: &str) -> Option<Value> {
    let stripped: String = value.chars().filter(|c| *c != '-').collect();
    if !stripped.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    // A 9-digit ZIP+4 keeps its original formatting, hyphens and all.
    if stripped.len() == 9 {
        return Some(Value::Text(value.to_string()));
    }
    Some(Value::Text(format!("{stripped:0>5}")))
}

/// Typed field access over one [`Row`], one method per column kind.
///
/// This is the surface row importers are expected to coerce cells through.
/// Each method looks the key up case-tolerantly, applies the shared
/// blank/required contract, and returns the typed value.
pub struct Fields<'a> {
    row: &'a Row,
}

impl<'a> Fields<'a> {
    pub fn new(row: &'a Row) -> Self {
        Self { row }
    }

    fn cell(
        &self,
        key: &str,
        required: bool,
        kind: &ColumnKind,
    ) -> Result<Option<Value>, CoerceError> {
        parse_cell(key, self.row.field(key), required, kind)
    }

    pub fn text(&self, key: &str, required: bool) -> Result<Option<String>, CoerceError> {
        Ok(self
            .cell(key, required, &ColumnKind::Text)?
            .and_then(Value::into_text))
    }

    pub fn integer(&self, key: &str, required: bool) -> Result<Option<i64>, CoerceError> {
        Ok(self
            .cell(key, required, &ColumnKind::Integer)?
            .and_then(Value::into_integer))
    }

    pub fn float(&self, key: &str, required: bool) -> Result<Option<f64>, CoerceError> {
        Ok(self
            .cell(key, required, &ColumnKind::Float)?
            .and_then(Value::into_float))
    }

    pub fn boolean(&self, key: &str, required: bool) -> Result<Option<bool>, CoerceError> {
        Ok(self
            .cell(key, required, &ColumnKind::Boolean)?
            .and_then(Value::into_boolean))
    }

    pub fn date(&self, key: &str, required: bool) -> Result<Option<NaiveDate>, CoerceError> {
        Ok(self
            .cell(key, required, &ColumnKind::Date)?
            .and_then(Value::into_date))
    }

    pub fn percent(&self, key: &str, required: bool) -> Result<Option<f64>, CoerceError> {
        Ok(self
            .cell(key, required, &ColumnKind::Percent)?
            .and_then(Value::into_float))
    }

    pub fn select(
        &self,
        key: &str,
        options: &[&str],
        required: bool,
    ) -> Result<Option<String>, CoerceError> {
        let kind = ColumnKind::Select(options.iter().map(|option| (*option).to_string()).collect());
        Ok(self.cell(key, required, &kind)?.and_then(Value::into_text))
    }

    pub fn postal_code(&self, key: &str, required: bool) -> Result<Option<String>, CoerceError> {
        Ok(self
            .cell(key, required, &ColumnKind::PostalCode)?
            .and_then(Value::into_text))
    }
}
