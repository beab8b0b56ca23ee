//! Glue between the codecs and a host record layer.
//!
//! The host exposes a record through [`AttributeStore`] and, optionally, a database through
//! [`SqlExecutor`]. The handlers in this module hold configuration only; anything that has to
//! survive from one save step to the next is returned to the caller and handed back explicitly.

use std::error::Error;

use crate::coord::Coordinates;
use crate::expr::Expression;

mod geometry;
mod st_buffer;

pub use geometry::{GeometryAttribute, GeometryAttributeOptions, SavedValue, TextFormat};
pub use st_buffer::{BufferAttribute, BufferAttributeOptions};

/// A value held by a record attribute.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AttributeValue {
    #[default]
    Null,
    Number(f64),
    /// Text as read from or written to the database: GeoJSON, WKT, hex EWKB, a column name.
    Text(String),
    Coordinates(Coordinates),
    /// Raw SQL to be spliced into the statement.
    Expression(Expression),
}

impl AttributeValue {
    /// `true` for null, blank text and coordinate trees without entries.
    pub fn is_empty(&self) -> bool {
        match self {
            AttributeValue::Null => true,
            AttributeValue::Number(_) => false,
            AttributeValue::Text(text) => text.trim().is_empty(),
            AttributeValue::Coordinates(coordinates) => coordinates.is_empty(),
            AttributeValue::Expression(expr) => expr.is_null(),
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<Coordinates> for AttributeValue {
    fn from(value: Coordinates) -> Self {
        AttributeValue::Coordinates(value)
    }
}

impl From<Expression> for AttributeValue {
    fn from(value: Expression) -> Self {
        AttributeValue::Expression(value)
    }
}

impl From<Option<Expression>> for AttributeValue {
    fn from(value: Option<Expression>) -> Self {
        value.map_or(AttributeValue::Null, AttributeValue::Expression)
    }
}

/// Named attribute access on a host record.
pub trait AttributeStore {
    /// Current value, [`AttributeValue::Null`] when unset.
    fn get(&self, name: &str) -> AttributeValue;

    /// Assign a value. A tracking host reports the attribute as changed afterwards.
    fn set(&mut self, name: &str, value: AttributeValue);

    /// Whether the attribute differs from the value last loaded or saved.
    fn is_changed(&self, name: &str) -> bool;

    /// Record the current value as the loaded one, so [`is_changed`](Self::is_changed) is
    /// `false` until the next [`set`](Self::set).
    ///
    /// The handlers call this after they rewrite an attribute on load or after save. Without
    /// it a [`BufferAttribute`] would recompute its buffer on every save following a load.
    /// Hosts that do not track changes can keep the default, which does nothing.
    fn set_unchanged(&mut self, _name: &str) {}
}

/// What a host database returns for one scalar query: the value as text, `None` for `NULL`.
pub type ExecutorResult = std::result::Result<Option<String>, Box<dyn Error + Send + Sync>>;

/// Runs a single-column `SELECT <expression>` and returns the scalar as text.
pub trait SqlExecutor {
    fn query_scalar(&self, expression: &Expression) -> ExecutorResult;
}

impl<F> SqlExecutor for F
where
    F: Fn(&Expression) -> ExecutorResult,
{
    fn query_scalar(&self, expression: &Expression) -> ExecutorResult {
        self(expression)
    }
}

/// Read a required name from configuration.
fn required_name(value: &Option<String>, field: &str) -> crate::error::Result<String> {
    match value.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(crate::error::GeoSqlError::InvalidConfiguration(format!(
            "`{}` is not set",
            field
        ))),
    }
}
