use serde::{Deserialize, Serialize};

use super::{required_name, AttributeStore, AttributeValue};
use crate::algorithm::buffer::{StBuffer, StBufferOptions};
use crate::error::{GeoSqlError, Result};

/// Configuration for [`BufferAttribute`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferAttributeOptions {
    /// Attribute that receives the `ST_Buffer` expression.
    pub attribute: Option<String>,

    /// Attribute holding the geometry to buffer, as SQL.
    pub geometry_attribute: Option<String>,

    /// Attribute holding the radius.
    pub radius_attribute: Option<String>,

    pub buffer: StBufferOptions,
}

/// Keeps a stored buffer in step with a geometry attribute and a radius attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferAttribute {
    attribute: String,
    geometry_attribute: String,
    radius_attribute: String,
    buffer: StBuffer,
}

impl BufferAttribute {
    pub fn new(
        attribute: impl Into<String>,
        geometry_attribute: impl Into<String>,
        radius_attribute: impl Into<String>,
        buffer: StBuffer,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            geometry_attribute: geometry_attribute.into(),
            radius_attribute: radius_attribute.into(),
            buffer,
        }
    }

    /// Validate configuration, including the radius unit.
    pub fn try_new(options: &BufferAttributeOptions) -> Result<Self> {
        Ok(Self {
            attribute: required_name(&options.attribute, "attribute")?,
            geometry_attribute: required_name(&options.geometry_attribute, "geometry_attribute")?,
            radius_attribute: required_name(&options.radius_attribute, "radius_attribute")?,
            buffer: StBuffer::try_new(&options.buffer)?,
        })
    }

    pub fn buffer(&self) -> &StBuffer {
        &self.buffer
    }

    /// Recompute the buffer when the geometry or the radius changed.
    ///
    /// The geometry must already be SQL: an expression (as left by
    /// [`GeometryAttribute::before_save`](super::GeometryAttribute::before_save)) or text such
    /// as a column name. When there is nothing to buffer the attribute is set to `NULL`.
    pub fn before_save(&self, store: &mut impl AttributeStore) -> Result<()> {
        if !store.is_changed(&self.radius_attribute) && !store.is_changed(&self.geometry_attribute)
        {
            return Ok(());
        }

        let geometry = match store.get(&self.geometry_attribute) {
            AttributeValue::Expression(expr) if !expr.is_null() => Some(expr.into_inner()),
            AttributeValue::Text(text) => Some(text),
            _ => None,
        };
        let radius = self.radius(store.get(&self.radius_attribute))?;

        let expr = geometry.and_then(|geometry| self.buffer.buffer(&geometry, radius));
        tracing::debug!(
            attribute = %self.attribute,
            radius,
            sql = expr.as_ref().map(|e| e.as_str()).unwrap_or("NULL"),
            "updated buffer attribute"
        );
        store.set(&self.attribute, expr.into());
        Ok(())
    }

    fn radius(&self, value: AttributeValue) -> Result<f64> {
        match value {
            AttributeValue::Number(radius) => Ok(radius),
            AttributeValue::Text(text) if text.trim().is_empty() => Ok(0.),
            AttributeValue::Text(text) => text.trim().parse().map_err(|_| {
                GeoSqlError::MalformedCoordinate(format!(
                    "radius attribute `{}` holds `{}`, not a number",
                    self.radius_attribute, text
                ))
            }),
            _ => Ok(0.),
        }
    }
}
