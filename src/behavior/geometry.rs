use serde::{Deserialize, Serialize};

use super::{required_name, AttributeStore, AttributeValue, SqlExecutor};
use crate::coord::Coordinates;
use crate::error::{GeoSqlError, Result};
use crate::expr::{quote_literal, st_as_geojson, st_as_text, st_geom_from_text, Expression};
use crate::io::geojson::{to_array, to_geometry_expression, DEFAULT_SRID};
use crate::io::wkt::{read_wkt, write_wkt};
use crate::kind::GeometryKind;

/// The text encoding used to move a geometry in and out of the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    /// `ST_GeomFromGeoJSON` on save, `ST_AsGeoJson` on load.
    #[default]
    GeoJson,
    /// `ST_GeomFromText` on save, `ST_AsText` on load.
    Wkt,
}

/// Configuration for [`GeometryAttribute`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryAttributeOptions {
    /// Name of the attribute holding the geometry.
    pub attribute: Option<String>,

    /// Geometry type name, e.g. `Point` or `POLYGON`.
    pub kind: Option<String>,

    /// SRID stamped on saved geometries. `null` leaves the CRS out.
    pub srid: Option<u32>,

    pub format: TextFormat,

    /// Leave stored binary untouched on load instead of asking the database to convert it.
    pub skip_after_find_postgis: bool,
}

impl Default for GeometryAttributeOptions {
    fn default() -> Self {
        Self {
            attribute: None,
            kind: None,
            srid: Some(DEFAULT_SRID),
            format: TextFormat::default(),
            skip_after_find_postgis: false,
        }
    }
}

/// The attribute value as it was before [`GeometryAttribute::before_save`] replaced it.
///
/// Hand it back to [`GeometryAttribute::after_save`].
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct SavedValue(AttributeValue);

impl SavedValue {
    pub fn into_inner(self) -> AttributeValue {
        self.0
    }
}

/// Converts one record attribute between coordinates and a stored geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryAttribute {
    attribute: String,
    kind: GeometryKind,
    srid: Option<u32>,
    format: TextFormat,
    skip_after_find_postgis: bool,
}

impl GeometryAttribute {
    pub fn new(attribute: impl Into<String>, kind: GeometryKind) -> Self {
        Self {
            attribute: attribute.into(),
            kind,
            srid: Some(DEFAULT_SRID),
            format: TextFormat::default(),
            skip_after_find_postgis: false,
        }
    }

    /// Validate configuration: the attribute and kind must be set and the kind known.
    pub fn try_new(options: &GeometryAttributeOptions) -> Result<Self> {
        let attribute = required_name(&options.attribute, "attribute")?;
        let kind = required_name(&options.kind, "kind")?.parse()?;
        Ok(Self {
            attribute,
            kind,
            srid: options.srid,
            format: options.format,
            skip_after_find_postgis: options.skip_after_find_postgis,
        })
    }

    pub fn with_srid(mut self, srid: Option<u32>) -> Self {
        self.srid = srid;
        self
    }

    pub fn with_format(mut self, format: TextFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_skip_after_find_postgis(mut self, skip: bool) -> Self {
        self.skip_after_find_postgis = skip;
        self
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    /// The SQL expression that stores `coordinates`, or `NULL` when they are empty.
    pub fn encode(&self, coordinates: &Coordinates) -> Result<Expression> {
        if coordinates.is_empty() {
            return Ok(Expression::null());
        }
        if coordinates.depth() != self.kind.depth() {
            return Err(GeoSqlError::ShapeMismatch {
                kind: self.kind,
                expected: self.kind.depth(),
                found: coordinates.depth(),
            });
        }
        match self.format {
            TextFormat::GeoJson => to_geometry_expression(self.kind, Some(coordinates), self.srid),
            TextFormat::Wkt => Ok(st_geom_from_text(
                &write_wkt(self.kind, coordinates)?,
                self.srid,
            )),
        }
    }

    /// Decode GeoJSON or WKT text read back from the database.
    pub fn decode(&self, text: &str) -> Result<Coordinates> {
        if is_geojson(text) {
            to_array(text)
        } else {
            read_wkt(self.kind, text)
        }
    }

    /// Replace the attribute with the SQL expression that stores it.
    ///
    /// Coordinates are encoded, other non-empty text is passed through as a quoted literal
    /// (e.g. hex EWKB that was loaded without conversion) and an empty value becomes `NULL`.
    pub fn before_save(&self, store: &mut impl AttributeStore) -> Result<SavedValue> {
        let value = store.get(&self.attribute);
        let encoded = match &value {
            value if value.is_empty() => Expression::null(),
            AttributeValue::Coordinates(coordinates) => self.encode(coordinates)?,
            AttributeValue::Text(text) => Expression::new(quote_literal(text)),
            AttributeValue::Expression(expr) => expr.clone(),
            AttributeValue::Number(n) => {
                return Err(GeoSqlError::MalformedCoordinate(format!(
                    "attribute `{}` holds the number {}, not a geometry",
                    self.attribute, n
                )))
            }
            AttributeValue::Null => Expression::null(),
        };
        tracing::debug!(attribute = %self.attribute, kind = %self.kind, sql = %encoded, "encoded geometry attribute");
        store.set(&self.attribute, AttributeValue::Expression(encoded));
        Ok(SavedValue(value))
    }

    /// Put back the value that [`before_save`](Self::before_save) replaced. The attribute is
    /// left marked unchanged, since it now matches what was stored.
    pub fn after_save(&self, store: &mut impl AttributeStore, saved: SavedValue) {
        store.set(&self.attribute, saved.0);
        store.set_unchanged(&self.attribute);
    }

    /// Turn the loaded attribute into coordinates.
    ///
    /// GeoJSON and WKT are decoded directly. Anything else is taken to be stored binary and
    /// converted with `ST_AsGeoJson` or `ST_AsText` through `executor`, unless
    /// `skip_after_find_postgis` is set, in which case the attribute is left as loaded.
    /// A converted attribute is marked unchanged afterwards.
    pub fn after_find(
        &self,
        store: &mut impl AttributeStore,
        executor: Option<&dyn SqlExecutor>,
    ) -> Result<()> {
        let AttributeValue::Text(text) = store.get(&self.attribute) else {
            return Ok(());
        };
        if text.trim().is_empty() {
            return Ok(());
        }

        let text = if is_geojson(&text) || is_wkt(&text) {
            text
        } else if self.skip_after_find_postgis {
            tracing::trace!(attribute = %self.attribute, "leaving stored geometry unconverted");
            return Ok(());
        } else {
            let executor = executor.ok_or_else(|| {
                GeoSqlError::InvalidConfiguration(format!(
                    "attribute `{}` holds stored geometry but no SQL executor is available",
                    self.attribute
                ))
            })?;
            let query = match self.format {
                TextFormat::GeoJson => st_as_geojson(&text),
                TextFormat::Wkt => st_as_text(&text),
            };
            tracing::debug!(attribute = %self.attribute, sql = %query, "converting stored geometry");
            match executor.query_scalar(&query)? {
                Some(converted) => converted,
                None => {
                    store.set(&self.attribute, AttributeValue::Null);
                    store.set_unchanged(&self.attribute);
                    return Ok(());
                }
            }
        };

        let coordinates = self.decode(&text)?;
        store.set(&self.attribute, AttributeValue::Coordinates(coordinates));
        store.set_unchanged(&self.attribute);
        Ok(())
    }
}

fn is_geojson(text: &str) -> bool {
    text.trim_start().starts_with('{')
}

fn is_wkt(text: &str) -> bool {
    let text = text.trim_start();
    if text
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("SRID="))
    {
        return true;
    }
    let end = text
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    text[..end].parse::<GeometryKind>().is_ok()
}
