//! Radius conversion and `ST_Buffer` expressions.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{GeoSqlError, Result};
use crate::expr::{quote_literal, Expression};

/// Kilometers per degree of arc.
///
/// This is an approximation that ignores latitude. Existing stored buffers were computed with
/// it, so it stays.
pub const KM_PER_DEGREE: f64 = 111.0;

/// The unit a buffer radius is given in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum RadiusUnit {
    Degree,
    Kilometer,
    Meter,
}

impl RadiusUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            RadiusUnit::Degree => "deg",
            RadiusUnit::Kilometer => "km",
            RadiusUnit::Meter => "m",
        }
    }
}

impl fmt::Display for RadiusUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RadiusUnit {
    type Err = GeoSqlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deg" | "degree" | "degrees" => Ok(RadiusUnit::Degree),
            "km" | "kilometer" | "kilometers" => Ok(RadiusUnit::Kilometer),
            "m" | "meter" | "meters" => Ok(RadiusUnit::Meter),
            _ => Err(GeoSqlError::InvalidRadiusUnit(s.to_string())),
        }
    }
}

impl TryFrom<String> for RadiusUnit {
    type Error = GeoSqlError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<RadiusUnit> for &'static str {
    fn from(value: RadiusUnit) -> Self {
        value.as_str()
    }
}

/// Which `ST_Buffer` overload to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferMode {
    /// Planar buffer on a geometry column; the radius is in degrees.
    #[default]
    Geometry,
    /// Spheroidal buffer on a `::geography` cast; the radius is in meters.
    Geography,
}

impl BufferMode {
    /// The unit `ST_Buffer` expects in this mode. Also the default source unit.
    pub fn target_unit(&self) -> RadiusUnit {
        match self {
            BufferMode::Geometry => RadiusUnit::Degree,
            BufferMode::Geography => RadiusUnit::Meter,
        }
    }
}

/// Convert `radius` from `unit` into the unit `mode` works in.
///
/// Degrees and kilometers are related through [`KM_PER_DEGREE`].
pub fn to_target_unit(radius: f64, unit: RadiusUnit, mode: BufferMode) -> f64 {
    match (mode, unit) {
        (BufferMode::Geography, RadiusUnit::Degree) => radius * KM_PER_DEGREE * 1000.,
        (BufferMode::Geography, RadiusUnit::Kilometer) => radius * 1000.,
        (BufferMode::Geography, RadiusUnit::Meter) => radius,
        (BufferMode::Geometry, RadiusUnit::Degree) => radius,
        (BufferMode::Geometry, RadiusUnit::Kilometer) => radius / KM_PER_DEGREE,
        (BufferMode::Geometry, RadiusUnit::Meter) => radius / 1000. / KM_PER_DEGREE,
    }
}

/// Build `ST_Buffer(...)` for a geometry expression.
///
/// Returns `None` when there is nothing to buffer: a zero or non-finite radius (also after
/// conversion) or a blank expression.
///
/// In geography mode any trailing `::geography` cast on `geometry` is replaced by a single one
/// and `options` are ignored. In geometry mode `options` become the third argument as
/// space separated `key=value` pairs, omitted when there are none.
pub fn build_buffer_expression(
    geometry: &str,
    radius: f64,
    unit: RadiusUnit,
    mode: BufferMode,
    options: &IndexMap<String, String>,
) -> Option<Expression> {
    let geometry = geometry.trim();
    if radius == 0. || !radius.is_finite() || geometry.is_empty() {
        return None;
    }

    let converted = to_target_unit(radius, unit, mode);
    tracing::trace!(radius, %unit, ?mode, converted, "converted buffer radius");
    if !converted.is_finite() {
        return None;
    }

    let sql = match mode {
        BufferMode::Geography => {
            let mut geometry = geometry;
            while let Some(stripped) = geometry.strip_suffix("::geography") {
                geometry = stripped.trim_end();
            }
            format!("ST_Buffer({}::geography, {})", geometry, converted)
        }
        BufferMode::Geometry if options.is_empty() => {
            format!("ST_Buffer({}, {})", geometry, converted)
        }
        BufferMode::Geometry => {
            let params = options
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect::<Vec<_>>()
                .join(" ");
            format!(
                "ST_Buffer({}, {}, {})",
                geometry,
                converted,
                quote_literal(&params)
            )
        }
    };
    Some(Expression::new(sql))
}

/// Deserialize a map of scalar JSON values as strings, so `{"quad_segs": 8}` reads as `"8"`.
fn deserialize_option_values<'de, D>(
    deserializer: D,
) -> std::result::Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, serde_json::Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                other => {
                    return Err(serde::de::Error::custom(format!(
                        "buffer option `{}` must be a scalar, found {}",
                        key, other
                    )))
                }
            };
            Ok((key, value))
        })
        .collect()
}

/// Configuration for [`StBuffer`], usually read from the host's settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StBufferOptions {
    /// Buffer on `::geography` instead of the planar geometry.
    pub geography: bool,

    /// `deg`, `km` or `m`. Defaults to the unit of the selected mode.
    pub radius_unit: Option<String>,

    /// Extra `ST_Buffer` parameters such as `quad_segs` or `endcap`, geometry mode only.
    #[serde(deserialize_with = "deserialize_option_values")]
    pub options: IndexMap<String, String>,
}

/// A configured `ST_Buffer` expression builder.
///
/// ```
/// use geosql::algorithm::buffer::{BufferMode, RadiusUnit, StBuffer};
///
/// let buffer = StBuffer::new(BufferMode::Geography).with_radius_unit(RadiusUnit::Kilometer);
/// let expr = buffer.buffer("geom", 5.).unwrap();
/// assert_eq!(expr.as_str(), "ST_Buffer(geom::geography, 5000)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StBuffer {
    mode: BufferMode,
    radius_unit: RadiusUnit,
    options: IndexMap<String, String>,
}

impl StBuffer {
    /// A builder for `mode` with radii in that mode's own unit and no options.
    pub fn new(mode: BufferMode) -> Self {
        Self {
            mode,
            radius_unit: mode.target_unit(),
            options: IndexMap::new(),
        }
    }

    /// Validate configuration. An unknown radius unit fails here rather than at buffer time.
    pub fn try_new(options: &StBufferOptions) -> Result<Self> {
        let mode = if options.geography {
            BufferMode::Geography
        } else {
            BufferMode::Geometry
        };
        let radius_unit = match &options.radius_unit {
            Some(unit) => unit.parse()?,
            None => mode.target_unit(),
        };
        Ok(Self {
            mode,
            radius_unit,
            options: options.options.clone(),
        })
    }

    pub fn with_radius_unit(mut self, radius_unit: RadiusUnit) -> Self {
        self.radius_unit = radius_unit;
        self
    }

    /// Add or replace a default `ST_Buffer` parameter.
    pub fn with_option(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.options.insert(key.into(), value.to_string());
        self
    }

    pub fn mode(&self) -> BufferMode {
        self.mode
    }

    pub fn radius_unit(&self) -> RadiusUnit {
        self.radius_unit
    }

    pub fn options(&self) -> &IndexMap<String, String> {
        &self.options
    }

    /// `radius` in the configured unit, converted to the unit of the configured mode.
    pub fn radius(&self, radius: f64) -> f64 {
        to_target_unit(radius, self.radius_unit, self.mode)
    }

    /// `ST_Buffer` for `geometry` using the configured options.
    pub fn buffer(&self, geometry: &str, radius: f64) -> Option<Expression> {
        build_buffer_expression(
            geometry,
            radius,
            self.radius_unit,
            self.mode,
            &self.options,
        )
    }

    /// Like [`buffer`](Self::buffer), with per-call options layered over the configured ones.
    /// A key present in both keeps its configured position and takes the per-call value.
    pub fn buffer_with_options(
        &self,
        geometry: &str,
        radius: f64,
        options: &IndexMap<String, String>,
    ) -> Option<Expression> {
        let mut merged = self.options.clone();
        merged.extend(options.iter().map(|(k, v)| (k.clone(), v.clone())));
        build_buffer_expression(geometry, radius, self.radius_unit, self.mode, &merged)
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::*;

    const POINT: &str = "ST_GeomFromText('POINT(1 1)')";

    #[test]
    fn conversion_table() {
        use BufferMode::*;
        use RadiusUnit::*;

        assert_relative_eq!(to_target_unit(2., Degree, Geography), 222_000.);
        assert_relative_eq!(to_target_unit(2., Kilometer, Geography), 2_000.);
        assert_relative_eq!(to_target_unit(2., Meter, Geography), 2.);
        assert_relative_eq!(to_target_unit(2., Degree, Geometry), 2.);
        assert_relative_eq!(to_target_unit(2., Kilometer, Geometry), 2. / 111.);
        assert_relative_eq!(to_target_unit(2., Meter, Geometry), 2. / 111_000.);
    }

    #[test]
    fn degree_meter_round_trip() {
        let meters = to_target_unit(0.25, RadiusUnit::Degree, BufferMode::Geography);
        let degrees = to_target_unit(meters, RadiusUnit::Meter, BufferMode::Geometry);
        assert_relative_eq!(degrees, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn geometry_kilometers() {
        let buffer = StBuffer::new(BufferMode::Geometry).with_radius_unit(RadiusUnit::Kilometer);
        let expr = buffer.buffer(POINT, 5.).unwrap();
        assert!(expr
            .as_str()
            .starts_with("ST_Buffer(ST_GeomFromText('POINT(1 1)'), 0.045"));
        assert_eq!(expr.as_str(), format!("ST_Buffer({}, {})", POINT, 5. / 111.));
    }

    #[test]
    fn geography_kilometers() {
        let buffer = StBuffer::new(BufferMode::Geography).with_radius_unit(RadiusUnit::Kilometer);
        let expr = buffer.buffer(POINT, 5.).unwrap();
        assert_eq!(
            expr.as_str(),
            "ST_Buffer(ST_GeomFromText('POINT(1 1)')::geography, 5000)"
        );
    }

    #[test]
    fn geography_cast_is_not_doubled() {
        let buffer = StBuffer::new(BufferMode::Geography);
        let expr = buffer.buffer("geom::geography", 10.).unwrap();
        assert_eq!(expr.as_str(), "ST_Buffer(geom::geography, 10)");
        let expr = buffer.buffer("geom::geography::geography", 10.).unwrap();
        assert_eq!(expr.as_str(), "ST_Buffer(geom::geography, 10)");
    }

    #[test]
    fn geography_cast_strip_keeps_identifier() {
        // a char-set trim of "::geography" would eat the trailing "y" and "a" here
        let buffer = StBuffer::new(BufferMode::Geography);
        let expr = buffer.buffer("geography", 1.).unwrap();
        assert_eq!(expr.as_str(), "ST_Buffer(geography::geography, 1)");
    }

    #[test]
    fn geography_ignores_options() {
        let buffer = StBuffer::new(BufferMode::Geography).with_option("quad_segs", 8);
        let expr = buffer.buffer("geom", 1.).unwrap();
        assert_eq!(expr.as_str(), "ST_Buffer(geom::geography, 1)");
    }

    #[test]
    fn zero_radius_is_noop() {
        for mode in [BufferMode::Geometry, BufferMode::Geography] {
            assert!(StBuffer::new(mode).buffer(POINT, 0.).is_none());
            assert!(StBuffer::new(mode).buffer(POINT, f64::NAN).is_none());
        }
    }

    #[test]
    fn infinite_radius_is_noop() {
        for mode in [BufferMode::Geometry, BufferMode::Geography] {
            assert!(StBuffer::new(mode).buffer(POINT, f64::INFINITY).is_none());
            assert!(StBuffer::new(mode).buffer(POINT, f64::NEG_INFINITY).is_none());
        }
        let options = IndexMap::new();
        assert!(build_buffer_expression("geom", f64::INFINITY, RadiusUnit::Degree, BufferMode::Geometry, &options).is_none());
        // finite input that overflows once converted to meters
        assert!(build_buffer_expression("geom", f64::MAX, RadiusUnit::Degree, BufferMode::Geography, &options).is_none());
    }

    #[test]
    fn empty_geometry_is_noop() {
        assert!(StBuffer::new(BufferMode::Geometry).buffer("  ", 1.).is_none());
    }

    #[test]
    fn geometry_options() {
        let buffer = StBuffer::new(BufferMode::Geometry)
            .with_option("quad_segs", 8)
            .with_option("endcap", "round");
        let expr = buffer.buffer("geom", 1.).unwrap();
        assert_eq!(
            expr.as_str(),
            "ST_Buffer(geom, 1, 'quad_segs=8 endcap=round')"
        );
    }

    #[test]
    fn call_options_override_configured() {
        let buffer = StBuffer::new(BufferMode::Geometry)
            .with_option("quad_segs", 8)
            .with_option("endcap", "round");
        let mut overrides = IndexMap::new();
        overrides.insert("quad_segs".to_string(), "2".to_string());
        overrides.insert("join".to_string(), "mitre".to_string());
        let expr = buffer.buffer_with_options("geom", 1., &overrides).unwrap();
        assert_eq!(
            expr.as_str(),
            "ST_Buffer(geom, 1, 'quad_segs=2 endcap=round join=mitre')"
        );
    }

    #[test]
    fn unit_defaults_follow_mode() {
        let geography = StBuffer::try_new(&StBufferOptions {
            geography: true,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(geography.radius_unit(), RadiusUnit::Meter);
        let geometry = StBuffer::try_new(&StBufferOptions::default()).unwrap();
        assert_eq!(geometry.radius_unit(), RadiusUnit::Degree);
    }

    #[test]
    fn invalid_unit_fails_at_construction() {
        let err = StBuffer::try_new(&StBufferOptions {
            radius_unit: Some("mile".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, GeoSqlError::InvalidRadiusUnit(unit) if unit == "mile"));
    }

    #[test]
    fn options_from_json() {
        let options: StBufferOptions = serde_json::from_str(
            r#"{"radius_unit": "km", "options": {"quad_segs": 8, "endcap": "flat"}}"#,
        )
        .unwrap();
        let buffer = StBuffer::try_new(&options).unwrap();
        assert_eq!(buffer.radius_unit(), RadiusUnit::Kilometer);
        assert_eq!(
            buffer.buffer("geom", 111.).unwrap().as_str(),
            "ST_Buffer(geom, 1, 'quad_segs=8 endcap=flat')"
        );
        assert!(serde_json::from_str::<StBufferOptions>(r#"{"options": {"a": [1]}}"#).is_err());
    }
}
