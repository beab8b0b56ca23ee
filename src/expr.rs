//! SQL fragments for a PostGIS-compatible engine.
//!
//! An [`Expression`] is raw SQL text that a host query builder must splice in without quoting.

use std::fmt;

/// A raw SQL expression, e.g. `ST_GeomFromText('POINT(1 2)')`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expression(String);

impl Expression {
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    /// The SQL `NULL` literal.
    pub fn null() -> Self {
        Self("NULL".to_string())
    }

    pub fn is_null(&self) -> bool {
        self.0.eq_ignore_ascii_case("NULL")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Expression {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Expression> for String {
    fn from(value: Expression) -> Self {
        value.0
    }
}

/// Wrap `text` in single quotes, doubling any embedded quote.
pub fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// `ST_GeomFromGeoJSON('<json>')`
pub fn st_geom_from_geojson(geojson: &str) -> Expression {
    Expression(format!("ST_GeomFromGeoJSON({})", quote_literal(geojson)))
}

/// `ST_GeomFromText('<wkt>')`, or `ST_GeomFromText('<wkt>', <srid>)` when an SRID is given.
pub fn st_geom_from_text(wkt: &str, srid: Option<u32>) -> Expression {
    match srid {
        Some(srid) => Expression(format!(
            "ST_GeomFromText({}, {})",
            quote_literal(wkt),
            srid
        )),
        None => Expression(format!("ST_GeomFromText({})", quote_literal(wkt))),
    }
}

/// `ST_AsGeoJson('<stored>')`, converting a stored geometry (usually hex EWKB) to GeoJSON text.
pub fn st_as_geojson(stored: &str) -> Expression {
    Expression(format!("ST_AsGeoJson({})", quote_literal(stored)))
}

/// `ST_AsText('<stored>')`, converting a stored geometry (usually hex EWKB) to WKT.
pub fn st_as_text(stored: &str) -> Expression {
    Expression(format!("ST_AsText({})", quote_literal(stored)))
}

/// `ST_Within(<a>, <b>)`
pub fn st_within(a: impl fmt::Display, b: impl fmt::Display) -> Expression {
    Expression(format!("ST_Within({}, {})", a, b))
}
