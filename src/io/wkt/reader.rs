use crate::coord::{Coord, Coordinates};
use crate::error::{GeoSqlError, Result};
use crate::kind::GeometryKind;

/// Decode WKT of the given kind into a coordinate tree.
///
/// The text must start with the keyword of `kind` (case-insensitive, so `POLYGON` text is
/// rejected when a `MULTIPOLYGON` is expected and the other way around). An EWKT `SRID=n;`
/// prefix and a `Z`, `M` or `ZM` dimension tag are skipped. Rings are returned exactly as
/// written: a closing point is neither added nor removed.
pub fn read_wkt(kind: GeometryKind, wkt: &str) -> Result<Coordinates> {
    let body = strip_keyword(kind, wkt)?;
    let body = strip_parens(body)?;
    if body.trim().is_empty() {
        return Err(GeoSqlError::EmptyGeometry(kind));
    }

    let coordinates = match kind.depth() {
        1 => Coordinates::Position(read_position(body)?),
        2 => Coordinates::Positions(read_positions(body)?),
        3 => Coordinates::Rings(read_rings(body)?),
        _ => Coordinates::Polygons(
            split_top_level(body)?
                .into_iter()
                .map(|polygon| read_rings(strip_parens(polygon)?))
                .collect::<Result<_>>()?,
        ),
    };
    Ok(coordinates)
}

/// Remove `[SRID=n;]KEYWORD [Z|M|ZM]` and return what follows.
fn strip_keyword(kind: GeometryKind, wkt: &str) -> Result<&str> {
    let mut text = wkt.trim();
    if text
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("SRID="))
    {
        text = match text.split_once(';') {
            Some((_, rest)) => rest.trim_start(),
            None => {
                return Err(GeoSqlError::TypeMismatch {
                    expected: kind,
                    found: text.to_string(),
                })
            }
        };
    }

    let (keyword, rest) = split_word(text);
    if !keyword.eq_ignore_ascii_case(kind.wkt_keyword()) {
        return Err(GeoSqlError::TypeMismatch {
            expected: kind,
            found: if keyword.is_empty() { text } else { keyword }.to_string(),
        });
    }

    let (tag, after_tag) = split_word(rest);
    if tag.eq_ignore_ascii_case("EMPTY") {
        return Err(GeoSqlError::EmptyGeometry(kind));
    }
    if ["Z", "M", "ZM"].iter().any(|t| tag.eq_ignore_ascii_case(t)) {
        return Ok(after_tag);
    }
    if !tag.is_empty() {
        return Err(GeoSqlError::TypeMismatch {
            expected: kind,
            found: format!("{} {}", keyword, tag),
        });
    }
    Ok(rest)
}

/// Split off a leading run of ASCII letters, trimming whitespace on both sides.
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    let end = text
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    (&text[..end], text[end..].trim_start())
}

fn strip_parens(text: &str) -> Result<&str> {
    let trimmed = text.trim();
    trimmed
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .ok_or_else(|| {
            GeoSqlError::MalformedCoordinate(format!(
                "expected a parenthesized list, found `{}`",
                trimmed
            ))
        })
}

/// Split on commas that are not nested inside parentheses.
fn split_top_level(text: &str) -> Result<Vec<&str>> {
    let mut parts = vec![];
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    GeoSqlError::MalformedCoordinate(format!("unbalanced `)` in `{}`", text))
                })?
            }
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(GeoSqlError::MalformedCoordinate(format!(
            "unbalanced `(` in `{}`",
            text
        )));
    }
    parts.push(&text[start..]);
    Ok(parts)
}

fn read_position(text: &str) -> Result<Coord> {
    let coord = text
        .split_whitespace()
        .map(|component| {
            component.parse::<f64>().map_err(|_| {
                GeoSqlError::MalformedCoordinate(format!("`{}` is not a number", component))
            })
        })
        .collect::<Result<Coord>>()?;
    if coord.is_empty() {
        return Err(GeoSqlError::MalformedCoordinate(
            "point without components".to_string(),
        ));
    }
    Ok(coord)
}

/// Points of a line or ring. Each point may carry its own parentheses, as in the
/// `MULTIPOINT((1 2),(3 4))` form.
fn read_positions(text: &str) -> Result<Vec<Coord>> {
    split_top_level(text)?
        .into_iter()
        .map(|point| {
            let point = point.trim();
            if point.starts_with('(') {
                read_position(strip_parens(point)?)
            } else {
                read_position(point)
            }
        })
        .collect()
}

fn read_rings(text: &str) -> Result<Vec<Vec<Coord>>> {
    split_top_level(text)?
        .into_iter()
        .map(|ring| read_positions(strip_parens(ring)?))
        .collect()
}
