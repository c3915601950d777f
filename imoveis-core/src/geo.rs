//! Coordinate normalization. Content folders carry geo data in whatever
//! format the listing agent typed: decimal numbers, pt-BR decimal strings
//! ("49,5") or DMS with hemisphere letters (`25°42'12.42"S`). Portuguese
//! hemisphere letters are accepted too: `O` (Oeste) = west, `L` (Leste) =
//! east.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::domain::LatLng;

static HEMISPHERE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[NSEWOL]").unwrap());
static DEGREES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(-?\d+(?:\.\d+)?)\s*°").unwrap());
static MINUTES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*'").unwrap());
static SECONDS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(\d+(?:\.\d+)?)\s*""#).unwrap());
static DECIMAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Parses one coordinate component to signed decimal degrees. Returns `None`
/// when the value cannot be read as a coordinate.
pub fn parse_dms(input: &Value) -> Option<f64> {
    if let Value::Number(n) = input {
        return n.as_f64().filter(|v| v.is_finite());
    }
    let raw = input.as_str()?.trim();
    if raw.is_empty() {
        return None;
    }

    // Typographic quote variants, collapsed whitespace, pt-BR decimal comma.
    let normalized = raw
        .replace(['’', '′'], "'")
        .replace(['”', '″'], "\"");
    let normalized = WHITESPACE_RE.replace_all(&normalized, " ");
    let normalized = normalized.replace(',', ".");

    // Hemisphere letter anywhere in the string decides the sign.
    let mut sign = 1.0;
    if let Some(m) = HEMISPHERE_RE.find(&normalized) {
        match m.as_str().to_uppercase().as_str() {
            "S" | "W" | "O" => sign = -1.0,
            _ => sign = 1.0,
        }
    }
    if normalized.starts_with('-') {
        sign = -1.0;
    }

    if normalized.contains('°') {
        let d: f64 = DEGREES_RE
            .captures(&normalized)
            .and_then(|c| c[1].parse().ok())?;
        let m: f64 = MINUTES_RE
            .captures(&normalized)
            .and_then(|c| c[1].parse().ok())
            .unwrap_or(0.0);
        let s: f64 = SECONDS_RE
            .captures(&normalized)
            .and_then(|c| c[1].parse().ok())
            .unwrap_or(0.0);
        if !d.is_finite() || !m.is_finite() || !s.is_finite() {
            return None;
        }
        return Some(sign * (d.abs() + m / 60.0 + s / 3600.0));
    }

    let n: f64 = DECIMAL_RE.find(&normalized)?.as_str().parse().ok()?;
    if !n.is_finite() {
        return None;
    }
    Some(n.abs() * sign)
}

fn first_key<'a>(geo: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| geo.get(k))
        .find(|v| !v.is_null())
}

/// Normalizes a metadata geo object to `{lat, lng}`, accepting the key
/// spellings seen in the wild. Out-of-range results are rejected so a bad
/// coordinate excludes the listing from map features instead of misplacing
/// it.
pub fn normalize_lat_lng(geo: &Value) -> Option<LatLng> {
    let lat = parse_dms(first_key(geo, &["lat", "latitude"])?)?;
    let lng = parse_dms(first_key(geo, &["lng", "lon", "long", "longitude"])?)?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return None;
    }
    Some(LatLng { lat, lng })
}
