//! Server-side listing filters for the home grid: state code, area and price
//! bounds, and the user-drawn polygon from the map page.

use regex::Regex;

use crate::domain::{LatLng, Property};

/// Parses the `poly` query parameter: semicolon-separated `lat,lng` pairs.
/// Malformed pairs are skipped; fewer than three usable vertices means no
/// polygon (and therefore no filter).
pub fn parse_poly_param(param: &str) -> Option<Vec<LatLng>> {
    let coords: Vec<LatLng> = param
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|pair| {
            let (lat_s, lng_s) = pair.split_once(',')?;
            let lat: f64 = lat_s.trim().parse().ok()?;
            let lng: f64 = lng_s.trim().parse().ok()?;
            (lat.is_finite() && lng.is_finite()).then_some(LatLng { lat, lng })
        })
        .collect();
    (coords.len() >= 3).then_some(coords)
}

/// Inclusive bounding-box pre-check, cheap rejection before the ray cast.
pub fn in_bbox(pt: &LatLng, poly: &[LatLng]) -> bool {
    let mut min_lat = f64::INFINITY;
    let mut max_lat = f64::NEG_INFINITY;
    let mut min_lng = f64::INFINITY;
    let mut max_lng = f64::NEG_INFINITY;
    for v in poly {
        min_lat = min_lat.min(v.lat);
        max_lat = max_lat.max(v.lat);
        min_lng = min_lng.min(v.lng);
        max_lng = max_lng.max(v.lng);
    }
    pt.lat >= min_lat && pt.lat <= max_lat && pt.lng >= min_lng && pt.lng <= max_lng
}

/// Ray casting over lng/lat.
pub fn point_in_polygon(pt: &LatLng, poly: &[LatLng]) -> bool {
    if poly.is_empty() {
        return false;
    }
    let mut inside = false;
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let (xi, yi) = (poly[i].lng, poly[i].lat);
        let (xj, yj) = (poly[j].lng, poly[j].lat);
        let intersect =
            (yi > pt.lat) != (yj > pt.lat) && pt.lng < (xj - xi) * (pt.lat - yi) / (yj - yi) + xi;
        if intersect {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[derive(Debug, Default, Clone)]
pub struct ListingFilter {
    pub uf: Option<String>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    pub min_preco: Option<f64>,
    pub max_preco: Option<f64>,
    pub poly: Option<Vec<LatLng>>,
}

impl ListingFilter {
    pub fn is_empty(&self) -> bool {
        self.uf.is_none()
            && self.min_area.is_none()
            && self.max_area.is_none()
            && self.min_preco.is_none()
            && self.max_preco.is_none()
            && self.poly.is_none()
    }

    /// Compiled UF pattern, built once per filter application.
    fn uf_regex(&self) -> Option<Regex> {
        self.uf.as_deref().filter(|u| !u.is_empty()).map(|uf| {
            Regex::new(&format!(r"(?i)(?:,\s*|\b){}(?:\b|$)", regex::escape(uf)))
                .expect("uf pattern")
        })
    }

    pub fn matches(&self, p: &Property) -> bool {
        self.matches_with(p, self.uf_regex().as_ref())
    }

    fn matches_with(&self, p: &Property, uf_re: Option<&Regex>) -> bool {
        if let Some(re) = uf_re {
            let hit = p.endereco.as_deref().map(|e| re.is_match(e)).unwrap_or(false);
            if !hit {
                return false;
            }
        }

        let area = p.area_m2;
        if let Some(min) = self.min_area {
            if area.unwrap_or(f64::NEG_INFINITY) < min {
                return false;
            }
        }
        if let Some(max) = self.max_area {
            if area.unwrap_or(f64::INFINITY) > max {
                return false;
            }
        }

        let preco = p.preco;
        if let Some(min) = self.min_preco {
            if preco.unwrap_or(f64::NEG_INFINITY) < min {
                return false;
            }
        }
        if let Some(max) = self.max_preco {
            if preco.unwrap_or(f64::INFINITY) > max {
                return false;
            }
        }

        if let Some(poly) = &self.poly {
            // Listings without usable coordinates never match a drawn region.
            let Some(ll) = p.latlng() else {
                return false;
            };
            if !in_bbox(&ll, poly) {
                return false;
            }
            if !point_in_polygon(&ll, poly) {
                return false;
            }
        }

        true
    }

    /// Applies the filter, keeping input order. The UF pattern is compiled
    /// once for the whole batch.
    pub fn apply(&self, items: &[Property]) -> Vec<Property> {
        let uf_re = self.uf_regex();
        items
            .iter()
            .filter(|p| self.matches_with(p, uf_re.as_ref()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn triangle() -> Vec<LatLng> {
        vec![
            LatLng { lat: 0.0, lng: 0.0 },
            LatLng { lat: 0.0, lng: 10.0 },
            LatLng { lat: 10.0, lng: 5.0 },
        ]
    }

    #[test]
    fn poly_param_round() {
        let poly = parse_poly_param("-25.1,-49.2; -25.3,-49.4 ;-25.5,-49.0").unwrap();
        assert_eq!(poly.len(), 3);
        assert_eq!(poly[0].lat, -25.1);

        // junk pairs are skipped, and two vertices are not a polygon
        assert!(parse_poly_param("-25.1,-49.2;x,y;-25.3,-49.4").is_none());
        assert!(parse_poly_param("").is_none());
        assert!(parse_poly_param("garbage").is_none());
    }

    #[test]
    fn point_inside_triangle() {
        let pt = LatLng { lat: 2.0, lng: 5.0 };
        assert!(in_bbox(&pt, &triangle()));
        assert!(point_in_polygon(&pt, &triangle()));
    }

    #[test]
    fn point_outside_bbox_short_circuits() {
        let pt = LatLng { lat: 50.0, lng: 50.0 };
        assert!(!in_bbox(&pt, &triangle()));
    }

    #[test]
    fn point_outside_polygon_inside_bbox() {
        // Corner of the bbox, outside the triangle itself.
        let pt = LatLng { lat: 9.0, lng: 0.5 };
        assert!(in_bbox(&pt, &triangle()));
        assert!(!point_in_polygon(&pt, &triangle()));
    }

    #[test]
    fn uf_filter_matches_address_tail() {
        let f = ListingFilter {
            uf: Some("PR".to_string()),
            ..Default::default()
        };
        let mut p = Property {
            endereco: Some("Fazenda Rio Grande, PR".to_string()),
            ..Default::default()
        };
        assert!(f.matches(&p));
        p.endereco = Some("Registro, SP".to_string());
        assert!(!f.matches(&p));
        p.endereco = None;
        assert!(!f.matches(&p));
    }

    #[test]
    fn bounds_with_missing_values() {
        let p = Property {
            area_m2: None,
            preco: Some(200_000.0),
            ..Default::default()
        };
        // Missing area fails a min-area bound but passes a max-area bound.
        let min = ListingFilter {
            min_area: Some(100.0),
            ..Default::default()
        };
        assert!(!min.matches(&p));
        let max = ListingFilter {
            max_area: Some(100.0),
            ..Default::default()
        };
        assert!(max.matches(&p));

        let price = ListingFilter {
            min_preco: Some(100_000.0),
            max_preco: Some(300_000.0),
            ..Default::default()
        };
        assert!(price.matches(&p));
    }

    #[test]
    fn apply_filters_batch_by_uf() {
        let f = ListingFilter {
            uf: Some("PR".to_string()),
            ..Default::default()
        };
        let items = vec![
            Property {
                id: "A1".to_string(),
                endereco: Some("Curitiba, PR".to_string()),
                ..Default::default()
            },
            Property {
                id: "A2".to_string(),
                endereco: Some("Registro, SP".to_string()),
                ..Default::default()
            },
            Property {
                id: "A3".to_string(),
                endereco: Some("Fazenda Rio Grande - pr".to_string()),
                ..Default::default()
            },
        ];
        let kept = f.apply(&items);
        let ids: Vec<&str> = kept.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A3"]);
    }

    #[test]
    fn poly_filter_requires_geo() {
        let f = ListingFilter {
            poly: Some(triangle()),
            ..Default::default()
        };
        let mut p = Property::default();
        assert!(!f.matches(&p));

        p.geo = Some(json!({"lat": 2.0, "lng": 5.0}));
        assert!(f.matches(&p));

        p.geo = Some(json!({"lat": 50.0, "lng": 50.0}));
        assert!(!f.matches(&p));
    }
}
