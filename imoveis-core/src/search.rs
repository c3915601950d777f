//! Header search box ranking. Queries are interpreted in order of intent:
//! listing code, area, price, ambiguous number (area and price merged), and
//! finally free text over title and address.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::Property;
use crate::format::normalize_text;

const MAX_RESULTS: usize = 8;
// Wider cut before merging area and price candidates.
const CANDIDATE_POOL: usize = 16;
const MIN_SCORE: f64 = 0.2;

static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[a-z]{1,3}\d{2,}$").unwrap());
static AREA_INTENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\bm\b|\bm2\b|m²)").unwrap());
static MONEY_INTENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(^|\s)(r\$|\$)").unwrap());

/// `TR046`, `CS005`… one to three letters followed by at least two digits.
pub fn is_code(raw: &str) -> bool {
    CODE_RE.is_match(raw.trim())
}

/// Digits-only reading of the query ("R$ 350.000" → 350000).
pub fn parse_number(raw: &str) -> Option<i64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Relative similarity in [0, 1]: `1 − |a−b|/max(a,b)`, zero when the larger
/// value is not positive.
pub fn similarity_score(a: f64, b: f64) -> f64 {
    let maxv = a.max(b);
    if maxv <= 0.0 {
        return 0.0;
    }
    1.0 - ((a - b).abs() / maxv).min(1.0)
}

fn rank_numeric<F>(items: &[Property], target: f64, field: F) -> Vec<(usize, f64)>
where
    F: Fn(&Property) -> Option<f64>,
{
    let mut scored: Vec<(usize, f64)> = items
        .iter()
        .enumerate()
        .filter_map(|(i, p)| field(p).map(|v| (i, similarity_score(v, target))))
        .filter(|(_, s)| *s > MIN_SCORE)
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(CANDIDATE_POOL);
    scored
}

/// Ranks listings against a raw query, returning at most eight hits.
pub fn search(items: &[Property], raw: &str) -> Vec<Property> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    // 1) Listing code: substring match on the id.
    if is_code(raw) {
        let low = raw.to_lowercase();
        let mut hits: Vec<&Property> = items
            .iter()
            .filter(|p| p.id.to_lowercase().contains(&low))
            .collect();
        hits.sort_by(|a, b| a.id.cmp(&b.id));
        return hits.into_iter().take(MAX_RESULTS).cloned().collect();
    }

    let num = parse_number(raw);
    let looks_area = AREA_INTENT_RE.is_match(raw);
    let looks_money = MONEY_INTENT_RE.is_match(raw);

    if let Some(n) = num {
        let target = n as f64;

        // 2) Explicit area intent ("500 m²").
        if looks_area {
            return take_items(items, rank_numeric(items, target, |p| p.area_m2));
        }

        // 3) Explicit money intent ("R$ 350.000").
        if looks_money {
            return take_items(items, rank_numeric(items, target, |p| p.preco));
        }

        // 4) Bare number: try both readings, merge by id keeping the higher
        //    score.
        let area_hits = rank_numeric(items, target, |p| p.area_m2);
        let price_hits = rank_numeric(items, target, |p| p.preco);
        let mut merged: HashMap<&str, (usize, f64)> = HashMap::new();
        for (i, score) in area_hits.into_iter().chain(price_hits) {
            let entry = merged.entry(items[i].id.as_str()).or_insert((i, score));
            if score > entry.1 {
                *entry = (i, score);
            }
        }
        let mut ranked: Vec<(usize, f64)> = merged.into_values().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        return take_items(items, ranked);
    }

    // 5) Free text over title and address, accent-insensitive.
    let needle = normalize_text(raw);
    let mut scored: Vec<(usize, f64)> = items
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            let mut hay = p.titulo.clone();
            if let Some(e) = p.endereco.as_deref().filter(|e| !e.is_empty()) {
                hay.push(' ');
                hay.push_str(e);
            }
            let hay = normalize_text(&hay);
            hay.find(&needle)
                .map(|idx| (i, 1.0 - idx as f64 / hay.len().max(1) as f64))
        })
        .filter(|(_, s)| *s > 0.0)
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    take_items(items, scored)
}

fn take_items(items: &[Property], ranked: Vec<(usize, f64)>) -> Vec<Property> {
    ranked
        .into_iter()
        .take(MAX_RESULTS)
        .map(|(i, _)| items[i].clone())
        .collect()
}

/// "You may also like" ranking for a detail page: same-state listings first,
/// then closeness in area and price.
pub fn similar_listings(all: &[Property], to: &Property, n: usize) -> Vec<Property> {
    let uf_from = to
        .endereco
        .as_deref()
        .and_then(crate::format::extract_uf)
        .unwrap_or_default();

    let mut scored: Vec<(&Property, f64)> = all
        .iter()
        .filter(|p| p.id != to.id)
        .map(|p| {
            let uf = p
                .endereco
                .as_deref()
                .and_then(crate::format::extract_uf)
                .unwrap_or_default();
            let uf_penalty = if !uf.is_empty() && uf == uf_from { 0.0 } else { 1.0 };
            let score = uf_penalty * 1000.0
                + (p.area_m2.unwrap_or(0.0) - to.area_m2.unwrap_or(0.0)).abs() / 100.0
                + (p.preco.unwrap_or(0.0) - to.preco.unwrap_or(0.0)).abs() / 1000.0;
            (p, score)
        })
        .collect();
    scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().take(n).map(|(p, _)| p.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: &str, titulo: &str, area: Option<f64>, preco: Option<f64>) -> Property {
        Property {
            id: id.to_string(),
            slug: id.to_lowercase(),
            titulo: titulo.to_string(),
            area_m2: area,
            preco,
            moeda: "BRL".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn detects_codes() {
        assert!(is_code("TR046"));
        assert!(is_code("cs005"));
        assert!(!is_code("500"));
        assert!(!is_code("terreno"));
        assert!(!is_code("TRXX"));
    }

    #[test]
    fn code_query_matches_id_substring() {
        let items = vec![
            listing("TR046", "Terreno", None, None),
            listing("TR001", "Terreno", None, None),
            listing("CS005", "Casa", None, None),
        ];
        let hits = search(&items, "tr04");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "TR046");
    }

    #[test]
    fn similarity_score_bounds() {
        assert_eq!(similarity_score(100.0, 100.0), 1.0);
        assert_eq!(similarity_score(0.0, 0.0), 0.0);
        assert!(similarity_score(50.0, 100.0) > 0.0);
        assert_eq!(similarity_score(0.0, -5.0), 0.0);
    }

    #[test]
    fn area_intent_uses_area_only() {
        let items = vec![
            listing("A1", "Terreno", Some(5000.0), Some(90_000_000.0)),
            listing("A2", "Terreno", Some(90.0), Some(5000.0)),
        ];
        let hits = search(&items, "5000 m²");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "A1");
    }

    #[test]
    fn money_intent_uses_price_only() {
        let items = vec![
            listing("A1", "Terreno", Some(5000.0), Some(90_000_000.0)),
            listing("A2", "Terreno", Some(90.0), Some(5000.0)),
        ];
        let hits = search(&items, "R$ 5000");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "A2");
    }

    #[test]
    fn bare_number_merges_area_and_price_matches() {
        // 5000 reads as both an area and a price; the union must contain the
        // area match and the price match, deduplicated by id.
        let items = vec![
            listing("A1", "Terreno", Some(5000.0), Some(750_000.0)),
            listing("A2", "Galpão", Some(120.0), Some(5000.0)),
            listing("A3", "Ambos", Some(4800.0), Some(5200.0)),
        ];
        let hits = search(&items, "5000");
        let ids: Vec<&str> = hits.iter().map(|p| p.id.as_str()).collect();
        assert!(ids.contains(&"A1"));
        assert!(ids.contains(&"A2"));
        assert!(ids.contains(&"A3"));
        // A3 matched on both axes but appears once.
        assert_eq!(ids.iter().filter(|i| **i == "A3").count(), 1);
        // Exact matches outrank the near miss.
        assert!(ids[0] == "A1" || ids[0] == "A2");
    }

    #[test]
    fn text_search_is_accent_insensitive() {
        let mut p = listing("A1", "Terreno em São José dos Pinhais", None, None);
        p.endereco = Some("São José dos Pinhais, PR".to_string());
        let items = vec![p, listing("A2", "Casa em Curitiba", None, None)];
        let hits = search(&items, "sao jose");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "A1");
    }

    #[test]
    fn earlier_matches_rank_higher() {
        let items = vec![
            listing("A1", "Curitiba terreno amplo", None, None),
            listing("A2", "Terreno amplo em Curitiba", None, None),
        ];
        let hits = search(&items, "curitiba");
        assert_eq!(hits[0].id, "A1");
    }

    #[test]
    fn similars_prefer_same_state() {
        let mut base = listing("TR001", "Terreno", Some(1000.0), Some(100_000.0));
        base.endereco = Some("Curitiba, PR".to_string());
        let mut same_uf = listing("TR002", "Terreno", Some(9000.0), Some(900_000.0));
        same_uf.endereco = Some("Colombo, PR".to_string());
        let mut other_uf = listing("TR003", "Terreno", Some(1000.0), Some(100_000.0));
        other_uf.endereco = Some("Registro, SP".to_string());

        let all = vec![base.clone(), same_uf, other_uf];
        let sims = similar_listings(&all, &base, 5);
        assert_eq!(sims[0].id, "TR002");
        assert_eq!(sims.len(), 2);
    }
}
