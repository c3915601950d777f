//! Locale-aware text helpers: pt-BR money/area formatting, slugs, address
//! parsing and the SEO title/description builders.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::domain::Property;

static UF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[,\-]\s*([A-Za-z]{2})(?:\b|$)").unwrap());
static PARAGRAPH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n(\r?\n)+").unwrap());
static TIPO_RESIDENCIAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(casa|sobrado|apart|studio|kitnet|cobertura)").unwrap());
static TIPO_HOTEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(hotel|pousada|flat)").unwrap());

/// Folds the accented letters of the pt-BR alphabet down to ASCII.
pub fn fold_accents(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'ç' => 'c',
            'Ç' => 'C',
            'ñ' => 'n',
            'Ñ' => 'N',
            _ => c,
        })
        .collect()
}

/// Accent-folded, lowercased form used for fuzzy text matching.
pub fn normalize_text(s: &str) -> String {
    fold_accents(s).to_lowercase()
}

/// URL slug from a title: accents folded, lowercased, non-alphanumeric runs
/// collapsed to `-`. Falls back (usually to the folder name) when nothing
/// survives.
pub fn slugify(s: &str, fallback: &str) -> String {
    let folded = fold_accents(s).to_lowercase();
    let mut out = String::with_capacity(folded.len());
    let mut pending_dash = false;
    for c in folded.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    if out.is_empty() {
        fallback.to_string()
    } else {
        out
    }
}

/// Coerces a metadata value to a number. Strings are read as pt-BR numerals:
/// `.` thousands separators are stripped and `,` becomes the decimal point,
/// so `"1.234,56"` yields `1234.56`. Returns `None` for anything else.
pub fn coerce_num(x: &Value) -> Option<f64> {
    match x {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => coerce_num_str(s),
        _ => None,
    }
}

pub fn coerce_num_str(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .replace('.', "")
        .replace(',', ".")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Like [`coerce_num`] but rounds string-coerced values to the nearest whole
/// number, matching how the content store stores prices and areas.
pub fn coerce_num_rounded(x: &Value) -> Option<f64> {
    match x {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => coerce_num_str(s).map(f64::round),
        _ => None,
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// pt-BR currency rendering with the listing sentinels: `0` is "price on
/// request" and `-1` is sold.
pub fn fmt_price(n: f64, moeda: &str) -> String {
    if n == 0.0 {
        return "SOB CONSULTA".to_string();
    }
    if n == -1.0 {
        return "VENDIDO".to_string();
    }
    fmt_money(n, moeda)
}

/// Plain currency amount, no sentinel handling (used for comparison prices).
pub fn fmt_money(n: f64, moeda: &str) -> String {
    if moeda != "BRL" {
        return fmt_bare_number(n);
    }
    let mut int = n.abs().trunc() as i64;
    let mut cents = ((n.abs() - n.abs().trunc()) * 100.0).round() as i64;
    if cents >= 100 {
        int += 1;
        cents -= 100;
    }
    let sign = if n < 0.0 { "-" } else { "" };
    format!("R$ {}{},{:02}", sign, group_thousands(int), cents)
}

fn fmt_bare_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// `1234.0` → `"1.234 m²"`.
pub fn fmt_area(n: f64) -> String {
    format!("{} m²", group_thousands(n.round() as i64))
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AddressParts {
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub uf: Option<String>,
}

/// Splits `"Bairro, Cidade, UF"` into parts; shorter forms fill from the left
/// of what remains (`"Cidade, UF"`, `"Cidade"`).
pub fn parse_address(endereco: &str) -> AddressParts {
    let parts: Vec<&str> = endereco
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    match parts.as_slice() {
        [bairro, cidade, uf] => AddressParts {
            bairro: Some(bairro.to_string()),
            cidade: Some(cidade.to_string()),
            uf: Some(uf.to_string()),
        },
        [cidade, uf] => AddressParts {
            bairro: None,
            cidade: Some(cidade.to_string()),
            uf: Some(uf.to_string()),
        },
        [cidade] => AddressParts {
            bairro: None,
            cidade: Some(cidade.to_string()),
            uf: None,
        },
        _ => AddressParts::default(),
    }
}

/// Two-letter state code from an address tail like `", PR"` or `"- SP"`.
pub fn extract_uf(endereco: &str) -> Option<String> {
    UF_RE
        .captures(endereco)
        .map(|c| c[1].to_uppercase())
}

/// Splits free text into paragraphs on blank lines.
pub fn split_paragraphs(s: &str) -> Vec<String> {
    PARAGRAPH_RE
        .split(s)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Clamps meta-description text to `max` characters, cutting at the last
/// sentence or word boundary past position 60 when possible.
pub fn clamp_meta(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max {
        return s.to_string();
    }
    let cut: String = chars[..max].iter().collect();
    let boundary = [".", ",", " "]
        .iter()
        .filter_map(|sep| cut.rfind(sep))
        .max();
    match boundary {
        Some(i) if i > 60 => cut[..i].trim().to_string(),
        _ => cut.trim().to_string(),
    }
}

fn trim_quotes(s: &str) -> &str {
    s.trim_matches('"').trim()
}

/// Lowercased, accent-folded type hint used to pick contextual copy.
fn norm_tipo(p: &Property) -> String {
    let raw = p
        .tipo
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(&p.titulo);
    let raw = if raw.is_empty() { "Imóvel" } else { raw };
    normalize_text(raw)
}

/// Page title: the metadata title verbatim, with a minimal contextual
/// fallback when the folder had none.
pub fn build_title(p: &Property, site_name: &str) -> String {
    let t = p.titulo.trim();
    if !t.is_empty() && t != p.id {
        return t.to_string();
    }
    let mut parts = vec!["Imóvel à Venda".to_string()];
    if let Some(area) = p.area_m2 {
        parts.push(fmt_area(area));
    }
    match p.endereco.as_deref().filter(|e| !e.is_empty()) {
        Some(e) => parts.push(e.to_string()),
        None => parts.push(site_name.to_string()),
    }
    parts.join(" – ")
}

/// Meta description: first substantial paragraph of the listing text, else a
/// contextual sentence keyed off the property type. Clamped to 160 chars.
pub fn build_description(p: &Property) -> String {
    let mut base = String::new();
    for par in &p.descricao {
        let clean = trim_quotes(par);
        if clean.chars().count() >= 60 {
            base = clean.to_string();
            break;
        }
    }
    if base.is_empty() {
        if let Some(first) = p.descricao.first() {
            base = trim_quotes(first).to_string();
        }
    }

    if base.chars().count() <= 40 {
        let tipo_norm = norm_tipo(p);
        let cauda = if TIPO_RESIDENCIAL_RE.is_match(&tipo_norm) {
            "excelente opção residencial, com conforto e localização privilegiada"
        } else if TIPO_HOTEL_RE.is_match(&tipo_norm) {
            "ideal para hospitalidade, turismo e operações de médio a grande porte"
        } else {
            "ideal para investimento, logística ou uso industrial"
        };

        let mut parts: Vec<String> = Vec::new();
        parts.push(p.tipo.clone().unwrap_or_else(|| "Imóvel".to_string()));
        if let Some(area) = p.area_m2 {
            parts.push(fmt_area(area));
        }
        if let Some(e) = p.endereco.as_deref().filter(|e| !e.is_empty()) {
            parts.push(format!("em {}", e));
        }
        parts.push(cauda.to_string());
        base = parts.join(" ");
    }

    clamp_meta(&base, 160)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerces_pt_br_numerals() {
        assert_eq!(coerce_num(&json!("1.234,56")), Some(1234.56));
        assert_eq!(coerce_num_rounded(&json!("1.234,56")), Some(1235.0));
        assert_eq!(coerce_num(&json!(49.5)), Some(49.5));
        assert_eq!(coerce_num(&json!("R$ 350.000")), Some(350000.0));
        assert_eq!(coerce_num(&json!("abc")), None);
        assert_eq!(coerce_num(&json!(null)), None);
        assert_eq!(coerce_num(&json!(["1"])), None);
    }

    #[test]
    fn price_sentinels() {
        assert_eq!(fmt_price(0.0, "BRL"), "SOB CONSULTA");
        assert_eq!(fmt_price(-1.0, "BRL"), "VENDIDO");
        assert_eq!(fmt_price(1_234_567.0, "BRL"), "R$ 1.234.567,00");
        assert_eq!(fmt_price(990.5, "BRL"), "R$ 990,50");
        assert_eq!(fmt_price(1500.0, "USD"), "1500");
    }

    #[test]
    fn area_formatting() {
        assert_eq!(fmt_area(1234.0), "1.234 m²");
        assert_eq!(fmt_area(49.6), "50 m²");
    }

    #[test]
    fn slugs_fold_accents() {
        assert_eq!(slugify("Terreno em Curitiba – São José", "x"), "terreno-em-curitiba-sao-jose");
        assert_eq!(slugify("***", "tr046"), "tr046");
    }

    #[test]
    fn address_parsing() {
        let a = parse_address("Umbará, Curitiba, PR");
        assert_eq!(a.bairro.as_deref(), Some("Umbará"));
        assert_eq!(a.cidade.as_deref(), Some("Curitiba"));
        assert_eq!(a.uf.as_deref(), Some("PR"));

        let b = parse_address("Curitiba, PR");
        assert_eq!(b.bairro, None);
        assert_eq!(b.cidade.as_deref(), Some("Curitiba"));

        assert_eq!(extract_uf("Fazenda Rio Grande, PR"), Some("PR".to_string()));
        assert_eq!(extract_uf("Curitiba - pr"), Some("PR".to_string()));
        assert_eq!(extract_uf("sem estado"), None);
    }

    #[test]
    fn clamps_meta_descriptions() {
        let s = "a".repeat(200);
        assert_eq!(clamp_meta(&s, 160).chars().count(), 160);

        let s = format!("{}. {}", "b".repeat(100), "c".repeat(100));
        let out = clamp_meta(&s, 160);
        assert!(out.chars().count() <= 160);
        // Cut lands on the sentence boundary, dropping the trailing fragment.
        assert!(out.ends_with('.'), "got: {}", out);
        assert!(!out.contains('c'));
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let parts = split_paragraphs("primeiro\n\nsegundo\r\n\r\nterceiro");
        assert_eq!(parts, vec!["primeiro", "segundo", "terceiro"]);
    }

    #[test]
    fn description_falls_back_by_tipo() {
        let p = Property {
            titulo: "Casa ampla".to_string(),
            area_m2: Some(250.0),
            endereco: Some("Curitiba, PR".to_string()),
            ..Default::default()
        };
        let d = build_description(&p);
        assert!(d.contains("opção residencial"), "got: {}", d);
        assert!(d.chars().count() <= 160);
    }

    #[test]
    fn title_uses_metadata_verbatim() {
        let p = Property {
            id: "TR046".to_string(),
            titulo: "Terreno 20.000 m² em Mandirituba".to_string(),
            ..Default::default()
        };
        assert_eq!(build_title(&p, "Site"), "Terreno 20.000 m² em Mandirituba");

        let q = Property {
            id: "TR047".to_string(),
            titulo: "TR047".to_string(),
            area_m2: Some(5000.0),
            ..Default::default()
        };
        assert_eq!(build_title(&q, "Site"), "Imóvel à Venda – 5.000 m² – Site");
    }
}
