//! schema.org JSON-LD builders for listing pages and the site shell.

use serde_json::{json, Value};

use crate::domain::Property;
use crate::format::{build_description, build_title, parse_address};

/// Absolute URL under the configured site origin; already-absolute paths pass
/// through.
pub fn absolute_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// `RealEstateListing` block for a detail page.
pub fn listing_json_ld(p: &Property, base_url: &str, site_name: &str) -> Value {
    let endereco = p.endereco.clone().unwrap_or_default();
    let parts = parse_address(&endereco);
    let locality = parts
        .bairro
        .or(parts.cidade)
        .unwrap_or_default();
    let region = parts.uf.unwrap_or_default();

    let mut ld = json!({
        "@context": "https://schema.org",
        "@type": "RealEstateListing",
        "name": build_title(p, site_name),
        "description": build_description(p),
        "url": absolute_url(base_url, &p.href()),
        "address": {
            "@type": "PostalAddress",
            "streetAddress": endereco,
            "addressLocality": locality,
            "addressRegion": region,
            "addressCountry": "BR",
        },
    });

    if let Some(ll) = p.latlng() {
        ld["geo"] = json!({
            "@type": "GeoCoordinates",
            "latitude": ll.lat,
            "longitude": ll.lng,
        });
    }

    // Only a real asking price becomes an Offer; the sentinels do not.
    if let Some(preco) = p.preco.filter(|v| *v > 0.0) {
        ld["offers"] = json!({
            "@type": "Offer",
            "price": preco,
            "priceCurrency": p.moeda,
            "availability": "https://schema.org/InStock",
        });
    }

    ld
}

pub fn breadcrumb_json_ld(p: &Property, base_url: &str) -> Value {
    let home = absolute_url(base_url, "/");
    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": [
            { "@type": "ListItem", "position": 1, "name": "Home", "item": home },
            { "@type": "ListItem", "position": 2, "name": "Imóveis", "item": home },
            {
                "@type": "ListItem",
                "position": 3,
                "name": p.titulo,
                "item": absolute_url(base_url, &p.href()),
            },
        ],
    })
}

pub fn website_json_ld(base_url: &str) -> Value {
    let home = absolute_url(base_url, "/");
    json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "url": home,
        "potentialAction": {
            "@type": "SearchAction",
            "target": format!("{}?q={{search_term_string}}", home),
            "query-input": "required name=search_term_string",
        },
    })
}

pub fn agent_json_ld(
    base_url: &str,
    site_name: &str,
    phone: &str,
    instagram_url: Option<&str>,
) -> Value {
    let mut ld = json!({
        "@context": "https://schema.org",
        "@type": "RealEstateAgent",
        "name": site_name,
        "url": absolute_url(base_url, "/"),
        "logo": absolute_url(base_url, "/static/logo.svg"),
        "telephone": phone,
    });
    if let Some(insta) = instagram_url.filter(|u| !u.is_empty()) {
        ld["sameAs"] = json!([insta]);
    }
    ld
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing() -> Property {
        Property {
            id: "TR046".to_string(),
            slug: "terreno-mandirituba".to_string(),
            titulo: "Terreno 20.000 m² em Mandirituba".to_string(),
            endereco: Some("Centro, Mandirituba, PR".to_string()),
            preco: Some(750_000.0),
            moeda: "BRL".to_string(),
            geo: Some(json!({"lat": "-25,78", "lng": "-49,33"})),
            ..Default::default()
        }
    }

    #[test]
    fn listing_ld_has_offer_and_geo() {
        let ld = listing_json_ld(&listing(), "https://example.com.br", "Site");
        assert_eq!(ld["offers"]["price"], json!(750_000.0));
        assert_eq!(ld["address"]["addressLocality"], json!("Centro"));
        assert_eq!(ld["address"]["addressRegion"], json!("PR"));
        assert!((ld["geo"]["latitude"].as_f64().unwrap() + 25.78).abs() < 1e-9);
        assert_eq!(
            ld["url"],
            json!("https://example.com.br/imoveis/terreno-mandirituba")
        );
    }

    #[test]
    fn sentinel_prices_have_no_offer() {
        let mut p = listing();
        p.preco = Some(0.0);
        let ld = listing_json_ld(&p, "https://example.com.br", "Site");
        assert!(ld.get("offers").is_none());

        p.preco = Some(-1.0);
        let ld = listing_json_ld(&p, "https://example.com.br", "Site");
        assert!(ld.get("offers").is_none());
    }

    #[test]
    fn breadcrumbs_end_at_the_listing() {
        let ld = breadcrumb_json_ld(&listing(), "https://example.com.br");
        let items = ld["itemListElement"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2]["name"], json!("Terreno 20.000 m² em Mandirituba"));
    }

    #[test]
    fn absolute_urls() {
        assert_eq!(
            absolute_url("https://x.com/", "/a/b"),
            "https://x.com/a/b"
        );
        assert_eq!(absolute_url("https://x.com", "a"), "https://x.com/a");
        assert_eq!(absolute_url("https://x.com", "https://y.com/z"), "https://y.com/z");
    }
}
