//! View models: everything the templates show is formatted here so the
//! templates stay declarative.

use imoveis_core::domain::Property;
use imoveis_core::format::{fmt_area, fmt_money, fmt_price};
use serde::{Deserialize, Serialize};

/// One card in a listing grid (home page and "you may also like").
#[derive(Debug, Clone)]
pub struct CardView {
    pub id: String,
    pub href: String,
    pub titulo: String,
    pub endereco: String,
    pub foto: String,
    pub area: String,
    pub preco: String,
    pub comparativo: String,
    pub sold: bool,
    pub discounted: bool,
    pub price_class: &'static str,
}

impl CardView {
    pub fn from_property(p: &Property) -> Self {
        let sold = p.is_sold();
        let preco = p.preco.map(|n| fmt_price(n, &p.moeda)).unwrap_or_default();
        let comp = p.valor_comparativo.filter(|c| *c > 0.0);
        let discounted = !sold
            && matches!((p.preco, comp), (Some(preco), Some(comp)) if comp > preco && preco > 0.0);
        let comparativo = comp
            .filter(|_| discounted)
            .map(|c| fmt_money(c, &p.moeda))
            .unwrap_or_default();

        let price_class = match preco.as_str() {
            "VENDIDO" => "price-sold",
            "SOB CONSULTA" => "price-muted",
            _ => "price-ok",
        };

        Self {
            id: p.id.clone(),
            href: p.href(),
            titulo: p.titulo.clone(),
            endereco: p.endereco.clone().unwrap_or_default(),
            foto: p.fotos.first().cloned().unwrap_or_default(),
            area: p.area_m2.map(fmt_area).unwrap_or_default(),
            preco,
            comparativo,
            sold,
            discounted,
            price_class,
        }
    }
}

/// Home-page filter form state, echoed back into the inputs.
#[derive(Debug, Clone, Default)]
pub struct FilterForm {
    pub uf: String,
    pub min_area: String,
    pub max_area: String,
    pub min_preco: String,
    pub max_preco: String,
    pub poly: String,
}

/// Query parameters accepted by the home page.
#[derive(Debug, Default, Deserialize)]
pub struct HomeParams {
    pub uf: Option<String>,
    #[serde(rename = "minArea")]
    pub min_area: Option<String>,
    #[serde(rename = "maxArea")]
    pub max_area: Option<String>,
    #[serde(rename = "minPreco")]
    pub min_preco: Option<String>,
    #[serde(rename = "maxPreco")]
    pub max_preco: Option<String>,
    pub poly: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// JSON payload for the header search box.
#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub slug: String,
    pub href: String,
    pub titulo: String,
    pub endereco: String,
    pub area: String,
    pub preco: String,
}

impl SearchResult {
    pub fn from_property(p: &Property) -> Self {
        Self {
            id: p.id.clone(),
            slug: p.slug.clone(),
            href: p.href(),
            titulo: p.titulo.clone(),
            endereco: p.endereco.clone().unwrap_or_default(),
            area: p.area_m2.map(fmt_area).unwrap_or_default(),
            preco: p.preco.map(|n| fmt_price(n, &p.moeda)).unwrap_or_default(),
        }
    }
}

/// Marker payload embedded into the map pages for the client-side renderer.
#[derive(Debug, Serialize)]
pub struct MapPoint {
    pub id: String,
    pub href: String,
    pub titulo: String,
    pub endereco: String,
    pub lat: f64,
    pub lng: f64,
    pub preco: String,
    pub area: String,
    pub foto: String,
}

impl MapPoint {
    pub fn from_property(p: &Property) -> Option<Self> {
        let ll = p.latlng()?;
        Some(Self {
            id: p.id.clone(),
            href: p.href(),
            titulo: p.titulo.clone(),
            endereco: p.endereco.clone().unwrap_or_default(),
            lat: ll.lat,
            lng: ll.lng,
            preco: p.preco.map(|n| fmt_price(n, &p.moeda)).unwrap_or_default(),
            area: p.area_m2.map(fmt_area).unwrap_or_default(),
            foto: p.fotos.first().cloned().unwrap_or_default(),
        })
    }
}

/// Serializes map points for embedding inside a `<script>` tag.
pub fn embed_json<T: Serialize>(value: &T) -> String {
    let json = serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string());
    // Close-tag sequences would end the surrounding script element early.
    json.replace("</", "<\\/")
}
