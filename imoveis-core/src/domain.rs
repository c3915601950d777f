use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical geographic coordinates in signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// One real-estate listing, reconstructed from its content folder on each
/// read. The folder name doubles as the listing code (e.g. `TR046`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub slug: String,
    pub titulo: String,
    pub endereco: Option<String>,
    pub tipo: Option<String>,
    /// Price in `moeda`. `0` means "price on request", `-1` means sold.
    pub preco: Option<f64>,
    pub moeda: String,
    pub valor_comparativo: Option<f64>,
    pub area_m2: Option<f64>,
    /// Raw geo object from metadata; values may be numbers, locale decimal
    /// strings or DMS strings. Normalized on demand via [`Property::latlng`].
    pub geo: Option<Value>,
    /// Public URL paths under `/content/properties/<id>/`.
    pub fotos: Vec<String>,
    pub viewer3d: Option<String>,
    /// Description paragraphs.
    pub descricao: Vec<String>,
    pub descricao_html: Option<String>,
    pub diferenciais: Vec<String>,
}

impl Property {
    pub fn is_sold(&self) -> bool {
        self.preco == Some(-1.0)
    }

    pub fn latlng(&self) -> Option<LatLng> {
        self.geo.as_ref().and_then(crate::geo::normalize_lat_lng)
    }

    /// Path of the detail page, preferring the slug over the raw id.
    pub fn href(&self) -> String {
        let tail = if self.slug.is_empty() { &self.id } else { &self.slug };
        format!("/imoveis/{}", tail)
    }
}
