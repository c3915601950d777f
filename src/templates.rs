use askama::Template;
use chrono::{Datelike, Utc};

use imoveis_core::seo;

use crate::config::SiteConfig;
use crate::models::{CardView, FilterForm};

/// Site-wide chrome shared by every page: header, contact links and the
/// site-level JSON-LD blocks.
#[derive(Debug, Clone)]
pub struct Shell {
    pub site_name: String,
    pub whatsapp_href: String,
    pub instagram_url: String,
    pub website_ld: String,
    pub agent_ld: String,
    pub year: i32,
}

impl Shell {
    pub fn from_config(cfg: &SiteConfig) -> Self {
        Self {
            site_name: cfg.site_name.clone(),
            whatsapp_href: cfg.whatsapp_href(),
            instagram_url: cfg.instagram_url.clone(),
            website_ld: seo::website_json_ld(&cfg.base_url).to_string(),
            agent_ld: seo::agent_json_ld(
                &cfg.base_url,
                &cfg.site_name,
                &cfg.whatsapp.phone,
                Some(cfg.instagram_url.as_str()),
            )
            .to_string(),
            year: Utc::now().year(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub shell: Shell,
    pub cards: Vec<CardView>,
    pub filters: FilterForm,
    /// Empty when there are results; otherwise the "no results" copy.
    pub empty_message: String,
}

/// Everything the detail page shows for one listing.
#[derive(Debug, Clone)]
pub struct DetailView {
    pub id: String,
    pub titulo: String,
    pub endereco: String,
    pub preco: String,
    pub comparativo: String,
    pub sold: bool,
    pub discounted: bool,
    pub price_class: &'static str,
    pub fotos: Vec<String>,
    pub descricao_html: String,
    pub paragraphs: Vec<String>,
    pub diferenciais: Vec<String>,
    /// JSON for the map renderer; empty when the listing has no usable geo.
    pub map_points_json: String,
    pub viewer3d_url: String,
    pub similares: Vec<CardView>,
    pub meta_title: String,
    pub meta_description: String,
    pub canonical: String,
    pub og_image: String,
    pub json_ld: String,
    pub breadcrumb_ld: String,
}

#[derive(Template)]
#[template(path = "property.html")]
pub struct PropertyTemplate {
    pub shell: Shell,
    pub detail: DetailView,
}

#[derive(Template)]
#[template(path = "mapa.html")]
pub struct MapTemplate {
    pub shell: Shell,
    pub points_json: String,
    pub count: usize,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub shell: Shell,
}
