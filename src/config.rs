use imoveis_core::common::error::{Result, SiteError};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site_name: String,
    pub base_url: String,
    /// Public content root; listings live under `<content_dir>/properties`.
    pub content_dir: String,
    pub port: u16,
    pub instagram_url: String,
    pub og_default_image: String,
    pub whatsapp: WhatsAppConfig,
    pub viewer3d: Viewer3dConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WhatsAppConfig {
    /// Phone in E.164 format, e.g. +5541987098082
    pub phone: String,
    /// Prefilled message for the floating contact link
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Viewer3dConfig {
    /// GitHub account that publishes the per-listing viewer repos
    pub owner: String,
    /// Repo name prefix; the listing code (upper-cased) is appended
    pub repo_prefix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: "P-Link Imóveis".to_string(),
            base_url: "https://www.p-linkimoveis.com.br".to_string(),
            content_dir: "public/content".to_string(),
            port: 3000,
            instagram_url: String::new(),
            og_default_image: "/static/og-default.jpg".to_string(),
            whatsapp: WhatsAppConfig::default(),
            viewer3d: Viewer3dConfig::default(),
        }
    }
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            phone: String::new(),
            message: "Olá! Vim pelo site.".to_string(),
        }
    }
}

impl Default for Viewer3dConfig {
    fn default() -> Self {
        Self {
            owner: "plinkbrasil".to_string(),
            repo_prefix: "P-Link_Imoveis_".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SiteError::Config(format!("failed to read config file '{}': {}", path, e))
        })?;
        let config: SiteConfig = toml::from_str(&content)
            .map_err(|e| SiteError::Config(format!("failed to parse '{}': {}", path, e)))?;
        Ok(config)
    }

    /// `https://wa.me/<digits>?text=<message>` deep link for the floating
    /// contact button; empty when no phone is configured.
    pub fn whatsapp_href(&self) -> String {
        let digits: String = self
            .whatsapp
            .phone
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        if digits.is_empty() {
            return String::new();
        }
        let mut href = format!("https://wa.me/{}", digits);
        if !self.whatsapp.message.is_empty() {
            let encoded: String =
                url::form_urlencoded::byte_serialize(self.whatsapp.message.as_bytes()).collect();
            href.push_str("?text=");
            href.push_str(&encoded);
        }
        href
    }
}
