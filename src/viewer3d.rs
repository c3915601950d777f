//! Existence probe for the per-listing 3D topography viewer. Viewers are
//! published as GitHub Pages sites in repos named after the listing code;
//! the public repos API tells us whether Pages is enabled before we render
//! an iframe pointing at it. Any network or rate-limit failure hides the
//! section.

use std::collections::HashMap;
use std::sync::Mutex;

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::Viewer3dConfig;

const USER_AGENT: &str = "imoveis-web/0.1";

/// Probe results keyed by upper-cased listing code. The unauthenticated
/// GitHub API quota is 60 requests per hour per IP, so each code is probed
/// at most once per process and detail pages never wait on a repeat lookup.
#[derive(Default)]
pub struct ViewerCache {
    inner: Mutex<HashMap<String, Option<String>>>,
}

impl ViewerCache {
    pub fn get(&self, code: &str) -> Option<Option<String>> {
        self.inner.lock().ok()?.get(code).cloned()
    }

    pub fn put(&self, code: &str, url: Option<String>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.insert(code.to_string(), url);
        }
    }
}

/// Resolves the published viewer URL for a listing code, or `None` when the
/// repo is missing, Pages is disabled, or the probe fails. Results (hits and
/// misses alike) are cached for the life of the process.
pub async fn resolve_viewer_url(
    http: &Client,
    cfg: &Viewer3dConfig,
    cache: &ViewerCache,
    code: &str,
) -> Option<String> {
    let code = code.trim().to_uppercase();
    if code.is_empty() {
        return None;
    }
    if let Some(hit) = cache.get(&code) {
        return hit;
    }
    let resolved = probe(http, cfg, &code).await;
    cache.put(&code, resolved.clone());
    resolved
}

async fn probe(http: &Client, cfg: &Viewer3dConfig, code: &str) -> Option<String> {
    let repo = format!("{}{}", cfg.repo_prefix, code);
    let api = format!("https://api.github.com/repos/{}/{}", cfg.owner, repo);

    let resp = match http.get(&api).header("User-Agent", USER_AGENT).send().await {
        Ok(resp) => resp,
        Err(e) => {
            debug!("viewer probe failed for {}: {}", repo, e);
            return None;
        }
    };
    if !resp.status().is_success() {
        debug!("viewer repo {} not available: {}", repo, resp.status());
        return None;
    }

    let data: Value = resp.json().await.ok()?;
    match data.get("has_pages").and_then(Value::as_bool) {
        Some(false) => None,
        // Missing flag is rare; assume the page exists.
        _ => Some(format!("https://{}.github.io/{}/", cfg.owner, repo)),
    }
}

/// Pages URLs need the trailing slash so the host serves `index.html`.
pub fn ensure_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash() {
        assert_eq!(ensure_trailing_slash("https://x.github.io/r"), "https://x.github.io/r/");
        assert_eq!(ensure_trailing_slash("https://x.github.io/r/"), "https://x.github.io/r/");
    }

    #[tokio::test]
    async fn cached_results_skip_the_network() {
        let cache = ViewerCache::default();
        cache.put("TR046", Some("https://x.github.io/r/".to_string()));
        cache.put("TR047", None);

        let http = Client::new();
        let cfg = Viewer3dConfig::default();

        // Both codes resolve from the cache; a real probe against the
        // placeholder config would never produce these values.
        let hit = resolve_viewer_url(&http, &cfg, &cache, "tr046").await;
        assert_eq!(hit.as_deref(), Some("https://x.github.io/r/"));
        let miss = resolve_viewer_url(&http, &cfg, &cache, "TR047").await;
        assert_eq!(miss, None);
    }

    #[test]
    fn cache_keys_are_exact() {
        let cache = ViewerCache::default();
        assert_eq!(cache.get("TR046"), None);
        cache.put("TR046", None);
        assert_eq!(cache.get("TR046"), Some(None));
    }
}
