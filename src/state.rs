use std::sync::Arc;
use std::time::Duration;

use imoveis_core::store::ContentStore;
use reqwest::Client;

use crate::config::SiteConfig;
use crate::viewer3d::ViewerCache;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ContentStore>,
    pub http: Client,
    pub config: Arc<SiteConfig>,
    pub viewer_cache: Arc<ViewerCache>,
}

impl AppState {
    pub fn new(config: SiteConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            store: Arc::new(ContentStore::new(&config.content_dir)),
            http,
            config: Arc::new(config),
            viewer_cache: Arc::new(ViewerCache::default()),
        }
    }
}
