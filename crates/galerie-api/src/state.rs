//! Application state shared by every handler.

use std::sync::Arc;

use galerie_core::Config;
use galerie_db::GalleryStore;
use galerie_services::{GalleryService, Storage};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub galleries: GalleryService,
    /// Checked by the health endpoint
    pub store: Arc<dyn GalleryStore>,
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn GalleryStore>, storage: Arc<dyn Storage>) -> Self {
        let galleries = GalleryService::new(&config, store.clone(), storage.clone());
        Self {
            config,
            galleries,
            store,
            storage,
        }
    }
}
