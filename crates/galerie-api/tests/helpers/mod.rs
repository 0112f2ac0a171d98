//! Test helpers: build AppState and router for integration tests.
//!
//! The router runs over the in-memory document store and a temporary image folder,
//! so no database is needed. Run with `cargo test -p galerie-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use galerie_api::setup::routes;
use galerie_api::state::AppState;
use galerie_core::{Config, FilenameScope, GalleryConfig};
use galerie_db::InMemoryGalleryStore;
use galerie_services::LocalStorage;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: server, state, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub image_folder: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn file_exists(&self, filename: &str) -> bool {
        self.image_folder.join(filename).exists()
    }

    /// Wait for background file removals scheduled by earlier requests.
    pub async fn settle(&self) {
        self.state.galleries.wait_for_pending_removals().await;
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(FilenameScope::System, 10 * 1024 * 1024).await
}

/// Setup test app with an isolated store and local storage.
pub async fn setup_test_app_with(filename_scope: FilenameScope, max_file_size: usize) -> TestApp {
    let temp_dir = tempfile::tempdir().unwrap();
    let image_folder = temp_dir.path().join("images");
    let default_preview = temp_dir.path().join("default.jpg");
    std::fs::write(&default_preview, fixtures::jpeg(640, 480)).unwrap();

    let config = Config::from(GalleryConfig {
        image_folder: image_folder.clone(),
        default_preview_path: default_preview,
        filename_scope,
        max_file_size_bytes: max_file_size,
        ..GalleryConfig::default()
    });

    let store = Arc::new(InMemoryGalleryStore::new());
    let storage = Arc::new(LocalStorage::new(&image_folder).await.unwrap());
    let state = Arc::new(AppState::new(config.clone(), store, storage));

    let router = routes::setup_routes(&config, state.clone()).unwrap();
    let server = TestServer::new(router).unwrap();

    TestApp {
        server,
        state,
        image_folder,
        _temp_dir: temp_dir,
    }
}
