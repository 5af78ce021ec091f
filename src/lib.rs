pub mod api;
pub mod catalog;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod migration;
pub mod storage;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use storage::coordinator::UploadCoordinator;
use storage::ObjectStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub coordinator: Arc<UploadCoordinator>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            coordinator: Arc::new(UploadCoordinator::new(db.clone(), store)),
            db,
        }
    }
}
