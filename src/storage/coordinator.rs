use std::sync::{Arc, Mutex, PoisonError};

use futures::future::try_join_all;
use sea_orm::DatabaseConnection;

use super::{object_key, ObjectStore, StorageError};
use crate::catalog;
use crate::db::entities::pokemon;
use crate::error::{Result, ValidationError};
use crate::forms::requests::{CreateRequest, UpdateRequest};
use crate::forms::UploadedFile;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Orchestrates the write paths: files go to object storage first, then the assembled
/// record is written once every upload has succeeded.
pub struct UploadCoordinator {
    db: DatabaseConnection,
    store: Arc<dyn ObjectStore>,
}

impl UploadCoordinator {
    pub fn new(db: DatabaseConnection, store: Arc<dyn ObjectStore>) -> Self {
        Self { db, store }
    }

    /// Upload both file groups concurrently, then insert the new record.
    pub async fn create(&self, request: CreateRequest) -> Result<pokemon::Model> {
        let CreateRequest {
            pokemon,
            photos,
            evolution_photos,
        } = request;

        let (photo_urls, evolution_urls) = self.upload_groups(&photos, &evolution_photos).await?;

        let photo = photo_urls
            .first()
            .cloned()
            .ok_or_else(|| ValidationError::MissingFields(vec!["photo"]))?;

        let created = catalog::insert(&self.db, pokemon, photo, evolution_urls.clone())
            .await
            .inspect_err(|_| {
                let stored = [photo_urls.as_slice(), &evolution_urls].concat();
                log_orphans(&stored, "Database write failed");
            })?;

        tracing::info!(id = created.id, name = %created.name, "Pokémon created");
        Ok(created)
    }

    /// Apply a sparse update. Replacement images are uploaded only once the record is
    /// known to exist.
    pub async fn update(&self, id: i32, request: UpdateRequest) -> Result<pokemon::Model> {
        let UpdateRequest {
            mut patch,
            photos,
            evolution_photos,
        } = request;

        let existing = catalog::find(&self.db, id).await?;

        let (photo_urls, evolution_urls) = self.upload_groups(&photos, &evolution_photos).await?;

        if let Some(first) = photo_urls.first() {
            patch.photo = Some(first.clone());
        }
        if !evolution_urls.is_empty() {
            patch.evolution_photo = Some(evolution_urls.clone());
        }

        let updated = catalog::apply_patch(&self.db, existing, patch)
            .await
            .inspect_err(|_| {
                let stored = [photo_urls.as_slice(), &evolution_urls].concat();
                log_orphans(&stored, "Database write failed");
            })?;

        tracing::info!(id = updated.id, "Pokémon updated");
        Ok(updated)
    }

    /// Uploads both groups concurrently. When any upload fails, the objects already
    /// stored by either group are logged as orphans.
    async fn upload_groups(
        &self,
        photos: &[UploadedFile],
        evolution_photos: &[UploadedFile],
    ) -> std::result::Result<(Vec<String>, Vec<String>), StorageError> {
        let uploaded = Mutex::new(Vec::new());
        let result = futures::try_join!(
            self.upload_all(photos, &uploaded),
            self.upload_all(evolution_photos, &uploaded)
        );
        if result.is_err() {
            let stored = uploaded.into_inner().unwrap_or_else(PoisonError::into_inner);
            log_orphans(&stored, "Image upload failed");
        }
        result
    }

    /// Uploads every file concurrently. URLs come back in input order; the first
    /// failure cancels the remaining uploads. Each stored object is also recorded in
    /// `uploaded`.
    async fn upload_all(
        &self,
        files: &[UploadedFile],
        uploaded: &Mutex<Vec<String>>,
    ) -> std::result::Result<Vec<String>, StorageError> {
        try_join_all(files.iter().map(|file| {
            let key = object_key(file);
            let content_type = file
                .content_type
                .clone()
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
            let data = file.data.clone();
            async move {
                let url = self.store.upload(&key, data, &content_type).await?;
                tracing::debug!(key = %key, url = %url, "Uploaded image");
                uploaded
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(url.clone());
                Ok::<_, StorageError>(url)
            }
        }))
        .await
    }
}

// TODO: objects stored before a failed upload or database write stay in the bucket; add
// a reconciliation sweep that deletes objects no record references.
fn log_orphans(urls: &[String], cause: &str) {
    for url in urls {
        tracing::warn!(url = %url, "{}, uploaded object orphaned", cause);
    }
}
