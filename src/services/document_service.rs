//! Document persistence: file bytes on disk, metadata rows in the store.

use crate::api::error::AppError;
use crate::entities::prelude::*;
use crate::entities::users::Role;
use crate::entities::{documents, users};
use crate::infrastructure::storage::StorageService;
use crate::services::access_control::{Identity, can_view_in_listing};
use crate::utils::validation::{has_allowed_extension, sanitize_filename};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use std::sync::Arc;
use tracing::warn;

/// A document row joined with its owner, ready for rendering.
#[derive(Debug, Clone)]
pub struct DocumentListing {
    pub id: i32,
    pub owner_id: i32,
    pub owner_username: String,
    pub owner_role: Role,
    pub filename: String,
    pub disk_name: String,
    pub uploaded_at: DateTime<Utc>,
}

impl DocumentListing {
    fn new(doc: documents::Model, owner: users::Model) -> Self {
        Self {
            id: doc.id,
            owner_id: owner.id,
            owner_username: owner.username,
            owner_role: owner.role,
            disk_name: doc.disk_name().to_string(),
            filename: doc.filename,
            uploaded_at: doc.uploaded_at,
        }
    }
}

pub struct DocumentService {
    db: DatabaseConnection,
    storage: Arc<StorageService>,
}

impl DocumentService {
    pub fn new(db: DatabaseConnection, storage: Arc<StorageService>) -> Self {
        Self { db, storage }
    }

    /// Persist an upload: sanitize the name, check the extension
    /// allow-set, write the bytes, then insert the metadata row. The
    /// bytes go to disk first so a row never exists without content; a
    /// dangling file from a failed insert is tolerated (deletion already
    /// shrugs at missing files).
    ///
    /// The disk name `{owner_id}_{timestamp}_{sanitized}` keeps names
    /// unique and guarantees the download path can always recover the
    /// owner from the prefix.
    pub async fn save(
        &self,
        owner_id: i32,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<documents::Model, AppError> {
        if !has_allowed_extension(original_name) {
            return Err(AppError::Validation("Invalid file type".to_string()));
        }

        let sanitized = sanitize_filename(original_name);
        if sanitized.is_empty() {
            return Err(AppError::Validation("Invalid file type".to_string()));
        }

        let timestamp = Utc::now().format("%Y%m%d%H%M%S");
        let disk_name = format!("{owner_id}_{timestamp}_{sanitized}");

        self.storage
            .save(&disk_name, bytes)
            .await
            .map_err(|e| AppError::Internal(format!("failed to store {disk_name}: {e}")))?;

        let doc = documents::ActiveModel {
            user_id: Set(owner_id),
            filename: Set(sanitized),
            filepath: Set(format!("uploads/{disk_name}")),
            uploaded_at: Set(Utc::now()),
            ..Default::default()
        };

        Ok(doc.insert(&self.db).await?)
    }

    /// Documents the identity may see, newest first: everything for
    /// admins; own plus admin-published for users.
    pub async fn list_visible(&self, identity: Identity) -> Result<Vec<DocumentListing>, AppError> {
        let rows = self.all_with_owners().await?;

        Ok(rows
            .into_iter()
            .filter(|listing| can_view_in_listing(identity, listing.owner_id, listing.owner_role))
            .collect())
    }

    /// Every document with its owner, newest first (admin panel).
    pub async fn list_all(&self) -> Result<Vec<DocumentListing>, AppError> {
        self.all_with_owners().await
    }

    async fn all_with_owners(&self) -> Result<Vec<DocumentListing>, AppError> {
        let rows = Documents::find()
            .find_also_related(Users)
            .order_by_desc(documents::Column::UploadedAt)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(doc, owner)| Some(DocumentListing::new(doc, owner?)))
            .collect())
    }

    /// Delete a document. The metadata row is authoritative: physical
    /// removal failures are logged and swallowed. Returns false when the
    /// id does not exist.
    pub async fn delete(&self, doc_id: i32) -> Result<bool, AppError> {
        let Some(doc) = Documents::find_by_id(doc_id).one(&self.db).await? else {
            return Ok(false);
        };

        if let Err(e) = self.storage.delete(doc.disk_name()).await {
            warn!("Could not remove file '{}': {}", doc.disk_name(), e);
        }

        Documents::delete_by_id(doc_id).exec(&self.db).await?;

        Ok(true)
    }
}
