//! Asset and tag application services

use std::sync::Arc;

use tracing::{info, instrument};
use validator::Validate;

use core_kernel::AssetId;

use crate::asset::{Asset, AssetQuery, CreateAssetRequest, Tag, UpdateAssetRequest};
use crate::error::CatalogError;
use crate::ports::CatalogPort;

/// Asset and tag management on top of a [`CatalogPort`]
#[derive(Clone)]
pub struct AssetService {
    port: Arc<dyn CatalogPort>,
}

impl AssetService {
    pub fn new(port: Arc<dyn CatalogPort>) -> Self {
        Self { port }
    }

    /// Creates an asset; named tags are created if unknown
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_asset(&self, request: CreateAssetRequest) -> Result<Asset, CatalogError> {
        request.validate()?;
        validate_tag_names(&request.tags)?;

        let asset = self.port.create_asset(request).await?;
        info!(asset_id = %asset.id, asset_type = %asset.asset_type, "Asset created");
        Ok(asset)
    }

    pub async fn get_asset(&self, id: AssetId) -> Result<Asset, CatalogError> {
        Ok(self.port.get_asset(id).await?)
    }

    pub async fn list_assets(&self, query: AssetQuery) -> Result<Vec<Asset>, CatalogError> {
        Ok(self.port.find_assets(query).await?)
    }

    /// Applies a partial update; tags are replaced only when supplied
    #[instrument(skip(self, request))]
    pub async fn update_asset(
        &self,
        id: AssetId,
        request: UpdateAssetRequest,
    ) -> Result<Asset, CatalogError> {
        request.validate()?;
        if let Some(ref tags) = request.tags {
            validate_tag_names(tags)?;
        }

        let asset = self.port.update_asset(id, request).await?;
        info!(asset_id = %asset.id, "Asset updated");
        Ok(asset)
    }

    /// Deletes an asset and every lineage edge that references it
    #[instrument(skip(self))]
    pub async fn delete_asset(&self, id: AssetId) -> Result<(), CatalogError> {
        self.port.delete_asset(id).await?;
        info!(asset_id = %id, "Asset deleted");
        Ok(())
    }

    /// Creates a tag
    ///
    /// # Errors
    ///
    /// * `CatalogError::Validation` on an empty name
    /// * `CatalogError::TagExists` if the name is already taken
    #[instrument(skip(self))]
    pub async fn create_tag(&self, name: &str) -> Result<Tag, CatalogError> {
        if name.trim().is_empty() {
            return Err(CatalogError::validation("Missing name"));
        }

        match self.port.create_tag(name).await {
            Ok(tag) => {
                info!(tag = %tag.name, "Tag created");
                Ok(tag)
            }
            Err(e) if e.is_conflict() => Err(CatalogError::TagExists(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>, CatalogError> {
        Ok(self.port.list_tags().await?)
    }
}

fn validate_tag_names(tags: &[String]) -> Result<(), CatalogError> {
    if tags.iter().any(|t| t.trim().is_empty()) {
        return Err(CatalogError::validation("Tag names must not be empty"));
    }
    Ok(())
}
