//! Cataloged assets and tags

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{AssetId, CoreError, TagId};

/// Kind of data asset
///
/// Serialized as its snake_case name. Names outside the known set are kept
/// verbatim in [`AssetType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AssetType {
    /// Policy master data
    Policy,
    /// Claim intake or claim history data
    Claim,
    /// Reserving model outputs
    ReserveModel,
    Other(String),
}

impl AssetType {
    pub fn as_str(&self) -> &str {
        match self {
            AssetType::Policy => "policy",
            AssetType::Claim => "claim",
            AssetType::ReserveModel => "reserve_model",
            AssetType::Other(name) => name,
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(CoreError::validation("Asset type must not be empty")),
            "policy" => Ok(AssetType::Policy),
            "claim" => Ok(AssetType::Claim),
            "reserve_model" => Ok(AssetType::ReserveModel),
            other => Ok(AssetType::Other(other.to_string())),
        }
    }
}

impl TryFrom<String> for AssetType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AssetType> for String {
    fn from(value: AssetType) -> Self {
        value.as_str().to_string()
    }
}

/// A cataloged data asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    /// Tag names, unique and case-sensitive
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Asset {
    /// Creates a new asset with no tags
    pub fn new(name: impl Into<String>, asset_type: AssetType) -> Self {
        Self {
            id: AssetId::new_v7(),
            name: name.into(),
            asset_type,
            description: String::new(),
            created_at: Utc::now(),
            tags: BTreeSet::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.contains(name)
    }

    /// Applies a partial update; tags are replaced only when supplied
    pub fn apply(&mut self, changes: UpdateAssetRequest) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(asset_type) = changes.asset_type {
            self.asset_type = asset_type;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(tags) = changes.tags {
            self.tags = tags.into_iter().collect();
        }
    }
}

/// A tag that can be attached to any number of assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TagId::new_v7(),
            name: name.into(),
        }
    }
}

/// Request for creating an asset
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAssetRequest {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    #[serde(default)]
    pub description: String,
    /// Tag names; unknown tags are created, existing ones reused
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateAssetRequest {
    pub fn new(name: impl Into<String>, asset_type: AssetType) -> Self {
        Self {
            name: name.into(),
            asset_type,
            description: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn tag(mut self, name: impl Into<String>) -> Self {
        self.tags.push(name.into());
        self
    }
}

/// Partial update of an asset
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAssetRequest {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub asset_type: Option<AssetType>,
    pub description: Option<String>,
    /// Replaces the whole tag set when present
    pub tags: Option<Vec<String>>,
}

/// Filter for listing assets
#[derive(Debug, Clone, Default)]
pub struct AssetQuery {
    pub asset_type: Option<AssetType>,
    /// Exact, case-sensitive tag name
    pub tag: Option<String>,
}

impl AssetQuery {
    pub fn by_type(asset_type: AssetType) -> Self {
        Self {
            asset_type: Some(asset_type),
            ..Default::default()
        }
    }

    pub fn by_tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Default::default()
        }
    }

    /// Returns true if the asset passes every filter that is set
    pub fn matches(&self, asset: &Asset) -> bool {
        if let Some(ref asset_type) = self.asset_type {
            if &asset.asset_type != asset_type {
                return false;
            }
        }
        if let Some(ref tag) = self.tag {
            if !asset.has_tag(tag) {
                return false;
            }
        }
        true
    }
}
