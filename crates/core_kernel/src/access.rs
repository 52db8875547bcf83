//! Caller roles and access policy
//!
//! Callers identify themselves with an API key. The policy resolves the key
//! to a [`Principal`] and checks that the principal's [`Role`] grants the
//! requested [`Permission`]:
//!
//! | Role     | View | Edit |
//! |----------|------|------|
//! | viewer   | yes  | no   |
//! | editor   | yes  | yes  |

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::CoreError;
use crate::identifiers::UserId;

/// Role assigned to a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Viewer,
    Editor,
}

impl Role {
    /// Returns true if this role grants the permission
    pub fn allows(&self, permission: Permission) -> bool {
        match (self, permission) {
            (_, Permission::View) => true,
            (Role::Editor, Permission::Edit) => true,
            (Role::Viewer, Permission::Edit) => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Editor => "editor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewer" => Ok(Role::Viewer),
            "editor" => Ok(Role::Editor),
            other => Err(CoreError::validation(format!("Unknown role: {other}"))),
        }
    }
}

/// Kind of access an operation requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Read-only operations (listing, lookups, neighborhoods)
    View,
    /// Mutating operations (create/update/delete, edges, scoring)
    Edit,
}

/// An authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub name: String,
    pub role: Role,
}

/// Access errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("Missing or invalid API key")]
    Unauthorized,

    #[error("Forbidden for role: {0}")]
    Forbidden(Role),
}

/// Resolves callers and checks their permissions
pub trait AccessPolicy: Send + Sync {
    /// Resolves an API key to a principal
    fn authenticate(&self, api_key: Option<&str>) -> Result<Principal, AccessError>;

    /// Resolves the caller and checks it holds `permission`
    fn authorize(
        &self,
        api_key: Option<&str>,
        permission: Permission,
    ) -> Result<Principal, AccessError> {
        let principal = self.authenticate(api_key)?;
        if !principal.role.allows(permission) {
            debug!(user = %principal.name, role = %principal.role, ?permission, "Access denied");
            return Err(AccessError::Forbidden(principal.role));
        }
        Ok(principal)
    }
}

/// Access policy backed by a static table of API keys
#[derive(Debug, Clone, Default)]
pub struct ApiKeyAccessPolicy {
    keys: HashMap<String, Principal>,
}

impl ApiKeyAccessPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user under an API key, replacing any previous holder
    pub fn with_user(mut self, name: impl Into<String>, api_key: impl Into<String>, role: Role) -> Self {
        self.keys.insert(
            api_key.into(),
            Principal {
                user_id: UserId::new_v7(),
                name: name.into(),
                role,
            },
        );
        self
    }

    /// The two demo users shipped with the catalog
    pub fn demo() -> Self {
        Self::new()
            .with_user("Editor", "editor-key-123", Role::Editor)
            .with_user("Viewer", "viewer-key-123", Role::Viewer)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl AccessPolicy for ApiKeyAccessPolicy {
    fn authenticate(&self, api_key: Option<&str>) -> Result<Principal, AccessError> {
        api_key
            .and_then(|key| self.keys.get(key))
            .cloned()
            .ok_or(AccessError::Unauthorized)
    }
}
