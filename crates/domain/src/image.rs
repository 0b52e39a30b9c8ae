//! Uploaded image assets

use serde::{Deserialize, Serialize};

use crate::id::TenantId;

/// An image a tenant uploaded; templates refer to it by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Image id.
    pub id: String,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Lookup name, matched exactly by `get_url` and `img_conv`.
    pub name: String,
    /// Public URL returned to templates.
    pub url: String,
    /// Storage path of the uploaded file.
    #[serde(default)]
    pub file_path: String,
}

impl ImageAsset {
    /// Returns true if this image is `name` owned by `tenant`.
    #[must_use]
    pub fn is_named(&self, tenant: &TenantId, name: &str) -> bool {
        &self.tenant_id == tenant && self.name == name
    }
}
