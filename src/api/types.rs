//! Request bodies for the status API that are not plain model types.

use serde::Serialize;

/// Body of `PATCH /asset?assetId=`.
#[derive(Debug, Clone, Serialize)]
pub struct AssetContentUpdate {
    pub content: String,
}
