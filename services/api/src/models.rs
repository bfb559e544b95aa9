//! Request and Response Models
//!
//! Payloads accepted by the HTTP surface, documented with `utoipa`. The
//! generated resource itself is defined in `learnpath_core::resource`.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateRequestPayload {
    /// The subject to build a learning resource for. `title` is accepted as an alias.
    #[serde(default, alias = "title")]
    #[schema(example = "Binary Search Trees")]
    pub topic: Option<String>,
    /// Difficulty levels, joined into the prompt. Defaults to `medium`.
    #[serde(default)]
    #[schema(example = json!(["easy", "medium"]))]
    pub difficulty: Vec<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SuggestParams {
    /// The partial query typed so far.
    pub q: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}
