use serde::{Deserialize, Serialize};

/// Declared content category of an asset.
///
/// The store keeps this as a free-form string. Anything outside the known
/// categories is carried through as [`ContentType::Unsupported`] so the
/// executor can fail the job instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    Text,
    Markdown,
    Audio,
    Video,
    Unsupported(String),
}

impl ContentType {
    pub fn as_str(&self) -> &str {
        match self {
            ContentType::Text => "text",
            ContentType::Markdown => "markdown",
            ContentType::Audio => "audio",
            ContentType::Video => "video",
            ContentType::Unsupported(raw) => raw,
        }
    }
}

impl From<&str> for ContentType {
    fn from(value: &str) -> Self {
        match value {
            "text" => ContentType::Text,
            "markdown" => ContentType::Markdown,
            "audio" => ContentType::Audio,
            "video" => ContentType::Video,
            other => ContentType::Unsupported(other.to_string()),
        }
    }
}

impl From<String> for ContentType {
    fn from(value: String) -> Self {
        ContentType::from(value.as_str())
    }
}

impl From<ContentType> for String {
    fn from(value: ContentType) -> Self {
        match value {
            ContentType::Unsupported(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded file and its extracted text content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub file_url: String,
    pub file_name: String,
    pub file_type: ContentType,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// A size-bounded slice of audio, kept in memory for one job execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the chunk in the original stream.
    pub index: usize,
    /// File name sent to the transcription backend.
    pub name: String,
    pub data: Vec<u8>,
}
