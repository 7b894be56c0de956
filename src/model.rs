use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use tokio::fs;

use crate::section::MediaKind;

/// A stored content record as returned by the API. The shape varies by
/// section, so every field is optional and unknown keys are kept in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(rename = "_id", default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub testimonial: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "lenient_stars")]
    pub stars: Option<u8>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub video_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub video_public_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub icon_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub pdf_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub post_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Scalars of any kind are kept as text; objects, arrays and null are dropped.
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(scalar_text))
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

/// Stars arrive as a number or as the string the form sent.
fn lenient_stars<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let stars = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(stars.map(|v| v.clamp(0.0, 5.0) as u8))
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Item {
    /// Decode one API record. `_id` wins over a plain `id`; a bare `id` is
    /// used only when `_id` is absent or empty.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        let mut item: Item = serde_json::from_value(value.clone())?;
        let fallback = item.extra.remove("id").and_then(scalar_text);
        if item.id.is_empty() {
            item.id = fallback.unwrap_or_default();
        }
        Ok(item)
    }

    pub fn display_title(&self) -> &str {
        present(&self.title)
            .or_else(|| present(&self.name))
            .or_else(|| present(&self.address))
            .unwrap_or("Untitled")
    }

    pub fn display_body(&self) -> Option<&str> {
        present(&self.description)
            .or_else(|| present(&self.testimonial))
            .or_else(|| present(&self.content))
    }

    /// Body cut to `max` characters with a trailing ellipsis.
    pub fn preview(&self, max: usize) -> Option<String> {
        let body = self.display_body()?;
        if body.chars().count() > max {
            let cut: String = body.chars().take(max).collect();
            Some(format!("{cut}..."))
        } else {
            Some(body.to_string())
        }
    }

    pub fn media_url(&self) -> Option<&str> {
        present(&self.image_url)
            .or_else(|| present(&self.video_url))
            .or_else(|| present(&self.icon_url))
            .or_else(|| present(&self.pdf_url))
    }

    pub fn is_video(&self) -> bool {
        present(&self.video_url).is_some() || present(&self.video_public_id).is_some()
    }

    /// Publication date, falling back to the creation timestamp.
    pub fn date(&self) -> Option<&str> {
        present(&self.post_date).or_else(|| present(&self.created_at))
    }
}

/// A file picked for upload, read fully into memory.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("invalid file name: {}", path.display()))?;
        let bytes = fs::read(path)
            .await
            .with_context(|| format!("failed to read file: {}", path.display()))?;
        Ok(Self::new(name, content_type(path), bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn kind(&self) -> MediaKind {
        [MediaKind::Video, MediaKind::Image, MediaKind::Pdf]
            .into_iter()
            .find(|kind| kind.accepts(&self.mime))
            .unwrap_or(MediaKind::None)
    }
}

pub fn content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_ascii_lowercase())
    {
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "gif" => "image/gif",
        Some(ext) if ext == "webp" => "image/webp",
        Some(ext) if ext == "svg" => "image/svg+xml",
        Some(ext) if ext == "mp4" => "video/mp4",
        Some(ext) if ext == "mov" => "video/quicktime",
        Some(ext) if ext == "avi" => "video/x-msvideo",
        Some(ext) if ext == "webm" => "video/webm",
        Some(ext) if ext == "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Feedback shown after picking files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub count: usize,
    pub total_bytes: usize,
    pub kind: MediaKind,
}

impl FileSummary {
    pub fn of(files: &[SelectedFile]) -> Option<Self> {
        let first = files.first()?;
        Some(Self {
            count: files.len(),
            total_bytes: files.iter().map(SelectedFile::size).sum(),
            kind: first.kind(),
        })
    }
}

impl fmt::Display for FileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let megabytes = self.total_bytes as f64 / 1024.0 / 1024.0;
        write!(
            f,
            "Selected: {} {}(s) ({:.2} MB)",
            self.count,
            self.kind.noun(),
            megabytes
        )
    }
}
