use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;

use crate::model::SelectedFile;

/// Body of a create/update request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Multipart(UploadForm),
}

/// Transport-neutral multipart payload, converted to a reqwest form at send
/// time so test doubles can inspect it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub file: Option<FilePart>,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub key: &'static str,
    pub file: SelectedFile,
}

impl UploadForm {
    pub fn push(&mut self, key: &str, value: &str) {
        self.fields.push((key.to_string(), value.to_string()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn into_multipart(self) -> reqwest::Result<Form> {
        let mut form = Form::new();
        if let Some(FilePart { key, file }) = self.file {
            let part = Part::bytes(file.bytes)
                .file_name(file.name)
                .mime_str(&file.mime)?;
            form = form.part(key, part);
        }
        for (key, value) in self.fields {
            form = form.text(key, value);
        }
        Ok(form)
    }
}

/// Error body the content API sends with non-2xx responses.
#[derive(Deserialize, Debug)]
pub struct ErrorBody {
    pub error: Option<String>,
}
