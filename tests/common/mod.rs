#![allow(dead_code)]

use async_trait::async_trait;
use nurse_admin::api::model::RequestBody;
use nurse_admin::{ApiError, ContentService, Section};
use reqwest::StatusCode;
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(Section),
    Fetch(Section, String),
    Create(Section, RequestBody),
    Update(Section, String, RequestBody),
    Delete(Section, String),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(self, Call::Create(..) | Call::Update(..) | Call::Delete(..))
    }
}

/// In-memory stand-in for the content API. Lists wrap their arrays under the
/// same alias keys as the real server, newest first.
#[derive(Clone, Default)]
pub struct FakeApi {
    items: Arc<Mutex<HashMap<Section, Vec<Value>>>>,
    missing: Arc<Mutex<HashSet<Section>>>,
    broken: Arc<Mutex<HashSet<Section>>>,
    failures: Arc<Mutex<VecDeque<ApiError>>>,
    calls: Arc<Mutex<Vec<Call>>>,
    next_id: Arc<Mutex<u32>>,
}

pub fn list_key(section: Section) -> &'static str {
    match section {
        Section::Testimonials => "testimonials",
        Section::HomeVideo | Section::AboutVideo => "videos",
        Section::HomeServices | Section::Services => "services",
        Section::Social => "socialLinks",
        Section::Address => "addresses",
        Section::Blog => "blogPosts",
        Section::Pdf => "pdfs",
    }
}

pub fn item_key(section: Section) -> &'static str {
    match section {
        Section::Testimonials => "testimonial",
        Section::HomeVideo | Section::AboutVideo => "video",
        Section::HomeServices | Section::Services => "service",
        Section::Social => "socialLink",
        Section::Address => "address",
        Section::Blog => "blogPost",
        Section::Pdf => "pdf",
    }
}

pub fn server_error(status: StatusCode, message: Option<&str>) -> ApiError {
    ApiError::Server {
        status,
        message: message.map(str::to_string),
    }
}

impl FakeApi {
    pub async fn seed(&self, section: Section, items: Vec<Value>) {
        self.items.lock().await.insert(section, items);
    }

    /// Section answers 404 until something is created in it.
    pub async fn mark_missing(&self, section: Section) {
        self.missing.lock().await.insert(section);
    }

    /// Section list answers 500.
    pub async fn mark_broken(&self, section: Section) {
        self.broken.lock().await.insert(section);
    }

    /// The next call of any kind fails with `err`.
    pub async fn fail_next(&self, err: ApiError) {
        self.failures.lock().await.push_back(err);
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub async fn mutations(&self) -> Vec<Call> {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| c.is_mutation())
            .cloned()
            .collect()
    }

    pub async fn stored(&self, section: Section) -> Vec<Value> {
        self.items
            .lock()
            .await
            .get(&section)
            .cloned()
            .unwrap_or_default()
    }

    async fn record(&self, call: Call) -> Result<(), ApiError> {
        self.calls.lock().await.push(call);
        match self.failures.lock().await.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn fresh_id(&self) -> String {
        let mut guard = self.next_id.lock().await;
        *guard += 1;
        format!("id-{}", *guard)
    }

    fn apply(object: &mut Map<String, Value>, body: &RequestBody) {
        match body {
            RequestBody::Json(value) => {
                if let Some(map) = value.as_object() {
                    for (k, v) in map {
                        object.insert(k.clone(), v.clone());
                    }
                }
            }
            RequestBody::Multipart(form) => {
                for (k, v) in &form.fields {
                    let value = if k == "stars" {
                        json!(v.parse::<u8>().unwrap_or(0))
                    } else {
                        json!(v)
                    };
                    object.insert(k.clone(), value);
                }
                if let Some(part) = &form.file {
                    let url_key = match part.key {
                        "image" => "imageUrl",
                        "video" => "videoUrl",
                        "icon" => "iconUrl",
                        _ => "pdfUrl",
                    };
                    object.insert(
                        url_key.to_string(),
                        json!(format!("https://cdn.test/{}", part.file.name)),
                    );
                }
            }
        }
    }
}

#[async_trait]
impl ContentService for FakeApi {
    async fn list(&self, section: Section) -> Result<Value, ApiError> {
        self.record(Call::List(section)).await?;
        if self.broken.lock().await.contains(&section) {
            return Err(server_error(StatusCode::INTERNAL_SERVER_ERROR, None));
        }
        if self.missing.lock().await.contains(&section) {
            return Err(server_error(StatusCode::NOT_FOUND, Some("Not found")));
        }
        let items = self.stored(section).await;
        Ok(json!({ list_key(section): items }))
    }

    async fn fetch(&self, section: Section, id: &str) -> Result<Value, ApiError> {
        self.record(Call::Fetch(section, id.to_string())).await?;
        let found = self
            .stored(section)
            .await
            .into_iter()
            .find(|v| v["_id"] == id);
        match found {
            Some(item) => Ok(json!({ item_key(section): item })),
            None => Err(server_error(StatusCode::NOT_FOUND, Some("Not found"))),
        }
    }

    async fn create(&self, section: Section, body: RequestBody) -> Result<Value, ApiError> {
        self.record(Call::Create(section, body.clone())).await?;
        let mut object = Map::new();
        object.insert("_id".into(), json!(self.fresh_id().await));
        Self::apply(&mut object, &body);
        let item = Value::Object(object);
        self.missing.lock().await.remove(&section);
        self.items
            .lock()
            .await
            .entry(section)
            .or_default()
            .insert(0, item.clone());
        if section == Section::Address {
            return Ok(json!({ "message": "Address saved" }));
        }
        Ok(json!({ "message": "ok", item_key(section): item }))
    }

    async fn update(
        &self,
        section: Section,
        id: &str,
        body: RequestBody,
    ) -> Result<Value, ApiError> {
        self.record(Call::Update(section, id.to_string(), body.clone()))
            .await?;
        let mut guard = self.items.lock().await;
        let items = guard.entry(section).or_default();
        let Some(existing) = items.iter_mut().find(|v| v["_id"] == id) else {
            return Err(server_error(StatusCode::NOT_FOUND, Some("Item not found")));
        };
        if let Some(object) = existing.as_object_mut() {
            Self::apply(object, &body);
        }
        Ok(json!({ item_key(section): existing.clone() }))
    }

    async fn delete(&self, section: Section, id: &str) -> Result<Value, ApiError> {
        self.record(Call::Delete(section, id.to_string())).await?;
        let mut guard = self.items.lock().await;
        let items = guard.entry(section).or_default();
        let before = items.len();
        items.retain(|v| v["_id"] != id);
        if items.len() == before {
            return Err(server_error(StatusCode::NOT_FOUND, Some("Item not found")));
        }
        Ok(json!({}))
    }
}
