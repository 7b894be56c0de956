//! Form controller for the admin panel.
//!
//! Holds every possible input flatly, resets on section change, validates the
//! active section's descriptor and assembles the request body. No I/O happens
//! here; [`crate::admin::AdminPanel`] sends what [`FormController::prepare`]
//! produces.
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use thiserror::Error;

use crate::api::model::{FilePart, RequestBody, UploadForm};
use crate::model::{FileSummary, Item, SelectedFile};
use crate::section::{Field, MediaKind, Presence, Section};

/// Client-side validation failures. Nothing is sent when one of these occurs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Please enter an address")]
    MissingAddress,
    #[error("{}", missing_file_message(.0))]
    MissingFile(MediaKind),
    #[error("Please select only {} files!", .0.noun())]
    WrongFileType(MediaKind),
    #[error("Please enter {}", .label.to_lowercase())]
    MissingField { field: Field, label: &'static str },
    #[error("Finish or cancel the current edit before switching sections")]
    SectionLocked,
    #[error("Item has no identifier and cannot be edited")]
    MissingItemId,
    #[error("No item with id '{0}' in the current section")]
    UnknownItem(String),
}

fn missing_file_message(kind: &MediaKind) -> &'static str {
    match kind {
        MediaKind::Pdf => "Please select a PDF file first!",
        MediaKind::Video => "Please select a video file first!",
        _ => "Please select a file first!",
    }
}

/// Create vs. edit. Edit carries the identifier of the item being modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Create,
    Edit { id: String },
}

impl Mode {
    pub fn is_edit(&self) -> bool {
        matches!(self, Mode::Edit { .. })
    }
}

/// Union of every input across all sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub title: String,
    pub description: String,
    pub name: String,
    pub link: String,
    pub stars: u8,
    pub testimonial: String,
    pub address: String,
    pub text: String,
    pub date: String,
}

impl FormState {
    pub fn value(&self, field: Field) -> String {
        match field {
            Field::Stars => self.stars.to_string(),
            other => self.text_slot(other).cloned().unwrap_or_default(),
        }
    }

    fn text_slot(&self, field: Field) -> Option<&String> {
        match field {
            Field::Title => Some(&self.title),
            Field::Description => Some(&self.description),
            Field::Name => Some(&self.name),
            Field::Link => Some(&self.link),
            Field::Testimonial => Some(&self.testimonial),
            Field::Address => Some(&self.address),
            Field::Text => Some(&self.text),
            Field::Date => Some(&self.date),
            Field::Stars => None,
        }
    }

    fn text_slot_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Title => Some(&mut self.title),
            Field::Description => Some(&mut self.description),
            Field::Name => Some(&mut self.name),
            Field::Link => Some(&mut self.link),
            Field::Testimonial => Some(&mut self.testimonial),
            Field::Address => Some(&mut self.address),
            Field::Text => Some(&mut self.text),
            Field::Date => Some(&mut self.date),
            Field::Stars => None,
        }
    }

    fn set(&mut self, field: Field, value: &str) {
        match self.text_slot_mut(field) {
            Some(slot) => *slot = value.to_string(),
            None => self.stars = clamp_stars(value),
        }
    }
}

/// Leading-integer parse clamped to 0..=5; anything unparsable becomes 0.
pub fn clamp_stars(raw: &str) -> u8 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let value = rest
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, b| acc.saturating_mul(10).saturating_add(u32::from(b - b'0')));
    if negative {
        return 0;
    }
    value.min(5) as u8
}

/// Plain calendar date (`YYYY-MM-DD`) from whatever the API stored.
pub fn normalize_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.with_timezone(&Utc).date_naive().format("%Y-%m-%d").to_string();
    }
    if let Some(prefix) = raw.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    raw.to_string()
}

/// Where a prepared request goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Create,
    Update(String),
}

/// A validated request, ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub section: Section,
    pub target: Target,
    pub body: RequestBody,
}

#[derive(Debug, Clone)]
pub struct FormController {
    section: Section,
    mode: Mode,
    state: FormState,
    files: Vec<SelectedFile>,
}

impl FormController {
    pub fn new(section: Section) -> Self {
        Self {
            section,
            mode: Mode::Create,
            state: FormState::default(),
            files: Vec::new(),
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    /// Switch to `section` and clear everything. Refused while editing an
    /// item of a different section.
    pub fn select_section(&mut self, section: Section) -> Result<(), FormError> {
        if self.mode.is_edit() && section != self.section {
            return Err(FormError::SectionLocked);
        }
        self.section = section;
        self.reset();
        Ok(())
    }

    pub fn set_field(&mut self, field: Field, value: &str) {
        self.state.set(field, value);
    }

    /// Store the picked files. Type checks happen on submit.
    pub fn select_files(&mut self, files: Vec<SelectedFile>) -> Option<FileSummary> {
        self.files = files;
        FileSummary::of(&self.files)
    }

    /// Enter edit mode for `item` and back-fill the fields this section uses.
    pub fn begin_edit(&mut self, item: &Item) -> Result<(), FormError> {
        if item.id.trim().is_empty() {
            return Err(FormError::MissingItemId);
        }
        self.reset();
        let descriptor = self.section.descriptor();
        for spec in descriptor.fields {
            let value = match spec.field {
                Field::Title => item.title.clone(),
                Field::Description => item.description.clone(),
                Field::Name => item.name.clone(),
                Field::Link => item.link.clone(),
                Field::Stars => item.stars.map(|s| s.to_string()),
                Field::Testimonial => item.testimonial.clone(),
                Field::Address => item.address.clone(),
                Field::Text => item.content.clone(),
                Field::Date => item.post_date.as_deref().map(normalize_date),
            };
            if let Some(value) = value {
                self.state.set(spec.field, &value);
            }
        }
        self.mode = Mode::Edit {
            id: item.id.clone(),
        };
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.reset();
    }

    pub(crate) fn reset(&mut self) {
        self.mode = Mode::Create;
        self.state = FormState::default();
        self.files.clear();
    }

    fn target(&self) -> Target {
        match &self.mode {
            Mode::Create => Target::Create,
            Mode::Edit { id } => Target::Update(id.clone()),
        }
    }

    /// Validate the active section and build its request body.
    pub fn prepare(&self) -> Result<Submission, FormError> {
        let section = self.section;
        if section == Section::Address {
            let address = self.state.address.trim();
            if address.is_empty() {
                return Err(FormError::MissingAddress);
            }
            return Ok(Submission {
                section,
                target: self.target(),
                body: RequestBody::Json(json!({ "address": address })),
            });
        }

        let descriptor = section.descriptor();
        let media_optional = if self.mode.is_edit() {
            descriptor.media_optional_on_edit
        } else {
            descriptor.media_optional_on_create
        };
        if self.files.is_empty() && !media_optional {
            return Err(FormError::MissingFile(descriptor.media));
        }
        if descriptor.checks_media_type()
            && !self.files.iter().all(|f| descriptor.media.accepts(&f.mime))
        {
            return Err(FormError::WrongFileType(descriptor.media));
        }

        for spec in descriptor.required() {
            if self.state.value(spec.field).trim().is_empty() {
                return Err(FormError::MissingField {
                    field: spec.field,
                    label: spec.label,
                });
            }
        }

        let file = match (descriptor.media_key, self.files.first()) {
            (Some(key), Some(file)) => Some(FilePart {
                key,
                file: file.clone(),
            }),
            _ => None,
        };
        let mut form = UploadForm {
            file,
            fields: Vec::new(),
        };
        for spec in descriptor.fields {
            let value = self.state.value(spec.field);
            let value = value.trim();
            match spec.presence {
                Presence::Required | Presence::Always => form.push(spec.key, value),
                Presence::Optional if !value.is_empty() => form.push(spec.key, value),
                Presence::Optional => {}
            }
        }

        Ok(Submission {
            section,
            target: self.target(),
            body: RequestBody::Multipart(form),
        })
    }
}
