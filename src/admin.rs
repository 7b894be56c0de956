//! The admin panel: one form, the current section's items, dashboard counts
//! and the inline status line, all driven against a [`ContentService`].
use std::fmt;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiError, ContentService};
use crate::form::{FormController, FormError, Mode, Target};
use crate::model::{Item, SelectedFile};
use crate::section::{unwrap_item, Field, Section};
use crate::stats::Stats;
use crate::store::ItemStore;

/// Blocking yes/no question put to the operator before destructive actions.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Inline status line. Replaced by the next action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Success(String),
    Error(String),
    Pending(String),
}

impl Status {
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Status::Success(text) | Status::Error(text) | Status::Pending(text) => text,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self {
            Status::Success(_) => "✅",
            Status::Error(_) => "❌",
            Status::Pending(_) => "⏳",
        };
        write!(f, "{} {}", marker, self.text())
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] FormError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub struct AdminPanel<S> {
    service: S,
    form: FormController,
    store: ItemStore,
    stats: Stats,
    status: Option<Status>,
}

impl<S: ContentService> AdminPanel<S> {
    pub fn new(service: S, section: Section) -> Self {
        Self {
            service,
            form: FormController::new(section),
            store: ItemStore::new(section),
            stats: Stats::default(),
            status: None,
        }
    }

    /// Build the panel and do the initial item and stats loads.
    pub async fn open(service: S, section: Section) -> Self {
        let mut panel = Self::new(service, section);
        panel.reload_items().await;
        panel.refresh_stats().await;
        panel
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn section(&self) -> Section {
        self.form.section()
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn items(&self) -> &[Item] {
        self.store.items()
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// Switch sections: clears the form and status, then refetches items.
    pub async fn select_section(&mut self, section: Section) -> Result<(), FormError> {
        self.form.select_section(section)?;
        self.status = None;
        self.reload_items().await;
        Ok(())
    }

    pub fn set_field(&mut self, field: Field, value: &str) {
        self.form.set_field(field, value);
    }

    pub fn select_files(&mut self, files: Vec<SelectedFile>) {
        self.status = self
            .form
            .select_files(files)
            .map(|summary| Status::Pending(summary.to_string()));
    }

    /// Start editing the listed item with identifier `id`.
    pub fn begin_edit(&mut self, id: &str) -> Result<(), FormError> {
        let item = self
            .store
            .find(id)
            .cloned()
            .ok_or_else(|| FormError::UnknownItem(id.to_string()))?;
        self.form.begin_edit(&item)?;
        self.status = None;
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.form.cancel_edit();
        self.status = None;
    }

    pub async fn reload_items(&mut self) {
        let section = self.form.section();
        self.store.load(&self.service, section).await;
    }

    pub async fn refresh_stats(&mut self) {
        self.stats.refresh(&self.service).await;
    }

    /// Validate, send, and on success reset the form and refresh the list
    /// and counts. On failure the form keeps its values for a retry.
    #[instrument(skip_all, fields(section = %self.form.section()))]
    pub async fn submit(&mut self) -> Result<Option<Item>, SubmitError> {
        let submission = match self.form.prepare() {
            Ok(submission) => submission,
            Err(err) => {
                self.status = Some(Status::Error(err.to_string()));
                return Err(err.into());
            }
        };
        let section = submission.section;
        let editing = matches!(self.form.mode(), Mode::Edit { .. });

        self.status = Some(Status::Pending("Uploading...".to_string()));
        let result = match &submission.target {
            Target::Create => self.service.create(section, submission.body).await,
            Target::Update(id) => self.service.update(section, id, submission.body).await,
        };

        let body = match result {
            Ok(body) => body,
            Err(err) => {
                warn!(%err, editing, "submission failed");
                let verb = if editing { "Update" } else { "Upload" };
                self.status = Some(Status::Error(format!(
                    "{} failed: {}",
                    verb,
                    err.user_message()
                )));
                return Err(err.into());
            }
        };

        let item = unwrap_item(&body);
        self.status = Some(Status::Success(success_message(section, editing)));
        info!(editing, returned_item = item.is_some(), "submission saved");
        self.form.reset();
        match (&submission.target, &item) {
            (Target::Create, Some(created)) => self.store.prepend(created.clone()),
            _ => self.reload_items().await,
        }
        self.refresh_stats().await;
        Ok(item)
    }

    /// Ask for confirmation, delete, and refresh the counts. Returns `false`
    /// when the operator declined.
    #[instrument(skip_all, fields(section = %self.form.section(), id = %id))]
    pub async fn remove(
        &mut self,
        id: &str,
        label: &str,
        confirm: &dyn Confirm,
    ) -> Result<bool, ApiError> {
        if !confirm.confirm(&format!("Are you sure you want to delete \"{}\"?", label)) {
            return Ok(false);
        }
        match self.store.remove(&self.service, id).await {
            Ok(()) => {
                self.status = Some(Status::Success(format!("\"{}\" deleted successfully!", label)));
                if self.form.mode() == (&Mode::Edit { id: id.to_string() }) {
                    self.form.reset();
                }
                self.refresh_stats().await;
                Ok(true)
            }
            Err(err) => {
                warn!(%err, "delete failed");
                self.status = Some(Status::Error(format!(
                    "Delete failed: {}",
                    err.user_message()
                )));
                Err(err)
            }
        }
    }
}

fn success_message(section: Section, editing: bool) -> String {
    match (section, editing) {
        (Section::Address, false) => "Address saved successfully!".to_string(),
        (Section::Address, true) => "Address updated successfully!".to_string(),
        (_, false) => format!("Upload successful! Item saved in \"{}\" section.", section),
        (_, true) => format!("Update successful! Item in \"{}\" section saved.", section),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_renders_marker() {
        assert_eq!(Status::Success("Saved".into()).to_string(), "✅ Saved");
        assert_eq!(Status::Error("Nope".into()).to_string(), "❌ Nope");
        assert!(!Status::Pending("Uploading...".into()).is_success());
    }

    #[test]
    fn closures_confirm() {
        let yes = |_: &str| true;
        let no = |prompt: &str| prompt.is_empty();
        assert!(yes.confirm("delete?"));
        assert!(!no.confirm("delete?"));
    }

    #[test]
    fn success_messages_name_the_section() {
        assert_eq!(
            success_message(Section::Pdf, false),
            "Upload successful! Item saved in \"pdf\" section."
        );
        assert_eq!(
            success_message(Section::Address, true),
            "Address updated successfully!"
        );
    }
}
