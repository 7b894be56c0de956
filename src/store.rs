//! Per-section item list. The only cache there is; refetched on every
//! section switch and never persisted.
use tracing::{instrument, warn};

use crate::api::{ApiError, ContentService};
use crate::model::Item;
use crate::section::{unwrap_items, Section};

#[derive(Debug, Clone)]
pub struct ItemStore {
    section: Section,
    items: Vec<Item>,
}

impl ItemStore {
    pub fn new(section: Section) -> Self {
        Self {
            section,
            items: Vec::new(),
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn find(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Fetch the section's list. Never fails: a 404 means an empty section,
    /// anything else is logged and also shown as empty.
    #[instrument(skip_all, fields(section = %section))]
    pub async fn load<S: ContentService + ?Sized>(&mut self, service: &S, section: Section) {
        self.section = section;
        self.items = match service.list(section).await {
            Ok(body) => unwrap_items(&body),
            Err(err) if err.is_not_found() => Vec::new(),
            Err(err) => {
                warn!(%err, "failed to load items; showing an empty list");
                Vec::new()
            }
        };
    }

    /// Put a freshly created item at the front of the list.
    pub fn prepend(&mut self, item: Item) {
        self.items.insert(0, item);
    }

    /// Delete on the server, then drop the item locally. The list is left
    /// untouched when the call fails.
    #[instrument(skip_all, fields(section = %self.section, id = %id))]
    pub async fn remove<S: ContentService + ?Sized>(
        &mut self,
        service: &S,
        id: &str,
    ) -> Result<(), ApiError> {
        service.delete(self.section, id).await?;
        self.items.retain(|item| item.id != id);
        Ok(())
    }
}
