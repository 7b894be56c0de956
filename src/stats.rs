//! Dashboard item counts across every section.
use std::collections::BTreeMap;
use tracing::{instrument, warn};

use crate::api::ContentService;
use crate::section::{count_items, Section};

/// Section → item count. A missing key means "not loaded", not zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    counts: BTreeMap<Section, usize>,
}

impl Stats {
    pub fn get(&self, section: Section) -> Option<usize> {
        self.counts.get(&section).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, usize)> + '_ {
        self.counts.iter().map(|(section, count)| (*section, *count))
    }

    /// Re-count every known section, one request at a time. Failures leave
    /// that section absent and do not stop the rest.
    #[instrument(skip_all)]
    pub async fn refresh<S: ContentService + ?Sized>(&mut self, service: &S) {
        let mut counts = BTreeMap::new();
        for section in Section::ALL {
            match service.list(section).await {
                Ok(body) => {
                    counts.insert(section, count_items(&body));
                }
                Err(err) if err.is_not_found() => {
                    counts.insert(section, 0);
                }
                Err(err) => warn!(section = %section, %err, "failed to count items"),
            }
        }
        self.counts = counts;
    }
}
