//! Public page reads for the marketing site. Unlike the admin item list,
//! these report failures to the caller.
use thiserror::Error;
use tracing::{instrument, warn};

use crate::api::{ApiError, ContentService};
use crate::model::Item;
use crate::section::{unwrap_item, unwrap_items, Section};

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Failed to load {what}: {source}")]
    Load {
        what: &'static str,
        #[source]
        source: ApiError,
    },
    #[error("{0} not found")]
    NotFound(&'static str),
}

/// What the resources page shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resources {
    pub pdfs: Vec<Item>,
    pub testimonials: Vec<Item>,
}

pub struct Site<'a, S: ?Sized> {
    service: &'a S,
}

impl<'a, S: ContentService + ?Sized> Site<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    async fn list(&self, section: Section, what: &'static str) -> Result<Vec<Item>, SiteError> {
        self.service
            .list(section)
            .await
            .map(|body| unwrap_items(&body))
            .map_err(|source| SiteError::Load { what, source })
    }

    pub async fn services(&self) -> Result<Vec<Item>, SiteError> {
        self.list(Section::Services, "services").await
    }

    /// A single service, looked up by id in the full list.
    pub async fn service(&self, id: &str) -> Result<Item, SiteError> {
        self.services()
            .await?
            .into_iter()
            .find(|item| item.id == id)
            .ok_or(SiteError::NotFound("Service"))
    }

    pub async fn home_services(&self) -> Result<Vec<Item>, SiteError> {
        self.list(Section::HomeServices, "home services").await
    }

    pub async fn testimonials(&self) -> Result<Vec<Item>, SiteError> {
        self.list(Section::Testimonials, "testimonials").await
    }

    /// First video of `section`. The pages render without it, so failures
    /// are only logged.
    #[instrument(skip(self))]
    pub async fn featured_video(&self, section: Section) -> Option<Item> {
        match self.service.list(section).await {
            Ok(body) => unwrap_items(&body).into_iter().next(),
            Err(err) => {
                warn!(%err, "failed to load featured video");
                None
            }
        }
    }

    pub async fn blog_posts(&self) -> Result<Vec<Item>, SiteError> {
        self.list(Section::Blog, "blog posts").await
    }

    pub async fn blog_post(&self, id: &str) -> Result<Item, SiteError> {
        let body = self
            .service
            .fetch(Section::Blog, id)
            .await
            .map_err(|source| SiteError::Load {
                what: "blog post",
                source,
            })?;
        unwrap_item(&body).ok_or(SiteError::NotFound("Blog post"))
    }

    /// PDFs and testimonials, fetched together; either failing fails the page.
    pub async fn resources(&self) -> Result<Resources, SiteError> {
        let (pdfs, testimonials) = tokio::try_join!(
            self.service.list(Section::Pdf),
            self.service.list(Section::Testimonials),
        )
        .map_err(|source| SiteError::Load {
            what: "resources",
            source,
        })?;
        Ok(Resources {
            pdfs: unwrap_items(&pdfs),
            testimonials: unwrap_items(&testimonials),
        })
    }
}
