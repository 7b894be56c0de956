//! Content-management client for the nursing-services site: the admin
//! panel's section registry, form controller, item store and stats, plus
//! the public page reads, all over the remote content API.

pub mod admin;
pub mod api;
pub mod config;
pub mod form;
pub mod model;
pub mod render;
pub mod section;
pub mod site;
pub mod stats;
pub mod store;

pub use admin::{AdminPanel, Confirm, Status, SubmitError};
pub use api::{ApiError, ContentClient, ContentService};
pub use section::{Field, MediaKind, Section};
