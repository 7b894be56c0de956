//! Section registry: the nine content types managed by the admin panel and
//! the static descriptor table that drives the form for each of them.
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

use crate::model::Item;

/// One content-type category on the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Testimonials,
    HomeVideo,
    HomeServices,
    Services,
    AboutVideo,
    Address,
    Social,
    Blog,
    Pdf,
}

impl Section {
    /// Every known section, in dashboard order.
    pub const ALL: [Section; 9] = [
        Section::Testimonials,
        Section::HomeVideo,
        Section::HomeServices,
        Section::Services,
        Section::AboutVideo,
        Section::Address,
        Section::Social,
        Section::Blog,
        Section::Pdf,
    ];

    /// Path segment used by the content API.
    pub fn key(&self) -> &'static str {
        match self {
            Section::Testimonials => "testimonials",
            Section::HomeVideo => "home-video",
            Section::HomeServices => "home-services",
            Section::Services => "services",
            Section::AboutVideo => "about-video",
            Section::Address => "address",
            Section::Social => "social",
            Section::Blog => "blog",
            Section::Pdf => "pdf",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Testimonials => "Testimonials",
            Section::HomeVideo => "Home Page Video",
            Section::HomeServices => "Home Page Services",
            Section::Services => "Services Page",
            Section::AboutVideo => "About Us Video",
            Section::Address => "Company Address",
            Section::Social => "Social Media Links",
            Section::Blog => "Blog Posts",
            Section::Pdf => "PDF Resources",
        }
    }

    pub fn descriptor(&self) -> &'static Descriptor {
        match self {
            Section::Testimonials => &TESTIMONIALS,
            Section::HomeVideo | Section::AboutVideo => &VIDEO,
            Section::HomeServices => &HOME_SERVICES,
            Section::Services => &SERVICES,
            Section::Address => &ADDRESS,
            Section::Social => &SOCIAL,
            Section::Blog => &BLOG,
            Section::Pdf => &PDF,
        }
    }

    /// Path segments for creating an item. The address endpoint takes a JSON
    /// body on the collection itself; everything else goes to `upload`.
    pub fn create_path(&self) -> Vec<&'static str> {
        match self {
            Section::Address => vec![self.key()],
            _ => vec![self.key(), "upload"],
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown section '{0}'")]
pub struct UnknownSection(pub String);

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .iter()
            .copied()
            .find(|section| section.key() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

/// Accepted upload category for a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    None,
    Image,
    Video,
    Pdf,
}

impl MediaKind {
    /// Whether a MIME type belongs to this category.
    pub fn accepts(&self, mime: &str) -> bool {
        match self {
            MediaKind::None => false,
            MediaKind::Image => mime.starts_with("image/"),
            MediaKind::Video => mime.starts_with("video/"),
            MediaKind::Pdf => mime == "application/pdf",
        }
    }

    pub fn noun(&self) -> &'static str {
        match self {
            MediaKind::None => "file",
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Pdf => "PDF",
        }
    }
}

/// Logical form field. Every section uses a subset of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
    Name,
    Link,
    Stars,
    Testimonial,
    Address,
    Text,
    Date,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Title,
        Field::Description,
        Field::Name,
        Field::Link,
        Field::Stars,
        Field::Testimonial,
        Field::Address,
        Field::Text,
        Field::Date,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Name => "name",
            Field::Link => "link",
            Field::Stars => "stars",
            Field::Testimonial => "testimonial",
            Field::Address => "address",
            Field::Text => "text",
            Field::Date => "date",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "content" => return Ok(Field::Text),
            "postDate" => return Ok(Field::Date),
            _ => {}
        }
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// How a field takes part in validation and in the multipart payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be non-empty after trimming; always sent.
    Required,
    /// Never validated; always sent, even when empty.
    Always,
    /// Sent only when non-empty.
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: Field,
    /// Multipart key on the wire.
    pub key: &'static str,
    pub label: &'static str,
    pub presence: Presence,
}

const fn spec(field: Field, key: &'static str, label: &'static str, presence: Presence) -> FieldSpec {
    FieldSpec {
        field,
        key,
        label,
        presence,
    }
}

/// Static per-section configuration record.
#[derive(Debug, PartialEq, Eq)]
pub struct Descriptor {
    /// Inputs shown for the section, in validation order.
    pub fields: &'static [FieldSpec],
    pub media: MediaKind,
    /// Multipart key the selected file is attached under.
    pub media_key: Option<&'static str>,
    pub media_optional_on_create: bool,
    pub media_optional_on_edit: bool,
}

impl Descriptor {
    pub fn field(&self, field: Field) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.field == field)
    }

    pub fn label(&self, field: Field) -> Option<&'static str> {
        self.field(field).map(|spec| spec.label)
    }

    pub fn uses(&self, field: Field) -> bool {
        self.field(field).is_some()
    }

    pub fn required(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields
            .iter()
            .filter(|spec| spec.presence == Presence::Required)
    }

    /// Sections whose media is mandatory also type-check any selected file;
    /// optional-media sections accept whatever was picked.
    pub fn checks_media_type(&self) -> bool {
        self.media != MediaKind::None && !self.media_optional_on_create
    }
}

static TESTIMONIALS: Descriptor = Descriptor {
    fields: &[
        spec(Field::Name, "name", "Customer Name", Presence::Required),
        spec(Field::Testimonial, "testimonial", "Testimonial Text", Presence::Required),
        spec(Field::Stars, "stars", "Star Rating (0-5)", Presence::Always),
    ],
    media: MediaKind::Image,
    media_key: Some("image"),
    media_optional_on_create: true,
    media_optional_on_edit: true,
};

static VIDEO: Descriptor = Descriptor {
    fields: &[
        spec(Field::Title, "title", "Video Title", Presence::Required),
        spec(Field::Description, "description", "Video Description (Optional)", Presence::Optional),
    ],
    media: MediaKind::Video,
    media_key: Some("video"),
    media_optional_on_create: false,
    media_optional_on_edit: true,
};

static HOME_SERVICES: Descriptor = Descriptor {
    fields: &[
        spec(Field::Title, "title", "Service Title", Presence::Required),
        spec(Field::Description, "description", "Service Description", Presence::Required),
    ],
    media: MediaKind::Image,
    media_key: Some("icon"),
    media_optional_on_create: true,
    media_optional_on_edit: true,
};

static SERVICES: Descriptor = Descriptor {
    fields: &[
        spec(Field::Title, "title", "Service Title", Presence::Required),
        spec(Field::Description, "description", "Service Description (Can be long)", Presence::Required),
    ],
    media: MediaKind::Image,
    media_key: Some("image"),
    media_optional_on_create: false,
    media_optional_on_edit: true,
};

static ADDRESS: Descriptor = Descriptor {
    fields: &[spec(Field::Address, "address", "Company Address", Presence::Required)],
    media: MediaKind::None,
    media_key: None,
    media_optional_on_create: true,
    media_optional_on_edit: true,
};

static SOCIAL: Descriptor = Descriptor {
    fields: &[
        spec(Field::Name, "name", "Social Media Name", Presence::Required),
        spec(Field::Link, "link", "URL Link", Presence::Required),
    ],
    media: MediaKind::Image,
    media_key: Some("icon"),
    media_optional_on_create: false,
    media_optional_on_edit: true,
};

static BLOG: Descriptor = Descriptor {
    fields: &[
        spec(Field::Title, "title", "Blog Title", Presence::Required),
        spec(Field::Text, "content", "Blog Content", Presence::Required),
        spec(Field::Date, "postDate", "Post Date (Optional)", Presence::Optional),
    ],
    media: MediaKind::Image,
    media_key: Some("image"),
    media_optional_on_create: true,
    media_optional_on_edit: true,
};

static PDF: Descriptor = Descriptor {
    fields: &[
        spec(Field::Title, "title", "PDF Title", Presence::Required),
        spec(Field::Description, "description", "PDF Description", Presence::Required),
    ],
    media: MediaKind::Pdf,
    media_key: Some("pdf"),
    media_optional_on_create: false,
    media_optional_on_edit: true,
};

static FALLBACK: Descriptor = Descriptor {
    fields: &[spec(Field::Title, "title", "Title", Presence::Optional)],
    media: MediaKind::None,
    media_key: None,
    media_optional_on_create: true,
    media_optional_on_edit: true,
};

/// Look up a descriptor by raw key. Unknown keys get a minimal "Title" form.
pub fn descriptor_for_key(key: &str) -> &'static Descriptor {
    match key.parse::<Section>() {
        Ok(section) => section.descriptor(),
        Err(_) => &FALLBACK,
    }
}

/// Keys the list endpoints wrap their arrays under, in priority order.
pub const LIST_KEYS: [&str; 7] = [
    "testimonials",
    "videos",
    "services",
    "socialLinks",
    "addresses",
    "blogPosts",
    "pdfs",
];

/// Keys a create/update/single-read response wraps its item under.
pub const ITEM_KEYS: [&str; 8] = [
    "testimonial",
    "video",
    "service",
    "socialLink",
    "address",
    "blogPost",
    "blog",
    "pdf",
];

/// First wrapped array in a list response, with the key it was found under.
pub fn find_list(body: &Value) -> Option<(&'static str, &Vec<Value>)> {
    LIST_KEYS
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_array).map(|items| (*key, items)))
}

/// Number of items a list response decodes to, so counts match what the
/// list shows. `0` when no known key is present.
pub fn count_items(body: &Value) -> usize {
    unwrap_items(body).len()
}

/// Unwrap a list response into items. Entries that do not decode are
/// skipped with a warning.
pub fn unwrap_items(body: &Value) -> Vec<Item> {
    let Some((key, raw)) = find_list(body) else {
        return Vec::new();
    };
    raw.iter()
        .filter_map(|value| match Item::from_value(value) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!(key, %err, "skipping malformed item");
                None
            }
        })
        .collect()
}

/// Unwrap a single-item response (create, update, single read).
pub fn unwrap_item(body: &Value) -> Option<Item> {
    ITEM_KEYS
        .iter()
        .filter_map(|key| body.get(*key).filter(|value| value.is_object()))
        .find_map(|value| Item::from_value(value).ok())
}
