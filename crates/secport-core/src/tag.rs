//! # Principal Tags
//!
//! A tag names a principal in the model: an application, a unit, a machine,
//! a model, a controller, or a user. Its string form is `<kind>-<id>`, and
//! that string form is what secrets store for owners, ACL subjects and
//! consumers.
//!
//! ```text
//! application-mysql          application "mysql"
//! unit-mysql-0               unit "mysql/0"
//! machine-0-lxd-1            machine "0/lxd/1"
//! model-<uuid>               model by UUID
//! controller-<uuid>          controller by UUID
//! user-admin, user-bob@ext   local or external user
//! ```
//!
//! Parsing is total over the input: every string either yields a `Tag`
//! whose `Display` reproduces it exactly, or a [`FormatError`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FormatError;

/// The kind of principal a tag refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    /// A deployed application.
    Application,
    /// A single unit of an application.
    Unit,
    /// A machine or container.
    Machine,
    /// A model, identified by UUID.
    Model,
    /// A controller, identified by UUID.
    Controller,
    /// A local or external user.
    User,
}

impl TagKind {
    /// The prefix used in the tag string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Unit => "unit",
            Self::Machine => "machine",
            Self::Model => "model",
            Self::Controller => "controller",
            Self::User => "user",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "application" => Some(Self::Application),
            "unit" => Some(Self::Unit),
            "machine" => Some(Self::Machine),
            "model" => Some(Self::Model),
            "controller" => Some(Self::Controller),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated principal tag.
///
/// `id()` is the principal's logical id (`mysql/0` for a unit); `Display`
/// renders the tag string form (`unit-mysql-0`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    kind: TagKind,
    id: String,
}

impl Tag {
    /// Parse a tag from its string form.
    ///
    /// # Errors
    ///
    /// [`FormatError::InvalidTag`] when the kind prefix is missing or unknown,
    /// [`FormatError::InvalidTagId`] when the id part is malformed for its kind.
    pub fn parse(s: &str) -> Result<Self, FormatError> {
        let (prefix, rest) = s.split_once('-').ok_or_else(|| FormatError::InvalidTag {
            value: s.to_string(),
        })?;
        let kind = TagKind::from_prefix(prefix).ok_or_else(|| FormatError::InvalidTag {
            value: s.to_string(),
        })?;
        let invalid = || FormatError::InvalidTagId {
            kind: kind.as_str(),
            value: s.to_string(),
        };

        let id = match kind {
            TagKind::Application => {
                if !is_valid_application(rest) {
                    return Err(invalid());
                }
                rest.to_string()
            }
            TagKind::Unit => {
                let (app, number) = rest.rsplit_once('-').ok_or_else(invalid)?;
                if !is_valid_application(app) || !is_valid_number(number) {
                    return Err(invalid());
                }
                format!("{app}/{number}")
            }
            TagKind::Machine => {
                if !is_valid_machine(rest) {
                    return Err(invalid());
                }
                rest.replace('-', "/")
            }
            TagKind::Model | TagKind::Controller => {
                if !is_valid_uuid(rest) {
                    return Err(invalid());
                }
                rest.to_string()
            }
            TagKind::User => {
                if !is_valid_user(rest) {
                    return Err(invalid());
                }
                rest.to_string()
            }
        };
        Ok(Self { kind, id })
    }

    /// Tag for the application with the given name.
    pub fn application(name: &str) -> Result<Self, FormatError> {
        Self::parse(&format!("application-{name}"))
    }

    /// Tag for a unit given as `<application>/<number>`.
    pub fn unit(name: &str) -> Result<Self, FormatError> {
        Self::parse(&format!("unit-{}", name.replace('/', "-")))
    }

    /// Tag for a machine given as `0` or `0/lxd/1`.
    pub fn machine(id: &str) -> Result<Self, FormatError> {
        Self::parse(&format!("machine-{}", id.replace('/', "-")))
    }

    /// Tag for the model with the given UUID.
    pub fn model(uuid: &Uuid) -> Self {
        Self {
            kind: TagKind::Model,
            id: uuid.hyphenated().to_string(),
        }
    }

    /// Tag for the controller with the given UUID.
    pub fn controller(uuid: &Uuid) -> Self {
        Self {
            kind: TagKind::Controller,
            id: uuid.hyphenated().to_string(),
        }
    }

    /// Tag for a user, optionally qualified with `@domain`.
    pub fn user(name: &str) -> Result<Self, FormatError> {
        Self::parse(&format!("user-{name}"))
    }

    /// The principal kind.
    pub fn kind(&self) -> TagKind {
        self.kind
    }

    /// The logical id of the principal.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TagKind::Unit | TagKind::Machine => {
                write!(f, "{}-{}", self.kind, self.id.replace('/', "-"))
            }
            _ => write!(f, "{}-{}", self.kind, self.id),
        }
    }
}

impl FromStr for Tag {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Tag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// Application names are dash-separated lowercase segments. The first segment
// starts with a letter; no segment may be purely numeric, so that the
// trailing `-<n>` of a unit tag stays unambiguous.
fn is_valid_application(name: &str) -> bool {
    let mut segments = name.split('-');
    let Some(first) = segments.next() else {
        return false;
    };
    if !first.starts_with(|c: char| c.is_ascii_lowercase()) {
        return false;
    }
    let segment_ok = |seg: &str| {
        !seg.is_empty()
            && seg.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            && seg.chars().any(|c| c.is_ascii_lowercase())
    };
    segment_ok(first) && segments.all(segment_ok)
}

fn is_valid_number(s: &str) -> bool {
    match s.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        bytes => bytes.iter().all(u8::is_ascii_digit),
    }
}

// `0`, `0-lxd-1`, `3-kvm-0-lxd-2`: a machine number followed by
// container-type/number pairs.
fn is_valid_machine(s: &str) -> bool {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() % 2 == 0 || !is_valid_number(parts[0]) {
        return false;
    }
    parts[1..].chunks(2).all(|pair| {
        !pair[0].is_empty()
            && pair[0].chars().all(|c| c.is_ascii_lowercase())
            && is_valid_number(pair[1])
    })
}

fn is_valid_uuid(s: &str) -> bool {
    s.len() == 36 && Uuid::parse_str(s).is_ok()
}

fn is_valid_user(s: &str) -> bool {
    let (name, domain) = match s.split_once('@') {
        Some((name, domain)) => (name, Some(domain)),
        None => (s, None),
    };
    let name_ok = !name.is_empty()
        && name.starts_with(|c: char| c.is_ascii_alphanumeric())
        && name.ends_with(|c: char| c.is_ascii_alphanumeric())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-'));
    let domain_ok = domain.map_or(true, |d| {
        !d.is_empty()
            && d.starts_with(|c: char| c.is_ascii_alphanumeric())
            && d.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'))
    });
    name_ok && domain_ok
}
