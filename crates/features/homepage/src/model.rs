use crate::catalog::{SectionId, default_sections};
use chrono::{DateTime, Utc};
use folio_derive::api_model;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One homepage section as placed in a layout.
#[api_model]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Section {
    pub id: SectionId,
    /// 1-based position.
    pub order: u32,
    pub visible: bool,
}

/// Optimistic concurrency token of the layout aggregate.
///
/// Starts at [`LayoutVersion::INITIAL`] for the seeded layout and advances by one per commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct LayoutVersion(pub u64);

impl LayoutVersion {
    pub const INITIAL: Self = Self(1);

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LayoutVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The committed aggregate: sections sorted by `order`, paired with their version.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct Layout {
    pub sections: Vec<Section>,
    pub version: LayoutVersion,
    pub updated_at: DateTime<Utc>,
}

impl Layout {
    /// Layout created on first start: catalog defaults at the initial version.
    #[must_use]
    pub fn seed(now: DateTime<Utc>) -> Self {
        Self { sections: default_sections(), version: LayoutVersion::INITIAL, updated_at: now }
    }

    /// Visible sections in display order.
    pub fn visible(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.visible)
    }

    #[must_use]
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }
}

/// Sorts sections by `order`, ties broken by catalog order.
pub(crate) fn sorted(sections: &[Section]) -> Vec<Section> {
    let mut sorted = sections.to_vec();
    sorted.sort_by_key(|s| (s.order, s.id));
    sorted
}
