//! The fixed, deploy-time set of homepage sections.

use crate::model::Section;
use folio_derive::api_model;
use strum::{EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Identifier of a homepage section.
///
/// Declaration order is the natural catalog order used for the default layout.
#[api_model(rename_all = "snake_case")]
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    EnumString,
    IntoStaticStr,
    EnumIter,
    EnumCount,
)]
#[strum(serialize_all = "snake_case")]
pub enum SectionId {
    Hero,
    Services,
    About,
    Projects,
    Team,
    Blog,
    Contact,
}

impl SectionId {
    /// Catalog entry describing this section.
    #[must_use]
    pub fn entry(self) -> &'static CatalogEntry {
        &CATALOG[self as usize]
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Static description of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: SectionId,
    pub label: &'static str,
    /// Required sections can never be hidden.
    pub required: bool,
}

/// Number of sections in the catalog; every committed layout has exactly this many.
pub const SECTION_COUNT: usize = SectionId::COUNT;

/// Entries in natural order, indexed by `SectionId as usize`.
pub static CATALOG: [CatalogEntry; SECTION_COUNT] = [
    CatalogEntry { id: SectionId::Hero, label: "Hero", required: true },
    CatalogEntry { id: SectionId::Services, label: "Services", required: false },
    CatalogEntry { id: SectionId::About, label: "About Us", required: false },
    CatalogEntry { id: SectionId::Projects, label: "Projects", required: false },
    CatalogEntry { id: SectionId::Team, label: "Team", required: false },
    CatalogEntry { id: SectionId::Blog, label: "Blog", required: false },
    CatalogEntry { id: SectionId::Contact, label: "Contact", required: false },
];

/// All catalog entries in natural order.
#[must_use]
pub fn entries() -> &'static [CatalogEntry] {
    &CATALOG
}

/// The catalog defaults: natural order, every section visible.
#[must_use]
pub fn default_sections() -> Vec<Section> {
    SectionId::iter()
        .zip(1u32..)
        .map(|(id, order)| Section { id, order, visible: true })
        .collect()
}
