//! Pure checks a candidate layout must pass before it may be committed.
//!
//! Checks run in a fixed order and stop at the first failure:
//! catalog membership, dense ordering, then visibility. A layout with nothing visible is
//! reported as [`LayoutViolation::NoVisibleSections`]; otherwise every required section must
//! be visible.

use crate::catalog::{CATALOG, SECTION_COUNT, SectionId};
use crate::model::{Section, sorted};
use folio_derive::api_model;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoStaticStr;

/// Reason a candidate layout was rejected.
///
/// The variant name is the machine-readable `kind` reported to clients.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr, thiserror::Error,
)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub enum LayoutViolation {
    #[error("the layout must contain every catalog section exactly once")]
    UnknownOrMissingSection,
    #[error("section orders must be a dense permutation of 1..N")]
    InvalidOrdering,
    #[error("a required section cannot be hidden")]
    RequiredSectionHidden,
    #[error("at least one section must be visible")]
    NoVisibleSections,
}

impl LayoutViolation {
    #[must_use]
    pub fn kind(self) -> &'static str {
        self.into()
    }
}

/// A section as submitted by a client, before any typing.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct CandidateSection {
    pub id: String,
    pub order: i64,
    pub visible: bool,
}

impl From<Section> for CandidateSection {
    fn from(section: Section) -> Self {
        Self {
            id: section.id.as_str().to_owned(),
            order: i64::from(section.order),
            visible: section.visible,
        }
    }
}

/// Validates typed sections against every layout invariant.
///
/// # Errors
/// The first [`LayoutViolation`] found.
pub fn validate(candidate: &[Section]) -> Result<(), LayoutViolation> {
    check_membership(candidate.iter().map(|s| s.id))?;
    check_ordering(candidate.iter().map(|s| i64::from(s.order)))?;
    check_visibility(candidate)
}

/// Types and validates a wire candidate, returning the sections sorted by order.
///
/// An id outside the catalog is a membership failure, not a parse failure, so the
/// reported violation is the same as for typed input.
///
/// # Errors
/// The first [`LayoutViolation`] found.
pub fn parse_candidate(candidate: &[CandidateSection]) -> Result<Vec<Section>, LayoutViolation> {
    let ids = candidate
        .iter()
        .map(|c| SectionId::from_str(&c.id).map_err(|_| LayoutViolation::UnknownOrMissingSection))
        .collect::<Result<Vec<_>, _>>()?;
    check_membership(ids.iter().copied())?;
    check_ordering(candidate.iter().map(|c| c.order))?;

    let sections: Vec<Section> = ids
        .into_iter()
        .zip(candidate)
        .map(|(id, c)| Section {
            id,
            // In range after check_ordering.
            order: u32::try_from(c.order).unwrap_or_default(),
            visible: c.visible,
        })
        .collect();
    check_visibility(&sections)?;
    Ok(sorted(&sections))
}

fn check_membership(ids: impl Iterator<Item = SectionId>) -> Result<(), LayoutViolation> {
    let mut seen = [false; SECTION_COUNT];
    let mut count = 0usize;
    for id in ids {
        let slot = &mut seen[id as usize];
        if *slot {
            return Err(LayoutViolation::UnknownOrMissingSection);
        }
        *slot = true;
        count += 1;
    }
    if count == SECTION_COUNT {
        Ok(())
    } else {
        Err(LayoutViolation::UnknownOrMissingSection)
    }
}

fn check_ordering(orders: impl Iterator<Item = i64>) -> Result<(), LayoutViolation> {
    let mut seen = [false; SECTION_COUNT];
    for order in orders {
        let index = order
            .checked_sub(1)
            .and_then(|i| usize::try_from(i).ok())
            .filter(|i| *i < SECTION_COUNT)
            .ok_or(LayoutViolation::InvalidOrdering)?;
        if seen[index] {
            return Err(LayoutViolation::InvalidOrdering);
        }
        seen[index] = true;
    }
    Ok(())
}

fn check_visibility(sections: &[Section]) -> Result<(), LayoutViolation> {
    // A fully hidden layout is reported as such even though it also hides required sections.
    if !sections.iter().any(|s| s.visible) {
        return Err(LayoutViolation::NoVisibleSections);
    }
    let hidden_required = CATALOG
        .iter()
        .filter(|entry| entry.required)
        .any(|entry| sections.iter().any(|s| s.id == entry.id && !s.visible));
    if hidden_required {
        return Err(LayoutViolation::RequiredSectionHidden);
    }
    Ok(())
}
