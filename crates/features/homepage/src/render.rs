//! Read-only view consumed by the public homepage.

use crate::catalog::{SectionId, default_sections};
use crate::model::{Section, sorted};
use crate::service::LayoutService;
use crate::store::LayoutStore;
use crate::validator::{LayoutViolation, validate};
use folio_derive::api_model;
use tracing::warn;

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct RenderedSection {
    pub id: SectionId,
    pub label: String,
}

/// Sections to show, in display order.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct RenderedView {
    pub sections: Vec<RenderedSection>,
    /// Set when the stored layout could not be used and catalog defaults are shown instead.
    pub fallback: bool,
}

impl RenderedView {
    /// Visible sections of a layout that passes validation.
    ///
    /// # Errors
    /// The violation that makes `sections` unusable.
    pub fn from_sections(sections: &[Section]) -> Result<Self, LayoutViolation> {
        validate(sections)?;
        Ok(Self::visible(&sorted(sections), false))
    }

    /// Catalog defaults: natural order, everything visible.
    #[must_use]
    pub fn fallback() -> Self {
        Self::visible(&default_sections(), true)
    }

    fn visible(sections: &[Section], fallback: bool) -> Self {
        let sections = sections
            .iter()
            .filter(|s| s.visible)
            .map(|s| RenderedSection { id: s.id, label: s.id.entry().label.to_owned() })
            .collect();
        Self { sections, fallback }
    }
}

/// Renders the committed layout, falling back to the catalog defaults when it cannot be read
/// or is malformed.
pub async fn visible_sections<S: LayoutStore>(service: &LayoutService<S>) -> RenderedView {
    match service.read().await {
        Ok(layout) => RenderedView::from_sections(&layout.sections).unwrap_or_else(|violation| {
            warn!(
                kind = violation.kind(),
                version = %layout.version,
                "Stored homepage layout is malformed, rendering defaults"
            );
            RenderedView::fallback()
        }),
        Err(err) => {
            warn!(error = %err, "Homepage layout unavailable, rendering defaults");
            RenderedView::fallback()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Layout;
    use crate::reorder::{move_section, toggle_visibility};
    use crate::store::MemoryLayoutStore;
    use chrono::Utc;
    use folio_event_bus::EventBus;

    #[test]
    fn hidden_sections_are_skipped() {
        let sections = toggle_visibility(&default_sections(), SectionId::Blog);
        let sections = move_section(&sections, SectionId::Contact, 1);
        let view = RenderedView::from_sections(&sections).unwrap();

        assert!(!view.fallback);
        assert_eq!(view.sections.len(), 6);
        assert_eq!(view.sections[1].id, SectionId::Contact);
        assert!(view.sections.iter().all(|s| s.id != SectionId::Blog));
    }

    #[test]
    fn labels_come_from_catalog() {
        let view = RenderedView::fallback();
        assert!(view.fallback);
        assert_eq!(view.sections[2].label, "About Us");
    }

    #[tokio::test]
    async fn malformed_layout_falls_back() {
        let mut layout = Layout::seed(Utc::now());
        layout.sections.truncate(3);
        let service = LayoutService::new(MemoryLayoutStore::with_layout(layout), EventBus::new());

        let view = visible_sections(&service).await;
        assert_eq!(view, RenderedView::fallback());
    }
}
