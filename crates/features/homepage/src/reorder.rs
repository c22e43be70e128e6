//! Pure edits producing candidate layouts from operator intents.

use crate::catalog::SectionId;
use crate::model::{Section, sorted};

/// Moves `id` to the 0-based position `new_index` and renumbers every order from 1.
///
/// `new_index` is clamped to the last position. An id absent from `sections` leaves the
/// relative order untouched.
#[must_use]
pub fn move_section(sections: &[Section], id: SectionId, new_index: usize) -> Vec<Section> {
    let mut sequence = sorted(sections);
    if let Some(current) = sequence.iter().position(|s| s.id == id) {
        let section = sequence.remove(current);
        let target = new_index.min(sequence.len());
        sequence.insert(target, section);
    }
    renumber(&mut sequence);
    sequence
}

/// Flips the visibility of `id`. Orders are never touched.
#[must_use]
pub fn toggle_visibility(sections: &[Section], id: SectionId) -> Vec<Section> {
    sections
        .iter()
        .map(|s| if s.id == id { Section { visible: !s.visible, ..*s } } else { *s })
        .collect()
}

/// 0-based display position of `id`.
#[must_use]
pub fn index_of(sections: &[Section], id: SectionId) -> Option<usize> {
    sorted(sections).iter().position(|s| s.id == id)
}

fn renumber(sequence: &mut [Section]) {
    for (section, order) in sequence.iter_mut().zip(1u32..) {
        section.order = order;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_sections;

    fn ids(sections: &[Section]) -> Vec<SectionId> {
        sections.iter().map(|s| s.id).collect()
    }

    #[test]
    fn move_blog_after_hero() {
        let moved = move_section(&default_sections(), SectionId::Blog, 1);
        assert_eq!(
            ids(&moved),
            [
                SectionId::Hero,
                SectionId::Blog,
                SectionId::Services,
                SectionId::About,
                SectionId::Projects,
                SectionId::Team,
                SectionId::Contact,
            ]
        );
        assert!(moved.iter().zip(1u32..).all(|(s, o)| s.order == o));
    }

    #[test]
    fn index_is_clamped() {
        let moved = move_section(&default_sections(), SectionId::Hero, 100);
        assert_eq!(moved.last().map(|s| s.id), Some(SectionId::Hero));
        assert_eq!(moved.last().map(|s| s.order), Some(7));
    }

    #[test]
    fn no_op_move_is_identity() {
        let sections = default_sections();
        assert_eq!(move_section(&sections, SectionId::About, 2), sections);
    }

    #[test]
    fn toggle_keeps_orders() {
        let sections = move_section(&default_sections(), SectionId::Contact, 0);
        let toggled = toggle_visibility(&sections, SectionId::Team);
        let orders = |s: &[Section]| s.iter().map(|s| (s.id, s.order)).collect::<Vec<_>>();
        assert_eq!(orders(&toggled), orders(&sections));
        assert!(!toggled.iter().find(|s| s.id == SectionId::Team).unwrap().visible);
    }

    #[test]
    fn index_of_follows_order() {
        let sections = move_section(&default_sections(), SectionId::Blog, 1);
        assert_eq!(index_of(&sections, SectionId::Blog), Some(1));
        assert_eq!(index_of(&sections, SectionId::Services), Some(2));
    }
}
