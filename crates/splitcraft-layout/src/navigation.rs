#![forbid(unsafe_code)]

//! Directional focus movement with wraparound.
//!
//! A pane is a candidate for `direction` when its opposite edge coincides with
//! the active pane's `direction` edge and the two spans overlap by a positive
//! length. When there is no candidate and the active pane sits on the
//! workspace boundary, the search wraps to panes touching the far boundary.
//!
//! Among several candidates the most recently focused pane wins, then
//! encounter order. Moving right and then left therefore returns to the
//! starting pane whenever both moves succeed.

use splitcraft_core::geometry::{Direction, coincides};
use tracing::trace;

use crate::pane::{PaneId, PaneLayout};

impl PaneLayout {
    /// The pane focus would move to from `from` in `direction`.
    #[must_use]
    pub fn neighbor_in_direction(&self, from: PaneId, direction: Direction) -> Option<PaneId> {
        let origin = self.get(from)?.rect;
        let orientation = direction.boundary_orientation();
        let span = origin.span_along(orientation);
        let edge = origin.edge(direction);
        let facing = direction.opposite();

        let adjacent = |wanted: f64| {
            self.slots()
                .filter(|slot| slot.pane.id != from)
                .filter(move |slot| coincides(slot.pane.rect.edge(facing), wanted))
                .filter(move |slot| span.overlap(&slot.pane.rect.span_along(orientation)) > 0.0)
                .fold(None, |best: Option<(u64, PaneId)>, slot| match best {
                    Some((stamp, _)) if stamp >= slot.focused_at => best,
                    _ => Some((slot.focused_at, slot.pane.id)),
                })
                .map(|(_, id)| id)
        };

        adjacent(edge).or_else(|| {
            if origin.touches_unit_boundary(direction) {
                adjacent(facing.unit_boundary())
            } else {
                None
            }
        })
    }

    /// Move focus from `from` in `direction`. Returns whether focus moved.
    pub fn navigate_from(&mut self, from: PaneId, direction: Direction) -> bool {
        match self.neighbor_in_direction(from, direction) {
            Some(target) => {
                trace!(from = %from, to = %target, ?direction, "focus moved");
                self.focus(target);
                true
            }
            None => false,
        }
    }

    /// Move focus from the active pane in `direction`.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        self.navigate_from(self.active_id(), direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_pane_cannot_move() {
        let mut layout = PaneLayout::new();
        for dir in Direction::ALL {
            assert!(!layout.navigate(dir));
        }
        assert_eq!(layout.active_id(), PaneId::MIN);
    }

    #[test]
    fn moves_across_shared_edge() {
        let mut layout = PaneLayout::new();
        let left = layout.active_id();
        let right = layout.split_vertical(left).expect("split");

        assert!(layout.navigate(Direction::Right));
        assert_eq!(layout.active_id(), right);
        assert!(layout.navigate(Direction::Left));
        assert_eq!(layout.active_id(), left);
    }

    #[test]
    fn wraps_around_workspace_boundary() {
        let mut layout = PaneLayout::new();
        let left = layout.active_id();
        let right = layout.split_vertical(left).expect("split");

        // left touches x = 0; wrapping lands on the pane at x = 1.
        assert!(layout.navigate(Direction::Left));
        assert_eq!(layout.active_id(), right);
        assert!(layout.navigate(Direction::Right));
        assert_eq!(layout.active_id(), left);
    }

    #[test]
    fn vertical_moves_wrap_without_horizontal_neighbors() {
        let mut layout = PaneLayout::new();
        let left = layout.active_id();
        layout.split_vertical(left).expect("split");

        // Full-height panes wrap onto themselves only, which is excluded.
        assert!(!layout.navigate(Direction::Up));
        assert!(!layout.navigate(Direction::Down));
        assert_eq!(layout.active_id(), left);
    }

    #[test]
    fn prefers_most_recently_focused_candidate() {
        let mut layout = PaneLayout::new();
        let left = layout.active_id();
        let top_right = layout.split_vertical(left).expect("split");
        let bottom_right = layout.split_horizontal(top_right).expect("split");

        layout.set_active(bottom_right);
        assert!(layout.navigate(Direction::Left));
        assert_eq!(layout.active_id(), left);
        assert!(layout.navigate(Direction::Right));
        assert_eq!(layout.active_id(), bottom_right);

        layout.set_active(top_right);
        assert!(layout.navigate(Direction::Left));
        assert!(layout.navigate(Direction::Right));
        assert_eq!(layout.active_id(), top_right);
    }

    #[test]
    fn untouched_candidates_fall_back_to_encounter_order() {
        let mut layout = PaneLayout::new();
        let left = layout.active_id();
        let top_right = layout.split_vertical(left).expect("split");
        layout.split_horizontal(top_right).expect("split");

        assert!(layout.navigate(Direction::Right));
        assert_eq!(layout.active_id(), top_right);
    }

    #[test]
    fn corner_contact_is_not_adjacent() {
        let mut layout = PaneLayout::new();
        let tl = layout.active_id();
        let tr = layout.split_vertical(tl).expect("split");
        let bl = layout.split_horizontal(tl).expect("split");
        let br = layout.split_horizontal(tr).expect("split");

        assert_eq!(layout.neighbor_in_direction(tl, Direction::Right), Some(tr));
        assert_eq!(layout.neighbor_in_direction(tl, Direction::Down), Some(bl));
        assert_ne!(layout.neighbor_in_direction(tl, Direction::Right), Some(br));
    }
}
