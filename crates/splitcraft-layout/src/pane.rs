#![forbid(unsafe_code)]

//! Flat pane layout that tiles the unit square.
//!
//! A [`PaneLayout`] keeps every pane in a dense slot array with a free list.
//! Layouts stay small, so adjacency is answered by scanning all slots for
//! coincident edges rather than by walking a split tree.
//!
//! # Tiling invariant
//!
//! Between operations the pane rectangles partition `[0, 1] x [0, 1]`: no two
//! panes overlap in positive area and their union is the whole square. Every
//! mutator in this module preserves it, and [`PaneLayout::validate`] checks it.
//!
//! # No-op policy
//!
//! Splits and deletes never fail loudly. An unknown id, deleting the last
//! pane, or a split that would produce a pane thinner than [`EPSILON`] leaves
//! the layout untouched and returns `None`. The reason is logged at `debug`.

use std::fmt;

use serde::{Deserialize, Serialize};
use splitcraft_core::geometry::{
    Direction, EPSILON, Orientation, Rect, SNAP, coincides,
};
use tracing::{debug, warn};

/// Stable identifier for panes.
///
/// `0` is reserved so IDs are always non-zero. IDs are never reused within a
/// session, so a renderer can key focus and animation state on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneId(u64);

impl PaneId {
    /// Lowest valid pane ID.
    pub const MIN: Self = Self(1);

    /// Create a pane ID, rejecting 0.
    #[must_use]
    pub const fn new(raw: u64) -> Option<Self> {
        if raw == 0 { None } else { Some(Self(raw)) }
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Monotonic allocator for pane IDs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneIdAllocator {
    next: u64,
}

impl PaneIdAllocator {
    /// Peek at the next ID without consuming.
    #[must_use]
    pub const fn peek(&self) -> Option<PaneId> {
        PaneId::new(self.next)
    }

    /// Allocate the next ID, or `None` once the ID space is exhausted.
    pub fn allocate(&mut self) -> Option<PaneId> {
        let current = PaneId::new(self.next)?;
        self.next = self.next.checked_add(1).unwrap_or(0);
        Some(current)
    }
}

impl Default for PaneIdAllocator {
    fn default() -> Self {
        Self { next: PaneId::MIN.0 }
    }
}

/// A rectangular region of the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pane {
    pub id: PaneId,
    pub rect: Rect,
}

/// A pane sharing a positive-length edge with another pane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: PaneId,
    /// Side of the queried pane the neighbor sits on.
    pub side: Direction,
    /// Length of the shared edge.
    pub shared: f64,
    pub rect: Rect,
}

#[derive(Debug, Clone)]
pub(crate) struct Slot {
    pub(crate) pane: Pane,
    /// Other half of the split that last produced this pane.
    pub(crate) partner: Option<PaneId>,
    /// Value of the focus clock when this pane was last entered or left.
    pub(crate) focused_at: u64,
}

/// The set of panes tiling the unit square plus the focused pane.
#[derive(Debug, Clone)]
pub struct PaneLayout {
    slots: Vec<Option<Slot>>,
    free: Vec<usize>,
    active: PaneId,
    ids: PaneIdAllocator,
    focus_clock: u64,
}

impl Default for PaneLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneLayout {
    /// A layout holding one pane that spans the whole square.
    #[must_use]
    pub fn new() -> Self {
        Self::with_allocator(PaneIdAllocator::default())
    }

    /// A single-pane layout drawing IDs from `ids`.
    #[must_use]
    pub fn with_allocator(mut ids: PaneIdAllocator) -> Self {
        let id = match ids.allocate() {
            Some(id) => id,
            None => {
                warn!("pane id space exhausted; restarting allocation");
                ids = PaneIdAllocator::default();
                ids.allocate().unwrap_or(PaneId::MIN)
            }
        };
        Self {
            slots: vec![Some(Slot {
                pane: Pane {
                    id,
                    rect: Rect::UNIT,
                },
                partner: None,
                focused_at: 0,
            })],
            free: Vec::new(),
            active: id,
            ids,
            focus_clock: 0,
        }
    }

    /// A fresh single-pane layout that continues this layout's ID sequence.
    ///
    /// Used when a level is completed: the old layout is replaced wholesale,
    /// but pane IDs stay unique across the session.
    #[must_use]
    pub fn successor(&self) -> Self {
        Self::with_allocator(self.ids.clone())
    }

    /// Number of panes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Always false for a valid layout.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Panes in encounter (slot) order.
    pub fn panes(&self) -> impl Iterator<Item = &Pane> + '_ {
        self.slots.iter().flatten().map(|slot| &slot.pane)
    }

    pub(crate) fn slots(&self) -> impl Iterator<Item = &Slot> + '_ {
        self.slots.iter().flatten()
    }

    #[must_use]
    pub fn get(&self, id: PaneId) -> Option<&Pane> {
        self.slot(id).map(|slot| &slot.pane)
    }

    #[must_use]
    pub fn contains(&self, id: PaneId) -> bool {
        self.index_of(id).is_some()
    }

    #[must_use]
    pub const fn active_id(&self) -> PaneId {
        self.active
    }

    #[must_use]
    pub fn active(&self) -> Option<&Pane> {
        self.get(self.active)
    }

    /// The ID allocator backing this layout.
    #[must_use]
    pub const fn allocator(&self) -> &PaneIdAllocator {
        &self.ids
    }

    /// Focus `id`. Returns `false` if it is not in the layout.
    pub fn set_active(&mut self, id: PaneId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.focus(id);
        true
    }

    /// Move focus, stamping both the pane being left and the pane entered.
    pub(crate) fn focus(&mut self, id: PaneId) {
        let previous = self.active;
        self.stamp(previous);
        self.active = id;
        self.stamp(id);
    }

    fn stamp(&mut self, id: PaneId) {
        self.focus_clock += 1;
        let clock = self.focus_clock;
        if let Some(slot) = self.slot_mut(id) {
            slot.focused_at = clock;
        }
    }

    fn index_of(&self, id: PaneId) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|s| s.pane.id == id))
    }

    fn slot(&self, id: PaneId) -> Option<&Slot> {
        self.slots().find(|slot| slot.pane.id == id)
    }

    fn slot_mut(&mut self, id: PaneId) -> Option<&mut Slot> {
        self.slots
            .iter_mut()
            .flatten()
            .find(|slot| slot.pane.id == id)
    }

    fn insert(&mut self, slot: Slot) {
        match self.free.pop() {
            Some(index) => self.slots[index] = Some(slot),
            None => self.slots.push(Some(slot)),
        }
    }

    fn remove_at(&mut self, index: usize) -> Option<Slot> {
        let slot = self.slots.get_mut(index)?.take()?;
        self.free.push(index);
        Some(slot)
    }

    // -----------------------------------------------------------------------
    // Split
    // -----------------------------------------------------------------------

    /// Split `id` with a new boundary of `orientation` through its midpoint.
    ///
    /// The left/top half keeps `id`; the right/bottom half gets a fresh ID,
    /// which is returned. Focus does not move.
    pub fn split(&mut self, id: PaneId, orientation: Orientation) -> Option<PaneId> {
        let Some(index) = self.index_of(id) else {
            debug!(pane = %id, "split ignored: unknown pane");
            return None;
        };
        let rect = self.slots[index].as_ref()?.pane.rect;
        if rect.extent_across(orientation) / 2.0 < EPSILON {
            debug!(pane = %id, ?orientation, "split ignored: pane too small");
            return None;
        }
        let Some(new_id) = self.ids.allocate() else {
            warn!(pane = %id, "split ignored: pane id space exhausted");
            return None;
        };

        let (first, second) = rect.split(orientation);
        if let Some(slot) = self.slots[index].as_mut() {
            slot.pane.rect = first;
            slot.partner = Some(new_id);
        }
        self.insert(Slot {
            pane: Pane {
                id: new_id,
                rect: second,
            },
            partner: Some(id),
            focused_at: 0,
        });
        debug!(pane = %id, new_pane = %new_id, ?orientation, panes = self.len(), "pane split");
        Some(new_id)
    }

    /// Split with a vertical boundary into left and right halves.
    pub fn split_vertical(&mut self, id: PaneId) -> Option<PaneId> {
        self.split(id, Orientation::Vertical)
    }

    /// Split with a horizontal boundary into top and bottom halves.
    pub fn split_horizontal(&mut self, id: PaneId) -> Option<PaneId> {
        self.split(id, Orientation::Horizontal)
    }

    /// Split the focused pane.
    pub fn split_active(&mut self, orientation: Orientation) -> Option<PaneId> {
        self.split(self.active, orientation)
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    /// Panes sharing a positive-length edge with `id`, in encounter order.
    #[must_use]
    pub fn neighbors(&self, id: PaneId) -> Vec<Neighbor> {
        let Some(target) = self.get(id).map(|pane| pane.rect) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for pane in self.panes().filter(|pane| pane.id != id) {
            for side in Direction::ALL {
                let shared = target.shared_edge(side, &pane.rect);
                if shared > 0.0 {
                    out.push(Neighbor {
                        id: pane.id,
                        side,
                        shared,
                        rect: pane.rect,
                    });
                    break;
                }
            }
        }
        out
    }

    /// Delete `id` and grow a neighbor over its area.
    ///
    /// The absorbing neighbor is one whose shared edge spans the deleted
    /// pane's whole side, preferring the pane's split partner, then the
    /// longest shared edge, then encounter order. When no single neighbor
    /// fits, the group of neighbors that exactly lines one side grows
    /// together. If no side qualifies the delete is refused.
    ///
    /// Returns the pane that is focused afterwards.
    pub fn delete_pane(&mut self, id: PaneId) -> Option<PaneId> {
        if self.len() <= 1 {
            debug!(pane = %id, "delete ignored: last pane");
            return None;
        }
        let Some(index) = self.index_of(id) else {
            debug!(pane = %id, "delete ignored: unknown pane");
            return None;
        };
        let target = self.slots[index].as_ref()?;
        let rect = target.pane.rect;
        let partner = target.partner;

        let neighbors = self.neighbors(id);
        if neighbors.is_empty() {
            warn!(pane = %id, "pane has no neighbors; dropping it without absorption");
            self.remove_at(index);
            let next = self.panes().next()?.id;
            self.focus(next);
            return Some(next);
        }

        let Some(absorbers) = choose_absorbers(&rect, &neighbors, partner) else {
            debug!(pane = %id, "delete ignored: no neighbor arrangement can absorb the pane");
            return None;
        };

        let grown: Vec<(PaneId, Rect)> = absorbers
            .iter()
            .map(|neighbor| {
                let grow = neighbor.side.opposite();
                let mut next = neighbor.rect;
                next.set_edge(grow, rect.edge(grow));
                (neighbor.id, next)
            })
            .collect();
        let gained: f64 = grown
            .iter()
            .zip(&absorbers)
            .map(|((_, next), neighbor)| next.area() - neighbor.rect.area())
            .sum();
        if (gained - rect.area()).abs() > AREA_TOLERANCE {
            warn!(
                pane = %id,
                gained,
                area = rect.area(),
                "delete refused: absorption would not conserve area"
            );
            return None;
        }

        self.remove_at(index);
        for (neighbor, next) in grown {
            if let Some(slot) = self.slot_mut(neighbor) {
                slot.pane.rect = next;
            }
        }
        let focus = absorbers[0].id;
        self.focus(focus);
        debug!(
            pane = %id,
            absorbed_by = %focus,
            absorbers = absorbers.len(),
            panes = self.len(),
            "pane deleted"
        );
        Some(focus)
    }

    /// Delete the focused pane.
    pub fn delete_active(&mut self) -> Option<PaneId> {
        self.delete_pane(self.active)
    }

    // -----------------------------------------------------------------------
    // Invariant checks
    // -----------------------------------------------------------------------

    /// Sum of pane areas; `1.0` for a valid layout.
    #[must_use]
    pub fn total_area(&self) -> f64 {
        self.panes().map(|pane| pane.rect.area()).sum()
    }

    /// Pane rectangles sorted by position, for comparing layouts while
    /// ignoring IDs.
    #[must_use]
    pub fn canonical_rects(&self) -> Vec<Rect> {
        let mut rects: Vec<Rect> = self.panes().map(|pane| pane.rect).collect();
        rects.sort_by(|a, b| {
            a.y1.total_cmp(&b.y1)
                .then(a.x1.total_cmp(&b.x1))
                .then(a.y2.total_cmp(&b.y2))
                .then(a.x2.total_cmp(&b.x2))
        });
        rects
    }

    /// Check the tiling invariant and focus bookkeeping.
    pub fn validate(&self) -> Result<(), TilingError> {
        if self.is_empty() {
            return Err(TilingError::Empty);
        }
        if !self.contains(self.active) {
            return Err(TilingError::ActiveMissing {
                active: self.active,
            });
        }
        let panes: Vec<&Pane> = self.panes().collect();
        for (i, pane) in panes.iter().enumerate() {
            if !pane.rect.is_normalized() {
                return Err(TilingError::InvalidRect {
                    id: pane.id,
                    rect: pane.rect,
                });
            }
            for other in &panes[i + 1..] {
                if other.id == pane.id {
                    return Err(TilingError::DuplicateId { id: pane.id });
                }
                let area = pane.rect.intersection_area(&other.rect);
                if area > AREA_TOLERANCE {
                    return Err(TilingError::Overlap {
                        first: pane.id,
                        second: other.id,
                        area,
                    });
                }
            }
        }
        let total = self.total_area();
        if !coincides(total, 1.0) {
            return Err(TilingError::AreaMismatch { total });
        }
        Ok(())
    }
}

/// Largest area drift an absorption may introduce.
const AREA_TOLERANCE: f64 = 1e-12;

/// Pick the neighbor(s) that can grow over `rect` and keep every pane
/// rectangular.
fn choose_absorbers(
    rect: &Rect,
    neighbors: &[Neighbor],
    partner: Option<PaneId>,
) -> Option<Vec<Neighbor>> {
    let flush = |n: &&Neighbor| {
        let orientation = n.side.boundary_orientation();
        let side = rect.span_along(orientation);
        let theirs = n.rect.span_along(orientation);
        coincides(side.start, theirs.start) && coincides(side.end, theirs.end)
    };

    if let Some(p) = partner
        && let Some(n) = neighbors.iter().filter(flush).find(|n| n.id == p)
    {
        return Some(vec![*n]);
    }
    let longest = neighbors.iter().filter(flush).fold(None::<&Neighbor>, |best, n| {
        match best {
            Some(b) if n.shared <= b.shared + SNAP => Some(b),
            _ => Some(n),
        }
    });
    if let Some(n) = longest {
        return Some(vec![*n]);
    }

    // A side lined exactly by neighbors that stay within it.
    let mut best: Option<Vec<Neighbor>> = None;
    for side in Direction::ALL {
        let orientation = side.boundary_orientation();
        let span = rect.span_along(orientation);
        let group: Vec<Neighbor> = neighbors
            .iter()
            .filter(|n| n.side == side)
            .copied()
            .collect();
        if group.is_empty() {
            continue;
        }
        let contained = group
            .iter()
            .all(|n| span.contains(&n.rect.span_along(orientation)));
        let lined: f64 = group.iter().map(|n| n.shared).sum();
        if contained
            && coincides(lined, span.len())
            && best.as_ref().is_none_or(|b| group.len() < b.len())
        {
            best = Some(group);
        }
    }
    best
}

/// Violations of the tiling invariant.
#[derive(Debug, Clone, PartialEq)]
pub enum TilingError {
    /// The layout holds no panes.
    Empty,
    /// The active ID does not name a pane.
    ActiveMissing { active: PaneId },
    /// Two panes share an ID.
    DuplicateId { id: PaneId },
    /// A rectangle is inverted, degenerate, or outside the unit square.
    InvalidRect { id: PaneId, rect: Rect },
    /// Two panes overlap in positive area.
    Overlap {
        first: PaneId,
        second: PaneId,
        area: f64,
    },
    /// Pane areas do not sum to the unit square.
    AreaMismatch { total: f64 },
}

impl fmt::Display for TilingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "layout has no panes"),
            Self::ActiveMissing { active } => write!(f, "active pane {active} is not in the layout"),
            Self::DuplicateId { id } => write!(f, "duplicate pane id {id}"),
            Self::InvalidRect { id, rect } => write!(
                f,
                "pane {id} has invalid rect [{}, {}]x[{}, {}]",
                rect.x1, rect.x2, rect.y1, rect.y2
            ),
            Self::Overlap {
                first,
                second,
                area,
            } => write!(f, "panes {first} and {second} overlap by area {area}"),
            Self::AreaMismatch { total } => {
                write!(f, "pane areas sum to {total}, expected 1")
            }
        }
    }
}

impl std::error::Error for TilingError {}
