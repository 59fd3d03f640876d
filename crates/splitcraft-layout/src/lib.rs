#![forbid(unsafe_code)]

//! Pane tiling engine for splitcraft.
//!
//! - [`pane`]: the [`PaneLayout`] arena, split/delete, and tiling validation
//! - [`navigation`]: directional focus movement with wraparound
//! - [`coverage`]: how much of a target segment lies on pane boundaries
//!
//! Every coordinate is a fraction of the unit square. Edge coincidence uses
//! [`splitcraft_core::EPSILON`] throughout, so a boundary that navigation
//! treats as shared is also one that coverage counts.

pub mod coverage;
pub mod navigation;
pub mod pane;

pub use coverage::{
    CoverageResult, CoverageSpan, LineCoverage, coverage, is_line_covered, is_segment_covered,
    line_coverage, merge_intervals, segment_coverage_ranges,
};
pub use pane::{Neighbor, Pane, PaneId, PaneIdAllocator, PaneLayout, TilingError};
