#![forbid(unsafe_code)]

//! Boundary coverage of target segments.
//!
//! A point of a vertical segment at `x = p` is covered when some pane has its
//! left or right edge at `p` (within [`EPSILON`]) and spans that point
//! vertically. Horizontal segments are the transpose.
//!
//! Results are recomputed from the layout on every call. There is no cache to
//! invalidate after a split or delete.

use serde::Serialize;
use splitcraft_core::geometry::{EPSILON, Interval, Segment, approx_eq};

use crate::pane::PaneLayout;

/// One piece of a segment, either lying on a pane boundary or not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoverageSpan {
    pub start: f64,
    pub end: f64,
    pub covered: bool,
}

impl CoverageSpan {
    #[must_use]
    pub fn len(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Coverage of a single segment.
///
/// `spans` are ordered, contiguous, and together span exactly
/// `[segment.start, segment.end]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageResult {
    pub segment: Segment,
    pub spans: Vec<CoverageSpan>,
}

impl CoverageResult {
    /// Whether no part of the segment is uncovered.
    #[must_use]
    pub fn is_covered(&self) -> bool {
        self.spans.iter().all(|span| span.covered)
    }

    #[must_use]
    pub fn covered_length(&self) -> f64 {
        self.spans
            .iter()
            .filter(|span| span.covered)
            .map(CoverageSpan::len)
            .sum()
    }

    /// Covered length over segment length, in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        let total = self.segment.len();
        if total <= 0.0 {
            return if self.is_covered() { 1.0 } else { 0.0 };
        }
        (self.covered_length() / total).clamp(0.0, 1.0)
    }

    /// The uncovered spans, in order.
    pub fn gaps(&self) -> impl Iterator<Item = &CoverageSpan> + '_ {
        self.spans.iter().filter(|span| !span.covered)
    }
}

/// Coverage of a whole target line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineCoverage {
    pub segments: Vec<CoverageResult>,
}

impl LineCoverage {
    /// Every segment covered. An empty line is trivially covered.
    #[must_use]
    pub fn is_covered(&self) -> bool {
        self.segments.iter().all(CoverageResult::is_covered)
    }

    /// Total covered length over total line length.
    #[must_use]
    pub fn progress(&self) -> f64 {
        let total: f64 = self.segments.iter().map(|r| r.segment.len()).sum();
        if total <= 0.0 {
            return if self.is_covered() { 1.0 } else { 0.0 };
        }
        let covered: f64 = self.segments.iter().map(CoverageResult::covered_length).sum();
        (covered / total).clamp(0.0, 1.0)
    }
}

/// Extents, along the segment's axis, of panes with an edge on the segment's
/// line.
#[must_use]
pub fn segment_coverage_ranges(segment: &Segment, layout: &PaneLayout) -> Vec<Interval> {
    layout
        .panes()
        .filter(|pane| {
            let (low, high) = pane.rect.boundaries(segment.orientation);
            approx_eq(low, segment.position) || approx_eq(high, segment.position)
        })
        .map(|pane| pane.rect.span_along(segment.orientation))
        .collect()
}

/// Sort by start and merge intervals that overlap or nearly touch.
#[must_use]
pub fn merge_intervals(mut ranges: Vec<Interval>) -> Vec<Interval> {
    ranges.sort_by(|a, b| a.start.total_cmp(&b.start));
    let mut merged: Vec<Interval> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end + EPSILON => {
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// Split `segment` into covered and uncovered spans.
#[must_use]
pub fn coverage(segment: &Segment, layout: &PaneLayout) -> CoverageResult {
    let merged = merge_intervals(segment_coverage_ranges(segment, layout));
    let (start, end) = (segment.start, segment.end);
    let mut spans = Vec::new();
    let mut cursor = start;

    for range in merged {
        if range.end <= cursor + EPSILON {
            continue;
        }
        if range.start >= end - EPSILON {
            break;
        }
        if range.start > cursor + EPSILON {
            spans.push(CoverageSpan {
                start: cursor,
                end: range.start,
                covered: false,
            });
            cursor = range.start;
        }
        let covered_end = if range.end >= end - EPSILON {
            end
        } else {
            range.end
        };
        spans.push(CoverageSpan {
            start: cursor,
            end: covered_end,
            covered: true,
        });
        cursor = covered_end;
        if cursor >= end {
            break;
        }
    }
    if cursor < end {
        spans.push(CoverageSpan {
            start: cursor,
            end,
            covered: false,
        });
    }

    CoverageResult {
        segment: *segment,
        spans,
    }
}

/// Whether every point of `segment` lies on a pane boundary.
#[must_use]
pub fn is_segment_covered(segment: &Segment, layout: &PaneLayout) -> bool {
    coverage(segment, layout).is_covered()
}

/// Whether every segment of `line` is covered.
#[must_use]
pub fn is_line_covered(line: &[Segment], layout: &PaneLayout) -> bool {
    line.iter().all(|segment| is_segment_covered(segment, layout))
}

#[must_use]
pub fn line_coverage(line: &[Segment], layout: &PaneLayout) -> LineCoverage {
    LineCoverage {
        segments: line.iter().map(|segment| coverage(segment, layout)).collect(),
    }
}
