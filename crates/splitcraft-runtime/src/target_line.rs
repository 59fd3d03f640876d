#![forbid(unsafe_code)]

//! Target lines the player must trace with pane boundaries.
//!
//! Levels 1 and 2 are fixed. From level 3 on, lines are random: the segment
//! count grows by one every two levels up to a cap, orientations alternate
//! from a random start, and each segment is placed at a fresh random
//! position.
//!
//! Segment `start`/`end` scalars chain: every segment starts where the
//! previous one ended along its own axis. Because consecutive segments lie on
//! perpendicular axes, the pieces are generally not joined end to end in the
//! plane. Generated lines keep that shape.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use splitcraft_core::{Orientation, Segment};
use tracing::debug;

use crate::config::SessionConfig;

/// The ordered segments of one level's puzzle line.
///
/// Order only matters for drawing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetLine {
    pub segments: Vec<Segment>,
}

impl TargetLine {
    #[must_use]
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of segment lengths.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(Segment::len).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }
}

impl AsRef<[Segment]> for TargetLine {
    fn as_ref(&self) -> &[Segment] {
        &self.segments
    }
}

/// Produces the target line for each level.
#[derive(Debug, Clone)]
pub struct LineGenerator {
    rng: SmallRng,
    max_segments: usize,
    position_min: f64,
    position_max: f64,
}

impl LineGenerator {
    /// Generator honoring the config's seed, segment cap, and position range.
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self {
            rng,
            max_segments: config.max_segments.max(1),
            position_min: config.position_min,
            position_max: config.position_max,
        }
    }

    /// Deterministic generator with default bounds.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::from_config(&SessionConfig::default().with_seed(seed))
    }

    /// Segment count for a random level: `min(2 + level / 2, cap)`.
    #[must_use]
    pub fn segment_count(&self, level: u32) -> usize {
        let grown = 2usize.saturating_add(usize::try_from(level / 2).unwrap_or(usize::MAX));
        grown.min(self.max_segments)
    }

    /// The line for `level`. Level 0 is treated as level 1.
    pub fn generate(&mut self, level: u32) -> TargetLine {
        let line = match level {
            0 | 1 => TargetLine::new(vec![Segment::vertical(0.5, 0.0, 1.0)]),
            2 => TargetLine::new(vec![
                Segment::vertical(0.5, 0.0, 0.5),
                Segment::horizontal(0.5, 0.5, 1.0),
            ]),
            _ => self.random_line(self.segment_count(level)),
        };
        debug!(level, segments = line.len(), "target line generated");
        line
    }

    fn random_line(&mut self, count: usize) -> TargetLine {
        let mut orientation = if self.rng.random_bool(0.5) {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };
        let mut segments = Vec::with_capacity(count);
        let mut last_end = 0.0_f64;

        for i in 0..count {
            let position = self.random_position();
            let remaining = (count - i) as f64;
            let length = (1.0 - last_end) / remaining * self.rng.random_range(0.5..=1.0);
            let end = (last_end + length).min(1.0);
            segments.push(Segment::new(orientation, position, last_end, end));
            last_end = end;
            orientation = orientation.perpendicular();
        }
        TargetLine::new(segments)
    }

    fn random_position(&mut self) -> f64 {
        if self.position_min < self.position_max {
            self.rng.random_range(self.position_min..self.position_max)
        } else {
            self.position_min
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_two_levels_are_fixed() {
        let mut generator = LineGenerator::seeded(1);
        assert_eq!(
            generator.generate(1).segments,
            vec![Segment::vertical(0.5, 0.0, 1.0)]
        );
        assert_eq!(
            generator.generate(2).segments,
            vec![
                Segment::vertical(0.5, 0.0, 0.5),
                Segment::horizontal(0.5, 0.5, 1.0)
            ]
        );
    }

    #[test]
    fn segment_count_grows_then_caps() {
        let generator = LineGenerator::seeded(0);
        let counts: Vec<usize> = (3..=10).map(|level| generator.segment_count(level)).collect();
        assert_eq!(counts, vec![3, 4, 4, 5, 5, 5, 5, 5]);
    }

    #[test]
    fn cap_follows_config() {
        let mut config = SessionConfig::default().with_seed(5);
        config.max_segments = 7;
        let generator = LineGenerator::from_config(&config);
        assert_eq!(generator.segment_count(20), 7);
    }

    #[test]
    fn same_seed_same_lines() {
        let mut a = LineGenerator::seeded(99);
        let mut b = LineGenerator::seeded(99);
        for level in 3..12 {
            assert_eq!(a.generate(level), b.generate(level));
        }
    }

    proptest! {
        #[test]
        fn random_lines_chain_scalars_and_alternate(seed in any::<u64>(), level in 3u32..40) {
            let mut generator = LineGenerator::seeded(seed);
            let line = generator.generate(level);
            prop_assert_eq!(line.len(), generator.segment_count(level));

            let mut last_end = 0.0;
            for (i, segment) in line.iter().enumerate() {
                prop_assert_eq!(segment.start, last_end);
                prop_assert!(segment.end > segment.start);
                prop_assert!(segment.end <= 1.0);
                prop_assert!((0.2..0.8).contains(&segment.position));
                if i > 0 {
                    prop_assert_eq!(
                        segment.orientation,
                        line.segments[i - 1].orientation.perpendicular()
                    );
                }
                last_end = segment.end;
            }
        }
    }
}
