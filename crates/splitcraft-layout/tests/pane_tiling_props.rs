//! Property suites for pane tiling, split/delete inversion, navigation
//! symmetry, and coverage monotonicity.
//!
//! Operation streams come from a seeded LCG so any failing case replays from
//! its seed alone.

use proptest::prelude::*;
use splitcraft_core::{Direction, Orientation, Segment};
use splitcraft_layout::{PaneId, PaneLayout, coverage};

#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state >> 11
    }

    fn choose_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_u64() % len as u64) as usize
    }

    fn choose_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 0
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Split(PaneId, Orientation),
    Delete(PaneId),
    Navigate(Direction),
}

fn pane_ids(layout: &PaneLayout) -> Vec<PaneId> {
    layout.panes().map(|pane| pane.id).collect()
}

fn random_orientation(rng: &mut Lcg) -> Orientation {
    if rng.choose_bool() {
        Orientation::Vertical
    } else {
        Orientation::Horizontal
    }
}

fn random_op(layout: &PaneLayout, rng: &mut Lcg) -> Op {
    let ids = pane_ids(layout);
    let target = ids[rng.choose_index(ids.len())];
    match rng.choose_index(5) {
        0 | 1 => Op::Split(target, random_orientation(rng)),
        2 | 3 => Op::Delete(target),
        _ => Op::Navigate(Direction::ALL[rng.choose_index(4)]),
    }
}

fn apply(layout: &mut PaneLayout, op: Op) {
    match op {
        Op::Split(id, orientation) => {
            layout.split(id, orientation);
        }
        Op::Delete(id) => {
            layout.delete_pane(id);
        }
        Op::Navigate(direction) => {
            layout.navigate(direction);
        }
    }
}

fn run_sequence(seed: u64, steps: usize) -> PaneLayout {
    let mut layout = PaneLayout::new();
    let mut rng = Lcg::new(seed);
    for step in 0..steps {
        let op = random_op(&layout, &mut rng);
        apply(&mut layout, op);
        if let Err(err) = layout.validate() {
            panic!("tiling broken at step {step}, seed={seed}, op={op:?}: {err}");
        }
    }
    layout
}

fn grid_segment(rng: &mut Lcg) -> Segment {
    let position = (1 + rng.choose_index(7)) as f64 / 8.0;
    let a = rng.choose_index(8);
    let b = a + 1 + rng.choose_index(8 - a);
    Segment::new(
        random_orientation(rng),
        position,
        a as f64 / 8.0,
        b as f64 / 8.0,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn random_operation_sequences_preserve_tiling(
        seed in any::<u64>(),
        steps in 10usize..150,
    ) {
        let layout = run_sequence(seed, steps);
        prop_assert!((layout.total_area() - 1.0).abs() < 1e-9);
        prop_assert!(layout.contains(layout.active_id()));
    }

    #[test]
    fn split_then_delete_either_half_restores_rects(
        seed in any::<u64>(),
        steps in 0usize..60,
        delete_new_half in any::<bool>(),
    ) {
        let mut layout = run_sequence(seed, steps);
        let mut rng = Lcg::new(seed.rotate_left(17));
        let ids = pane_ids(&layout);
        let target = ids[rng.choose_index(ids.len())];
        let before = layout.canonical_rects();

        let Some(new_id) = layout.split(target, random_orientation(&mut rng)) else {
            return Ok(());
        };
        let victim = if delete_new_half { new_id } else { target };
        prop_assert!(layout.delete_pane(victim).is_some());
        prop_assert_eq!(layout.canonical_rects(), before);
        prop_assert!(layout.validate().is_ok());
    }

    #[test]
    fn opposite_moves_return_to_origin(
        seed in any::<u64>(),
        steps in 0usize..100,
        vertical in any::<bool>(),
    ) {
        let mut layout = run_sequence(seed, steps);
        let (there, back) = if vertical {
            (Direction::Down, Direction::Up)
        } else {
            (Direction::Right, Direction::Left)
        };
        for origin in pane_ids(&layout) {
            layout.set_active(origin);
            if layout.navigate(there) {
                prop_assert!(layout.navigate(back));
                prop_assert_eq!(layout.active_id(), origin);
            }
        }
    }

    #[test]
    fn further_splits_never_reduce_coverage(
        seed in any::<u64>(),
        steps in 0usize..60,
        extra in 1usize..20,
    ) {
        let mut layout = run_sequence(seed, steps);
        let mut rng = Lcg::new(!seed);
        let segment = grid_segment(&mut rng);
        let mut covered = coverage::coverage(&segment, &layout).covered_length();

        for _ in 0..extra {
            let ids = pane_ids(&layout);
            let target = ids[rng.choose_index(ids.len())];
            layout.split(target, random_orientation(&mut rng));
            let now = coverage::coverage(&segment, &layout).covered_length();
            prop_assert!(now + 1e-9 >= covered, "coverage dropped from {} to {}", covered, now);
            covered = now;
        }
    }
}

#[test]
fn seed_corpus_preserves_tiling() {
    let seeds = [
        0_u64,
        1,
        2,
        3,
        5,
        8,
        13,
        21,
        34,
        55,
        89,
        144,
        u32::MAX as u64,
        u64::MAX,
    ];
    for seed in seeds {
        let layout = run_sequence(seed, 200);
        assert!(!layout.is_empty());
    }
}

#[test]
fn seed_sweep_preserves_tiling_and_symmetry() {
    for seed in 0..1500_u64 {
        let mut layout = run_sequence(seed, 200);
        for origin in pane_ids(&layout) {
            layout.set_active(origin);
            if layout.navigate(Direction::Right) {
                assert!(layout.navigate(Direction::Left), "seed={seed}");
                assert_eq!(layout.active_id(), origin, "seed={seed}");
            }
        }
    }
}

#[test]
fn replay_is_deterministic() {
    let a = run_sequence(0xC0FFEE, 120);
    let b = run_sequence(0xC0FFEE, 120);
    assert_eq!(a.canonical_rects(), b.canonical_rects());
    assert_eq!(a.active_id(), b.active_id());
    assert_eq!(pane_ids(&a), pane_ids(&b));
}
