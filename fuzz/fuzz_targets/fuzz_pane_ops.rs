#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use splitcraft_core::{Direction, Orientation, Segment};
use splitcraft_layout::{PaneLayout, coverage};

#[derive(Debug, Arbitrary)]
enum Op {
    SplitVertical(u8),
    SplitHorizontal(u8),
    Delete(u8),
    Navigate(u8),
    Focus(u8),
}

fuzz_target!(|ops: Vec<Op>| {
    let mut layout = PaneLayout::new();
    let probe = Segment::vertical(0.5, 0.0, 1.0);

    for op in ops.into_iter().take(512) {
        let ids: Vec<_> = layout.panes().map(|pane| pane.id).collect();
        let pick = |n: u8| ids[n as usize % ids.len()];
        match op {
            Op::SplitVertical(n) => {
                let before = coverage(&probe, &layout).covered_length();
                layout.split(pick(n), Orientation::Vertical);
                let after = coverage(&probe, &layout).covered_length();
                assert!(after + 1e-9 >= before, "split reduced coverage");
            }
            Op::SplitHorizontal(n) => {
                layout.split(pick(n), Orientation::Horizontal);
            }
            Op::Delete(n) => {
                layout.delete_pane(pick(n));
            }
            Op::Navigate(n) => {
                layout.navigate(Direction::ALL[n as usize % 4]);
            }
            Op::Focus(n) => {
                assert!(layout.set_active(pick(n)));
            }
        }
        if let Err(err) = layout.validate() {
            panic!("tiling invariant broken: {err}");
        }
    }
});
