#![no_main]

use libfuzzer_sys::fuzz_target;
use splitcraft_core::KeyChord;

fuzz_target!(|data: &str| {
    // Whatever parses must print back to an equivalent chord.
    if let Ok(chord) = data.parse::<KeyChord>() {
        let printed = chord.to_string();
        let reparsed: KeyChord = printed.parse().expect("printed chord parses");
        assert_eq!(reparsed, chord, "{data:?} -> {printed:?}");
    }
});
