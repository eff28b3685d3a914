#![no_main]

use libfuzzer_sys::fuzz_target;

/// Real mementos are a few hundred bytes; longer inputs only repeat segments.
const MAX_MEMENTO_LEN: usize = 4 * 1024;

fuzz_target!(|data: &[u8]| {
    let data = &data[..data.len().min(MAX_MEMENTO_LEN)];
    // Keep the valid UTF-8 prefix; the cap may also split a multi-byte character.
    let text = match std::str::from_utf8(data) {
        Ok(text) => text,
        Err(err) => match std::str::from_utf8(&data[..err.valid_up_to()]) {
            Ok(text) => text,
            Err(_) => return,
        },
    };

    // Goal: never panic on malformed input, and anything accepted decodes back to the same path
    // from its canonical memento.
    let _ = jem_memento::MementoTokenizer::new(text).count();
    let Some(path) = jem_memento::parse(text) else {
        return;
    };
    let canonical = path.memento();
    assert_eq!(
        jem_memento::parse(&canonical).as_ref(),
        Some(&path),
        "canonical memento {canonical:?} decodes to a different path"
    );
});
