#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The container parser must never panic, only return errors.
    let _ = binpatch::deserialize(data);

    // Parse failures aside, anything that parses must survive apply.
    if data.len() >= 2 {
        let split = data.len() / 2;
        let (source, container) = data.split_at(split);
        let _ = binpatch::engine::patch(source, container);
    }
});
