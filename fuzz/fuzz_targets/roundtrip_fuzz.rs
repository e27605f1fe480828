#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the split point between "source" and "target".
    let payload = &data[1..];
    let split = if payload.is_empty() {
        0
    } else {
        data[0] as usize % (payload.len() + 1)
    };
    let (source, target) = payload.split_at(split);

    let patch = binpatch::generate(source, target).unwrap();
    let container = binpatch::serialize(&patch);
    assert_eq!(binpatch::deserialize(&container).unwrap(), patch);

    let rebuilt = binpatch::engine::patch(source, &container).unwrap();
    assert_eq!(rebuilt, target);
});
