#![no_main]

use ipfix::MessageBuffer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut mb = MessageBuffer::default();
    if mb.from_bytes(data).is_ok() {
        for record in mb.namedict_iter() {
            let _ = record;
        }
    }
});
