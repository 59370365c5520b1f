#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = std::str::from_utf8(data) {
        if let Ok(date) = dataspace_osti::strtodate(value) {
            assert_eq!(date.len(), 10, "{value:?} normalized to {date:?}");
        }
    }
});
