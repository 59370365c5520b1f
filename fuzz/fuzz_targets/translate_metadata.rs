#![no_main]

use dataspace_osti::metadata::parse_metadata;
use dataspace_osti::{elink, translate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(fields) = parse_metadata(body) else {
        return;
    };
    if let Ok(record) = translate("fuzz", &fields, None, "SM") {
        let _ = elink::records_to_xml(&[record]);
        let _ = serde_json::to_string(&fields);
    }
});
