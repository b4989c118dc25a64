#![no_main]

use grinfo_git::{format_log_line, parse_log_line};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    // Anything that parses must survive a format/parse round trip
    if let Ok(record) = parse_log_line(line) {
        let again = parse_log_line(&format_log_line(&record));
        assert!(again.is_ok(), "formatted record failed to parse: {record:?}");
    }
});
