#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_convert::parsers::{DocumentParser, SpdxParser};

/// Fuzz the SPDX tag-value reader behind a valid header.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let parser = SpdxParser::lenient();
        let _ = parser.parse_str(s);

        let prefixed = format!("SPDXVersion: SPDX-2.3\nDataLicense: CC0-1.0\n{s}");
        let _ = parser.parse_str(&prefixed);
    }
});
