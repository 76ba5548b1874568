#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_convert::{convert, ConvertOptions};

/// Fuzz the full conversion.
///
/// Also wraps input as a package list in an SPDX JSON envelope so the
/// mapping stages see more than detection failures.
fuzz_target!(|data: &[u8]| {
    let options = ConvertOptions {
        validate: true,
        ..ConvertOptions::deterministic()
    };
    let _ = convert(data, &options);

    if let Ok(s) = std::str::from_utf8(data) {
        if s.len() < 10_000 {
            let wrapped = format!(
                r#"{{"spdxVersion":"SPDX-2.3","dataLicense":"CC0-1.0","SPDXID":"SPDXRef-DOCUMENT","packages":[{s}]}}"#,
            );
            let _ = convert(wrapped.as_bytes(), &options);
        }
    }
});
