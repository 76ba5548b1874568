//! Document readers.
//!
//! [`SpdxParser`] reads the conversion source (SPDX JSON or tag-value).
//! [`CycloneDxParser`] re-reads CycloneDX output for structural validation.
//!
//! ## Format Detection
//!
//! Each parser reports a confidence score (0.0-1.0) for handling content
//! without parsing it, so the CLI can tell a user that they passed a
//! CycloneDX file where SPDX was expected.
//!
//! ```no_run
//! use sbom_convert::parsers::{detect_format, parse_spdx};
//!
//! let content = std::fs::read_to_string("sbom.spdx.json").unwrap();
//! if let Some(detected) = detect_format(&content) {
//!     println!("Detected: {} ({})", detected.format_name, detected.confidence);
//! }
//! let doc = parse_spdx(&content).unwrap();
//! println!("{} packages", doc.packages.len());
//! ```

mod cyclonedx;
mod spdx;
mod traits;

pub use cyclonedx::{validate_bom, CycloneDxParser, ValidationReport};
pub use spdx::SpdxParser;
pub use traits::{DocumentParser, FormatConfidence, FormatDetection, FormatVariant};

use crate::error::Result;
use crate::model::spdx::SpdxDocument;

/// Result of format detection
#[derive(Debug, Clone)]
pub struct DetectedFormat {
    /// Name of the detected format
    pub format_name: &'static str,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
    /// Detected encoding variant
    pub variant: Option<FormatVariant>,
    /// Detected version if available
    pub version: Option<String>,
    /// Any warnings about the detection
    pub warnings: Vec<String>,
}

/// Detect the document format from content without parsing
///
/// Returns None if neither parser recognises the content.
#[must_use]
pub fn detect_format(content: &str) -> Option<DetectedFormat> {
    let spdx = SpdxParser::new();
    let cdx = CycloneDxParser::new();
    let candidates = [
        (spdx.format_name(), spdx.detect(content)),
        (cdx.format_name(), cdx.detect(content)),
    ];

    candidates
        .into_iter()
        .filter(|(_, detection)| detection.confidence.can_parse())
        .max_by(|(_, a), (_, b)| a.confidence.value().total_cmp(&b.confidence.value()))
        .map(|(format_name, detection)| DetectedFormat {
            format_name,
            confidence: detection.confidence.value(),
            variant: detection.variant,
            version: detection.version,
            warnings: detection.warnings,
        })
}

/// Parse an SPDX document from string content
pub fn parse_spdx(content: &str) -> Result<SpdxDocument> {
    SpdxParser::new().parse_str(content)
}

/// Parse an SPDX document from raw bytes
pub fn parse_spdx_bytes(bytes: &[u8]) -> Result<SpdxDocument> {
    SpdxParser::new().parse_bytes(bytes)
}
