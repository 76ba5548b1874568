//! SPDX to CycloneDX conversion.
//!
//! The conversion is a pure function from source bytes to target bytes:
//!
//! 1. read the SPDX document ([`crate::parsers::SpdxParser`])
//! 2. build the SPDX-id to bom-ref table ([`identifiers::RefTable`])
//! 3. map packages to components ([`components::ComponentMapper`])
//! 4. project relationships to dependencies ([`relationships::RelationshipProjector`])
//! 5. assemble metadata and the BOM ([`document::DocumentAssembler`])
//! 6. serialize, and optionally re-parse for structural validation
//!
//! Any document-level failure aborts with an error and no output. Field-level
//! gaps never fail; they fall back to documented defaults.
//!
//! ```no_run
//! use sbom_convert::config::ConvertOptions;
//!
//! let input = std::fs::read("app.spdx.json").unwrap();
//! let output = sbom_convert::convert::convert(&input, &ConvertOptions::default()).unwrap();
//! std::fs::write("app.cdx.json", output).unwrap();
//! ```

pub mod components;
pub mod document;
pub mod identifiers;
pub mod license;
pub mod purl;
pub mod relationships;

pub use components::ComponentMapper;
pub use document::DocumentAssembler;
pub use identifiers::{clean_ref, package_ref, purl_ref, RefTable};
pub use relationships::RelationshipProjector;

use crate::config::ConvertOptions;
use crate::error::{ConvertError, ErrorContext, OutputErrorKind, Result};
use crate::model::cyclonedx::Bom;
use crate::model::spdx::SpdxDocument;
use crate::parsers::{parse_spdx_bytes, CycloneDxParser};

/// Convert SPDX bytes (JSON or tag-value) into CycloneDX JSON bytes.
pub fn convert(input: &[u8], options: &ConvertOptions) -> Result<Vec<u8>> {
    SpdxConverter::new(options.clone()).convert(input)
}

/// What a conversion produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Packages in the source document
    pub packages: usize,
    /// Components in the output, excluding the metadata component
    pub components: usize,
    /// Dependency entries in the output
    pub dependencies: usize,
    /// Whether a root package became the metadata component
    pub has_root: bool,
    /// Non-fatal validation findings (only when validation ran)
    pub warnings: Vec<String>,
}

/// Reusable converter holding the options for a run.
#[derive(Debug, Clone, Default)]
pub struct SpdxConverter {
    options: ConvertOptions,
}

impl SpdxConverter {
    #[must_use]
    pub const fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Full conversion from source bytes to target bytes.
    pub fn convert(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.convert_with_summary(input).map(|(output, _)| output)
    }

    /// Conversion that also reports what was produced.
    pub fn convert_with_summary(&self, input: &[u8]) -> Result<(Vec<u8>, ConversionSummary)> {
        let doc = parse_spdx_bytes(input).context("reading SPDX document")?;
        let bom = self.to_bom(&doc, input)?;
        let output = self.serialize(&bom)?;

        let mut summary = ConversionSummary {
            packages: doc.packages.len(),
            components: bom.components.len(),
            dependencies: bom.dependencies.len(),
            has_root: bom.root_component().is_some(),
            warnings: Vec::new(),
        };

        if self.options.validate {
            let report = CycloneDxParser::new().validate_bytes(&output)?;
            summary.warnings = report.warnings;
        }

        Ok((output, summary))
    }

    /// Build the CycloneDX document model from a parsed SPDX document.
    pub fn to_bom(&self, doc: &SpdxDocument, input: &[u8]) -> Result<Bom> {
        DocumentAssembler::new(&self.options).assemble(doc, input)
    }

    /// Serialize a BOM as JSON, pretty or compact per the options.
    pub fn serialize(&self, bom: &Bom) -> Result<Vec<u8>> {
        let result = if self.options.pretty {
            serde_json::to_vec_pretty(bom)
        } else {
            serde_json::to_vec(bom)
        };
        let mut bytes = result.map_err(|e| {
            ConvertError::output(
                "serializing CycloneDX document",
                OutputErrorKind::Serialization(e.to_string()),
            )
        })?;
        if self.options.pretty {
            bytes.push(b'\n');
        }
        Ok(bytes)
    }
}
