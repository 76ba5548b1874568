//! CycloneDX JSON reader used for post-hoc structural validation.
//!
//! The converter never reads CycloneDX as a source. This parser exists so
//! produced output (or any CycloneDX document handed to `validate`) can be
//! re-parsed and checked for the structural properties consumers rely on.

use std::collections::HashSet;

use crate::error::{ConvertError, ErrorContext, OutputErrorKind, Result};
use crate::model::cyclonedx::{Bom, Tools, BOM_FORMAT};
use crate::parsers::traits::{
    strip_bom, DocumentParser, FormatConfidence, FormatDetection, FormatVariant,
};

/// Parser for CycloneDX JSON documents
#[derive(Default)]
pub struct CycloneDxParser;

impl CycloneDxParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parse and structurally validate a CycloneDX document.
    ///
    /// Hard failures (not JSON, wrong `bomFormat`, duplicate bom-refs) are
    /// errors; softer findings come back in the report.
    pub fn validate(&self, content: &str) -> Result<ValidationReport> {
        let bom = self.parse_str(content)?;
        validate_bom(&bom)
    }

    /// [`validate`](Self::validate) over raw bytes.
    pub fn validate_bytes(&self, bytes: &[u8]) -> Result<ValidationReport> {
        let content = std::str::from_utf8(bytes).map_err(|e| {
            ConvertError::output(
                "decoding CycloneDX output",
                OutputErrorKind::InvalidTarget(format!("not valid UTF-8: {e}")),
            )
        })?;
        self.validate(content)
    }

    /// Extract CycloneDX version from JSON content
    fn extract_json_version(content: &str) -> Option<String> {
        let idx = content.find("\"specVersion\"")?;
        let after = &content[idx + "\"specVersion\"".len()..];
        let value_part = &after[after.find(':')? + 1..];
        let after_quote = &value_part[value_part.find('"')? + 1..];
        Some(after_quote[..after_quote.find('"')?].to_string())
    }
}

impl DocumentParser for CycloneDxParser {
    type Document = Bom;

    fn parse_str(&self, content: &str) -> Result<Bom> {
        serde_json::from_str(strip_bom(content)).map_err(|e| {
            ConvertError::output(
                "re-parsing CycloneDX output",
                OutputErrorKind::InvalidTarget(e.to_string()),
            )
        })
    }

    fn format_name(&self) -> &'static str {
        "CycloneDX"
    }

    fn detect(&self, content: &str) -> FormatDetection {
        let content = strip_bom(content);
        if !content.trim_start().starts_with('{') {
            return FormatDetection::no_match();
        }

        let has_bom_format = content.contains("\"bomFormat\"");
        let has_cyclonedx = content.contains("CycloneDX");
        let has_spec_version = content.contains("\"specVersion\"");

        let detection = if has_bom_format && has_cyclonedx {
            FormatDetection::with_confidence(FormatConfidence::CERTAIN)
        } else if has_bom_format {
            FormatDetection::with_confidence(FormatConfidence::HIGH)
        } else if has_spec_version && content.contains("\"components\"") {
            FormatDetection::with_confidence(FormatConfidence::MEDIUM)
                .warning("Missing bomFormat field - might not be CycloneDX")
        } else {
            return FormatDetection::no_match();
        };

        detection
            .variant(FormatVariant::Json)
            .version(Self::extract_json_version(content))
    }
}

/// Summary of a successful structural validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Schema version declared by the document
    pub spec_version: String,
    /// Number of components, excluding the metadata component
    pub components: usize,
    /// Number of dependency entries
    pub dependencies: usize,
    /// Non-fatal findings
    pub warnings: Vec<String>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Check the structural properties of a parsed BOM.
///
/// Wrong `bomFormat`, empty `specVersion` and duplicate bom-refs fail with
/// [`ConvertError::Validation`]. Dangling or repeated dependency refs and the
/// pre-1.5 array form of `metadata.tools` are reported as warnings.
pub fn validate_bom(bom: &Bom) -> Result<ValidationReport> {
    check_structure(bom).context("validating CycloneDX output")?;

    let refs: HashSet<&str> = bom
        .root_component()
        .into_iter()
        .chain(bom.components.iter())
        .filter_map(|c| c.bom_ref.as_deref())
        .collect();

    let mut warnings = Vec::new();
    if let Some(Tools::Legacy(tools)) = bom.metadata.as_ref().and_then(|m| m.tools.as_ref()) {
        warnings.push(format!(
            "metadata.tools uses the deprecated array form ({} tool(s)); 1.5 expects an object with components",
            tools.len()
        ));
    }
    for dep in &bom.dependencies {
        for target in std::iter::once(&dep.bom_ref).chain(dep.depends_on.iter()) {
            if !refs.contains(target.as_str()) {
                warnings.push(format!(
                    "dependency ref '{target}' does not match any component"
                ));
            }
        }
        let unique: HashSet<&String> = dep.depends_on.iter().collect();
        if unique.len() != dep.depends_on.len() {
            warnings.push(format!("dependency '{}' lists duplicate refs", dep.bom_ref));
        }
    }

    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    Ok(ValidationReport {
        spec_version: bom.spec_version.clone(),
        components: bom.components.len(),
        dependencies: bom.dependencies.len(),
        warnings,
    })
}

/// Hard structural failures.
fn check_structure(bom: &Bom) -> Result<()> {
    if bom.bom_format != BOM_FORMAT {
        return Err(ConvertError::validation(format!(
            "bomFormat is '{}', expected '{BOM_FORMAT}'",
            bom.bom_format
        )));
    }
    if bom.spec_version.trim().is_empty() {
        return Err(ConvertError::validation("specVersion is empty"));
    }

    let mut seen = HashSet::new();
    let all_components = bom.root_component().into_iter().chain(bom.components.iter());
    for bom_ref in all_components.filter_map(|c| c.bom_ref.as_deref()) {
        if !seen.insert(bom_ref) {
            return Err(ConvertError::validation(format!(
                "duplicate bom-ref '{bom_ref}'"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "bomFormat": "CycloneDX",
        "specVersion": "1.5",
        "version": 1,
        "metadata": {"component": {"type": "application", "bom-ref": "app@1.0", "name": "app"}},
        "components": [{"type": "library", "bom-ref": "npm/lib@2.0", "name": "lib"}],
        "dependencies": [{"ref": "app@1.0", "dependsOn": ["npm/lib@2.0"]}]
    }"#;

    #[test]
    fn test_valid_document() {
        let report = CycloneDxParser::new().validate(VALID).unwrap();
        assert_eq!(report.spec_version, "1.5");
        assert_eq!(report.components, 1);
        assert!(report.is_clean());
    }

    #[test]
    fn test_not_json_is_error() {
        let err = CycloneDxParser::new().validate("not json").unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Output {
                source: OutputErrorKind::InvalidTarget(_),
                ..
            }
        ));
    }

    #[test]
    fn test_wrong_format_is_error() {
        let content = r#"{"bomFormat": "SPDX", "specVersion": "1.5"}"#;
        let err = CycloneDxParser::new().validate(content).unwrap_err();
        assert!(err.to_string().contains("Validation failed"), "{err}");
    }

    #[test]
    fn test_duplicate_refs_is_error() {
        let content = r#"{
            "bomFormat": "CycloneDX",
            "specVersion": "1.5",
            "components": [
                {"type": "library", "bom-ref": "a", "name": "a"},
                {"type": "library", "bom-ref": "a", "name": "a2"}
            ]
        }"#;
        match CycloneDxParser::new().validate(content) {
            Err(ConvertError::Validation(msg)) => {
                assert_eq!(msg, "validating CycloneDX output: duplicate bom-ref 'a'");
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_legacy_tools_array_is_warning() {
        let content = r#"{
            "bomFormat": "CycloneDX",
            "specVersion": "1.4",
            "metadata": {"tools": [{"vendor": "anchore", "name": "syft", "version": "0.98.0"}]},
            "components": []
        }"#;
        let report = CycloneDxParser::new().validate(content).unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("deprecated array form"));
    }

    #[test]
    fn test_byte_order_mark_is_accepted() {
        let content = format!("\u{feff}{VALID}");
        let parser = CycloneDxParser::new();
        assert_eq!(parser.detect(&content).confidence, FormatConfidence::CERTAIN);
        assert!(parser.validate_bytes(content.as_bytes()).unwrap().is_clean());
        assert!(parser.validate_bytes(&[0xff, 0xfe]).is_err());
    }

    #[test]
    fn test_dangling_dependency_is_warning() {
        let content = r#"{
            "bomFormat": "CycloneDX",
            "specVersion": "1.5",
            "components": [{"type": "library", "bom-ref": "a", "name": "a"}],
            "dependencies": [{"ref": "a", "dependsOn": ["SPDXRef-missing"]}]
        }"#;
        let report = CycloneDxParser::new().validate(content).unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("SPDXRef-missing"));
    }

    #[test]
    fn test_detect() {
        let parser = CycloneDxParser::new();
        let detection = parser.detect(VALID);
        assert_eq!(detection.confidence, FormatConfidence::CERTAIN);
        assert_eq!(detection.version.as_deref(), Some("1.5"));
        assert!(!parser.can_parse(r#"{"spdxVersion": "SPDX-2.3"}"#));
    }
}
