//! Validate command handler.
//!
//! Implements the `validate` subcommand: structural checks on a CycloneDX
//! JSON document, typically one produced by `convert`.

use crate::parsers::{CycloneDxParser, DocumentParser, ValidationReport};
use crate::pipeline::{read_input, InputSource};
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Run the validate command
pub fn run_validate(path: &Path, fail_on_warning: bool) -> Result<ValidationReport> {
    let source = InputSource::from_arg(path).context("Invalid input argument")?;
    let bytes = read_input(&source)
        .with_context(|| format!("Failed to read {}", source.display_name()))?;
    let content = String::from_utf8(bytes).context("Document is not valid UTF-8")?;

    let parser = CycloneDxParser::new();
    let detection = parser.detect(&content);
    if !detection.confidence.can_parse() {
        if let Some(detected) = crate::parsers::detect_format(&content) {
            bail!(
                "{} looks like {} ({}), not CycloneDX",
                source.display_name(),
                detected.format_name,
                detected.variant.map_or("unknown encoding", |v| v.name())
            );
        }
    }

    let report = parser
        .validate(&content)
        .with_context(|| format!("{} is not a valid CycloneDX document", source.display_name()))?;

    if fail_on_warning && !report.is_clean() {
        bail!(
            "{} has {} validation warning(s)",
            source.display_name(),
            report.warnings.len()
        );
    }

    tracing::info!(
        spec_version = %report.spec_version,
        components = report.components,
        dependencies = report.dependencies,
        warnings = report.warnings.len(),
        "{} is structurally valid CycloneDX",
        source.display_name()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_validate_clean_document() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let path = write(
            tmp.path(),
            "ok.cdx.json",
            r#"{"bomFormat": "CycloneDX", "specVersion": "1.5", "components": []}"#,
        );
        let report = run_validate(&path, true).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_validate_spdx_is_rejected_with_hint() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let path = write(
            tmp.path(),
            "doc.spdx.json",
            r#"{"spdxVersion": "SPDX-2.3", "SPDXID": "SPDXRef-DOCUMENT"}"#,
        );
        let err = run_validate(&path, false).unwrap_err();
        assert!(err.to_string().contains("looks like SPDX"), "{err}");
    }

    #[test]
    fn test_fail_on_warning() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let path = write(
            tmp.path(),
            "dangling.cdx.json",
            r#"{
                "bomFormat": "CycloneDX",
                "specVersion": "1.5",
                "dependencies": [{"ref": "ghost", "dependsOn": []}]
            }"#,
        );
        assert!(run_validate(&path, false).is_ok());
        assert!(run_validate(&path, true).is_err());
    }
}
