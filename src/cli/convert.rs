//! Convert command handler.
//!
//! Implements the `convert` subcommand: SPDX in, CycloneDX out.

use crate::config::{AppConfig, Validatable};
use crate::convert::ConversionSummary;
use crate::pipeline::{run_conversion, InputSource, OutputTarget};
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Run the convert command
pub fn run_convert(input: &Path, config: &AppConfig) -> Result<ConversionSummary> {
    let errors = config.validate();
    if !errors.is_empty() {
        let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("Invalid configuration:\n  {}", details.join("\n  "));
    }

    let source = InputSource::from_arg(input).context("Invalid input argument")?;
    let target = OutputTarget::from_option(config.output.file.clone());

    let summary = run_conversion(&source, &target, &config.convert)?;
    for warning in &summary.warnings {
        tracing::warn!("{warning}");
    }
    if !summary.has_root {
        tracing::warn!("No root package found; metadata component left unset");
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Bom;

    #[test]
    fn test_run_convert_writes_file() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let input = tmp.path().join("in.spdx");
        let output = tmp.path().join("out.cdx.json");
        std::fs::write(
            &input,
            "SPDXVersion: SPDX-2.3\nDataLicense: CC0-1.0\nSPDXID: SPDXRef-DOCUMENT\n\
             PackageName: app\nSPDXID: SPDXRef-RootPackage\nPackageVersion: 1.0\n",
        )
        .unwrap();

        let config = AppConfig::builder()
            .validate(true)
            .output_file(Some(output.clone()))
            .build();
        let summary = run_convert(&input, &config).unwrap();
        assert!(summary.has_root);
        assert_eq!(summary.components, 0);

        let bom: Bom = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(bom.root_component().map(|c| c.name.as_str()), Some("app"));
    }

    #[test]
    fn test_run_convert_rejects_bad_output_dir() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let input = tmp.path().join("in.json");
        std::fs::write(&input, "{}").unwrap();

        let config = AppConfig::builder()
            .output_file(Some(tmp.path().join("missing").join("out.json")))
            .build();
        let err = run_convert(&input, &config).unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }
}
