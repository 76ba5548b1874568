//! Pipeline orchestration: read → convert → write.
//!
//! The converter itself never touches the filesystem. This module is the
//! boundary that turns paths and stdin/stdout into bytes and back.

mod input;
mod output;

pub use input::{read_input, InputSource};
pub use output::{write_output, OutputTarget};

use crate::config::ConvertOptions;
use crate::convert::{ConversionSummary, SpdxConverter};
use crate::error::ConvertError;

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to read the source document
    #[error("Failed to read {source_name}: {source}")]
    ReadFailed {
        source_name: String,
        #[source]
        source: ConvertError,
    },

    /// The source document could not be converted
    #[error("Conversion of {source_name} failed: {source}")]
    ConvertFailed {
        source_name: String,
        #[source]
        source: ConvertError,
    },

    /// The converted document could not be written
    #[error("Failed to write {target}: {source}")]
    WriteFailed {
        target: String,
        #[source]
        source: ConvertError,
    },
}

impl PipelineError {
    /// The underlying conversion error
    #[must_use]
    pub const fn inner(&self) -> &ConvertError {
        match self {
            Self::ReadFailed { source, .. }
            | Self::ConvertFailed { source, .. }
            | Self::WriteFailed { source, .. } => source,
        }
    }
}

/// Run one conversion from `input` to `target`.
///
/// Nothing is written unless the whole conversion succeeded.
pub fn run_conversion(
    input: &InputSource,
    target: &OutputTarget,
    options: &ConvertOptions,
) -> Result<ConversionSummary, PipelineError> {
    let source_name = input.display_name();
    let bytes = read_input(input).map_err(|source| PipelineError::ReadFailed {
        source_name: source_name.clone(),
        source,
    })?;

    let (output, summary) = SpdxConverter::new(options.clone())
        .convert_with_summary(&bytes)
        .map_err(|source| PipelineError::ConvertFailed {
            source_name: source_name.clone(),
            source,
        })?;

    write_output(&output, target).map_err(|source| PipelineError::WriteFailed {
        target: target.display_name(),
        source,
    })?;

    tracing::info!(
        input = %source_name,
        components = summary.components,
        dependencies = summary.dependencies,
        root = summary.has_root,
        "converted SPDX document to CycloneDX"
    );
    Ok(summary)
}

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InputErrorKind, StructureErrorKind};

    const MINIMAL: &str = r#"{
        "spdxVersion": "SPDX-2.3",
        "dataLicense": "CC0-1.0",
        "packages": [{"SPDXID": "SPDXRef-a", "name": "a", "versionInfo": "1"}]
    }"#;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::ERROR, 3);
    }

    #[test]
    fn test_run_conversion_to_file() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let input = tmp.path().join("in.spdx.json");
        let output = tmp.path().join("out.cdx.json");
        std::fs::write(&input, MINIMAL).unwrap();

        let summary = run_conversion(
            &InputSource::File(input),
            &OutputTarget::File(output.clone()),
            &ConvertOptions::default(),
        )
        .unwrap();
        assert_eq!(summary.components, 1);
        assert!(!summary.has_root);

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("\"bomFormat\": \"CycloneDX\""));
    }

    #[test]
    fn test_failed_conversion_writes_nothing() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let input = tmp.path().join("in.spdx.json");
        let output = tmp.path().join("out.cdx.json");
        std::fs::write(
            &input,
            r#"{"spdxVersion": "SPDX-2.3", "dataLicense": "CC0-1.0", "packages": []}"#,
        )
        .unwrap();

        let err = run_conversion(
            &InputSource::File(input),
            &OutputTarget::File(output.clone()),
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::ConvertFailed { .. }));
        assert!(matches!(
            err.inner(),
            ConvertError::Structure {
                source: StructureErrorKind::NoPackages,
                ..
            }
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_read_failure_is_reported() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let err = run_conversion(
            &InputSource::File(tmp.path().to_path_buf()),
            &OutputTarget::Stdout,
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err.inner(),
            ConvertError::Input {
                source: InputErrorKind::IsDirectory(_),
                ..
            }
        ));
    }
}
