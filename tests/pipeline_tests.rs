//! Pipeline and CLI integration tests.
//!
//! These tests exercise the read → convert → write boundary, the config
//! layer, and the CLI command handlers with real fixture files.

use sbom_convert::cli::{run_convert, run_validate};
use sbom_convert::config::{
    load_config_file, AppConfig, CliOverrides, SerialNumberMode, Validatable,
};
use sbom_convert::model::Bom;
use sbom_convert::pipeline::{
    read_input, run_conversion, write_output, InputSource, OutputTarget, PipelineError,
};
use sbom_convert::ConvertOptions;
use std::path::{Path, PathBuf};

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn read_bom(path: &Path) -> Bom {
    let content = std::fs::read_to_string(path).expect("output should exist");
    serde_json::from_str(&content).expect("output should be CycloneDX JSON")
}

// ============================================================================
// Pipeline Stage Tests
// ============================================================================

mod pipeline_stages {
    use super::*;

    #[test]
    fn read_fixture_file() {
        let bytes = read_input(&InputSource::File(fixture_path("spdx/scenario.spdx.json")))
            .expect("read should succeed");
        assert!(!bytes.is_empty());
    }

    #[test]
    fn read_missing_file_fails() {
        let result = read_input(&InputSource::File(fixture_path("spdx/missing.spdx.json")));
        assert!(result.is_err());
    }

    #[test]
    fn dash_means_stdin() {
        assert_eq!(InputSource::from_arg(Path::new("-")).unwrap(), InputSource::Stdin);
        assert_eq!(
            OutputTarget::from_option(Some(PathBuf::from("-"))),
            OutputTarget::Stdout
        );
    }

    #[test]
    fn convert_fixture_to_file() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let output = tmp.path().join("scenario.cdx.json");

        let summary = run_conversion(
            &InputSource::File(fixture_path("spdx/scenario.spdx.json")),
            &OutputTarget::File(output.clone()),
            &ConvertOptions::default(),
        )
        .expect("conversion should succeed");

        assert_eq!(summary.packages, 2);
        assert_eq!(summary.components, 1);
        assert_eq!(summary.dependencies, 1);
        assert!(summary.has_root);

        let bom = read_bom(&output);
        assert_eq!(bom.root_component().map(|c| c.name.as_str()), Some("app"));
    }

    #[test]
    fn failed_conversion_leaves_existing_output_untouched() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let output = tmp.path().join("out.cdx.json");
        std::fs::write(&output, "previous").unwrap();

        let err = run_conversion(
            &InputSource::File(fixture_path("spdx/no-packages.spdx.json")),
            &OutputTarget::File(output.clone()),
            &ConvertOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, PipelineError::ConvertFailed { .. }));
        assert!(err.to_string().contains("no-packages.spdx.json"));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous");
    }

    #[test]
    fn write_replaces_existing_file() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let output = tmp.path().join("out.cdx.json");
        std::fs::write(&output, "old").unwrap();

        write_output(b"new", &OutputTarget::File(output.clone())).unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "new");
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

mod configuration {
    use super::*;

    #[test]
    fn config_file_sets_options() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let path = tmp.path().join(".sbom-convert.yaml");
        std::fs::write(
            &path,
            "convert:\n  validate: true\n  pretty: false\n  serial_number: content-hash\n",
        )
        .unwrap();

        let config = load_config_file(&path).expect("config should load");
        assert!(config.convert.validate);
        assert!(!config.convert.pretty);
        assert_eq!(config.convert.serial_number, SerialNumberMode::ContentHash);
        assert!(config.convert.root_from_describes);
    }

    #[test]
    fn cli_flags_override_file() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let path = tmp.path().join("custom.yaml");
        std::fs::write(&path, "convert:\n  root_from_describes: true\n").unwrap();

        let overrides = CliOverrides {
            compact: true,
            no_describes_root: true,
            ..CliOverrides::default()
        };
        let (config, loaded_from) = AppConfig::from_file_with_overrides(Some(&path), &overrides);

        assert_eq!(loaded_from.as_deref(), Some(path.as_path()));
        assert!(!config.convert.pretty);
        assert!(!config.convert.root_from_describes);
    }

    #[test]
    fn output_into_directory_is_invalid() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let config = AppConfig::builder()
            .output_file(Some(tmp.path().to_path_buf()))
            .build();

        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].field.contains("output"));
    }
}

// ============================================================================
// CLI Handler Tests
// ============================================================================

mod cli_handlers {
    use super::*;

    #[test]
    fn convert_then_validate() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let output = tmp.path().join("rich.cdx.json");

        let config = AppConfig::builder()
            .validate(true)
            .serial_number(SerialNumberMode::ContentHash)
            .output_file(Some(output.clone()))
            .build();
        let summary = run_convert(&fixture_path("spdx/rich.spdx.json"), &config)
            .expect("convert should succeed");
        assert!(summary.has_root);

        let report = run_validate(&output, true).expect("validate should succeed");
        assert_eq!(report.spec_version, "1.5");
        assert_eq!(report.components, 3);
        assert!(report.is_clean());
    }

    #[test]
    fn convert_tag_value_input() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let output = tmp.path().join("scenario.cdx.json");

        let config = AppConfig::builder().output_file(Some(output.clone())).build();
        run_convert(&fixture_path("spdx/scenario.spdx"), &config).expect("convert should succeed");

        let bom = read_bom(&output);
        assert_eq!(bom.components.len(), 1);
        assert_eq!(bom.dependencies[0].depends_on, vec!["npm/lib@2.0".to_string()]);
    }

    #[test]
    fn validate_rejects_spdx_input() {
        let err = run_validate(&fixture_path("spdx/scenario.spdx.json"), false).unwrap_err();
        assert!(err.to_string().contains("SPDX"), "{err}");
    }

    #[test]
    fn convert_missing_input_fails() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let config = AppConfig::builder()
            .output_file(Some(tmp.path().join("out.json")))
            .build();

        assert!(run_convert(&tmp.path().join("nope.spdx.json"), &config).is_err());
        assert!(!tmp.path().join("out.json").exists());
    }
}
