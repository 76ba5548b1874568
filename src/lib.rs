//! **Convert SPDX software bills of materials into CycloneDX.**
//!
//! `sbom-convert` reads an SPDX 2.x document (JSON or tag-value) and produces
//! the equivalent CycloneDX 1.5 JSON document. It powers both the
//! `sbom-convert` command-line tool and a library API for embedding the
//! conversion in other tools.
//!
//! ## What gets converted
//!
//! - **Packages** become components. The package marked as the document root
//!   (the `SPDXRef-RootPackage` sentinel, or the package the document
//!   describes) becomes the metadata component instead.
//! - **Identifiers** are rewritten from SPDX ids into stable bom-refs derived
//!   from package URLs, or from name and version when no purl is available.
//! - **Relationships** between packages become the dependency graph. Edges
//!   that touch files or the document itself are dropped.
//! - **Creation info** becomes metadata: timestamp, tools and authors.
//! - **Licenses, checksums, suppliers and external references** are carried
//!   over field by field; SPDX-only fields are kept as namespaced properties.
//!
//! ## Core Modules
//!
//! - **[`model`]**: the SPDX source model and the CycloneDX target model.
//! - **[`parsers`]**: format detection, the SPDX reader and the CycloneDX
//!   structural validator.
//! - **[`convert`]**: the conversion engine, [`SpdxConverter`].
//! - **[`pipeline`]**: the file/stdin/stdout boundary around the engine.
//! - **[`config`]**: conversion options and YAML config file support.
//!
//! ## Getting Started
//!
//! ```no_run
//! use sbom_convert::{ConvertOptions, SpdxConverter};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let input = std::fs::read("app.spdx.json")?;
//!     let converter = SpdxConverter::new(ConvertOptions::default());
//!     let (output, summary) = converter.convert_with_summary(&input)?;
//!
//!     println!(
//!         "{} components, {} dependency entries",
//!         summary.components, summary.dependencies
//!     );
//!     std::fs::write("app.cdx.json", output)?;
//!     Ok(())
//! }
//! ```
//!
//! Working with the typed document instead of bytes:
//!
//! ```
//! use sbom_convert::{parsers::parse_spdx, ConvertOptions, SpdxConverter};
//!
//! let input = r#"{
//!     "spdxVersion": "SPDX-2.3",
//!     "dataLicense": "CC0-1.0",
//!     "packages": [{"SPDXID": "SPDXRef-RootPackage", "name": "app", "versionInfo": "1.0"}]
//! }"#;
//! let doc = parse_spdx(input).unwrap();
//! let bom = SpdxConverter::new(ConvertOptions::deterministic())
//!     .to_bom(&doc, input.as_bytes())
//!     .unwrap();
//! assert_eq!(bom.root_component().map(|c| c.name.as_str()), Some("app"));
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::struct_excessive_bools,
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod parsers;
pub mod pipeline;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConvertOptions, SerialNumberMode};
pub use config::{ConfigError, Validatable};
pub use convert::{convert, ConversionSummary, SpdxConverter};
pub use error::{ConvertError, ErrorContext, Result};
pub use model::{Bom, SpdxDocument};
pub use parsers::{detect_format, parse_spdx, validate_bom, ValidationReport};
