//! SPDX document reader.
//!
//! Supports SPDX 2.2 and 2.3 in JSON and tag-value encodings. The reader
//! enforces the document-level preconditions (non-empty input, well-formed
//! encoding, `spdxVersion` and `dataLicense` present) and otherwise accepts
//! whatever the document contains; package-level gaps are the converter's
//! concern.

use crate::error::{ConvertError, InputErrorKind, Result, StructureErrorKind};
use crate::model::spdx::{
    SpdxChecksum, SpdxCreationInfo, SpdxDocument, SpdxExternalRef, SpdxFile, SpdxPackage,
    SpdxRelationship, SpdxVerificationCode,
};
use crate::parsers::traits::{
    strip_bom, DocumentParser, FormatConfidence, FormatDetection, FormatVariant,
};

/// Parser for SPDX documents
pub struct SpdxParser {
    /// Reject documents missing `spdxVersion` or `dataLicense`
    strict: bool,
}

impl SpdxParser {
    /// Create a parser that enforces the required top-level fields
    #[must_use]
    pub const fn new() -> Self {
        Self { strict: true }
    }

    /// Create a parser that tolerates missing top-level fields
    #[must_use]
    pub const fn lenient() -> Self {
        Self { strict: false }
    }

    /// Parse raw bytes, rejecting empty and non-UTF-8 input
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<SpdxDocument> {
        let content = std::str::from_utf8(bytes).map_err(|e| {
            ConvertError::input(
                "decoding input",
                InputErrorKind::InvalidJson(format!("input is not valid UTF-8: {e}")),
            )
        })?;
        self.parse_str(content)
    }

    /// Parse SPDX JSON
    fn parse_json(&self, content: &str) -> Result<SpdxDocument> {
        let doc: Option<SpdxDocument> = serde_json::from_str(content).map_err(|e| {
            ConvertError::input("parsing SPDX JSON", InputErrorKind::InvalidJson(e.to_string()))
        })?;
        doc.ok_or_else(|| {
            ConvertError::structure("parsing SPDX JSON", StructureErrorKind::EmptyDocument)
        })
    }

    /// Parse SPDX tag-value into the same document model as JSON
    fn parse_tag_value(&self, content: &str) -> SpdxDocument {
        let mut doc = SpdxDocument::default();
        let mut creation_info = SpdxCreationInfo::default();
        let mut section = Section::Document;

        let mut lines = content.lines();
        while let Some(line) = lines.next() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let value = read_value(value.trim(), &mut lines);

            match key {
                "SPDXVersion" => doc.spdx_version = Some(value),
                "DataLicense" => doc.data_license = Some(value),
                "DocumentName" => doc.name = Some(value),
                "DocumentNamespace" => doc.document_namespace = Some(value),
                "Creator" => creation_info.creators.push(value),
                "Created" => creation_info.created = Some(value),
                "LicenseListVersion" => creation_info.license_list_version = Some(value),
                "CreatorComment" => creation_info.comment = Some(value),
                "Relationship" => {
                    if let Some(rel) = parse_relationship_line(&value) {
                        doc.relationships.push(rel);
                    }
                }
                "PackageName" => {
                    section.finish(&mut doc);
                    section = Section::Package(Box::new(SpdxPackage {
                        name: Some(value),
                        ..SpdxPackage::default()
                    }));
                }
                "FileName" => {
                    section.finish(&mut doc);
                    section = Section::File(SpdxFile {
                        spdx_id: String::new(),
                        file_name: Some(value),
                    });
                }
                "SPDXID" => match &mut section {
                    Section::Document => doc.spdx_id = Some(value),
                    Section::Package(pkg) => pkg.spdx_id = value,
                    Section::File(file) => file.spdx_id = value,
                },
                _ => {
                    if let Section::Package(pkg) = &mut section {
                        apply_package_tag(pkg, key, value);
                    }
                }
            }
        }

        section.finish(&mut doc);
        if !creation_info.creators.is_empty() || creation_info.created.is_some() {
            doc.creation_info = Some(creation_info);
        }
        doc
    }

    /// Enforce the document-level required fields
    fn check_required(&self, doc: &SpdxDocument) -> Result<()> {
        if !self.strict {
            return Ok(());
        }
        if doc.spdx_version.as_deref().map_or(true, |v| v.trim().is_empty()) {
            return Err(ConvertError::missing_field("spdxVersion"));
        }
        if doc.data_license.as_deref().map_or(true, |v| v.trim().is_empty()) {
            return Err(ConvertError::missing_field("dataLicense"));
        }
        Ok(())
    }

    /// Extract SPDX version from JSON content (quick heuristic)
    fn extract_json_version(content: &str) -> Option<String> {
        let idx = content.find("\"spdxVersion\"")?;
        let after = &content[idx + "\"spdxVersion\"".len()..];
        let value_part = &after[after.find(':')? + 1..];
        let after_quote = &value_part[value_part.find('"')? + 1..];
        let version = &after_quote[..after_quote.find('"')?];
        Some(strip_version_prefix(version))
    }

    /// Extract SPDX version from tag-value content
    fn extract_tag_value_version(content: &str) -> Option<String> {
        content
            .lines()
            .find_map(|line| line.trim().strip_prefix("SPDXVersion:"))
            .map(|v| strip_version_prefix(v.trim()))
    }
}

impl Default for SpdxParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser for SpdxParser {
    type Document = SpdxDocument;

    fn parse_str(&self, content: &str) -> Result<SpdxDocument> {
        let content = strip_bom(content);
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(ConvertError::input(
                "checking SPDX input",
                InputErrorKind::EmptyContent,
            ));
        }
        if trimmed == "null" {
            return Err(ConvertError::structure(
                "checking SPDX input",
                StructureErrorKind::EmptyDocument,
            ));
        }

        let doc = match self.detect(content).variant {
            Some(FormatVariant::Json) => self.parse_json(content)?,
            Some(FormatVariant::TagValue) => self.parse_tag_value(content),
            None => {
                return Err(ConvertError::input(
                    "checking SPDX input",
                    InputErrorKind::UnknownFormat,
                ))
            }
        };

        self.check_required(&doc)?;
        tracing::debug!(
            packages = doc.packages.len(),
            relationships = doc.relationships.len(),
            "parsed SPDX document"
        );
        Ok(doc)
    }

    fn format_name(&self) -> &'static str {
        "SPDX"
    }

    fn detect(&self, content: &str) -> FormatDetection {
        let content = strip_bom(content);
        let trimmed = content.trim_start();

        if trimmed.starts_with('{') {
            let has_spdx_version = content.contains("\"spdxVersion\"");
            let has_spdx_id = content.contains("\"SPDXID\"");
            let has_data_license = content.contains("\"dataLicense\"");
            let has_packages = content.contains("\"packages\"");

            let confidence = if has_spdx_version && has_spdx_id {
                FormatConfidence::CERTAIN
            } else if has_spdx_version || (has_spdx_id && has_data_license) {
                FormatConfidence::HIGH
            } else if has_packages || has_data_license {
                FormatConfidence::MEDIUM
            } else {
                // Still JSON: hand it to the JSON reader so the missing fields get reported
                FormatConfidence::LOW
            };

            let mut detection = FormatDetection::with_confidence(confidence)
                .variant(FormatVariant::Json)
                .version(Self::extract_json_version(content));
            if !has_spdx_version {
                detection = detection.warning("Missing spdxVersion field");
            }
            return detection;
        }

        if trimmed.starts_with("SPDXVersion:") || content.contains("\nSPDXVersion:") {
            let confidence = if content.contains("SPDXID:") && content.contains("DataLicense:") {
                FormatConfidence::CERTAIN
            } else {
                FormatConfidence::HIGH
            };
            return FormatDetection::with_confidence(confidence)
                .variant(FormatVariant::TagValue)
                .version(Self::extract_tag_value_version(content));
        }

        FormatDetection::no_match()
    }
}

/// Which element the tag-value reader is currently filling in
enum Section {
    Document,
    Package(Box<SpdxPackage>),
    File(SpdxFile),
}

impl Section {
    /// Move a finished package or file into the document
    fn finish(&mut self, doc: &mut SpdxDocument) {
        match std::mem::replace(self, Self::Document) {
            Self::Document => {}
            Self::Package(pkg) => doc.packages.push(*pkg),
            Self::File(file) => doc.files.push(file),
        }
    }
}

/// Read a tag value, following `<text>` blocks across lines
fn read_value<'a>(first: &str, rest: &mut impl Iterator<Item = &'a str>) -> String {
    let Some(opened) = first.strip_prefix("<text>") else {
        return first.to_string();
    };
    if let Some(end) = opened.find("</text>") {
        return opened[..end].to_string();
    }

    let mut text = opened.to_string();
    for line in rest.by_ref() {
        text.push('\n');
        if let Some(end) = line.find("</text>") {
            text.push_str(&line[..end]);
            break;
        }
        text.push_str(line);
    }
    text.trim().to_string()
}

/// Apply one package-level tag
fn apply_package_tag(pkg: &mut SpdxPackage, key: &str, value: String) {
    match key {
        "PackageVersion" => pkg.version_info = Some(value),
        "PackageFileName" => pkg.package_file_name = Some(value),
        "PackageSupplier" => pkg.supplier = Some(value),
        "PackageOriginator" => pkg.originator = Some(value),
        "PackageDownloadLocation" => pkg.download_location = Some(value),
        "FilesAnalyzed" => pkg.files_analyzed = Some(value.eq_ignore_ascii_case("true")),
        "PackageVerificationCode" => {
            pkg.package_verification_code = Some(parse_verification_code(&value));
        }
        "PackageChecksum" => {
            if let Some(checksum) = parse_checksum_line(&value) {
                pkg.checksums.push(checksum);
            }
        }
        "PackageHomePage" => pkg.homepage = Some(value),
        "PackageSourceInfo" => pkg.source_info = Some(value),
        "PackageLicenseConcluded" => pkg.license_concluded = Some(value),
        "PackageLicenseDeclared" => pkg.license_declared = Some(value),
        "PackageLicenseComments" => pkg.license_comments = Some(value),
        "PackageCopyrightText" => pkg.copyright_text = Some(value),
        "PackageSummary" => pkg.summary = Some(value),
        "PackageDescription" => pkg.description = Some(value),
        "PackageComment" => pkg.comment = Some(value),
        "PackageAttributionText" => pkg.attribution_texts.push(value),
        "PrimaryPackagePurpose" => pkg.primary_package_purpose = Some(value),
        "ReleaseDate" => pkg.release_date = Some(value),
        "BuiltDate" => pkg.built_date = Some(value),
        "ValidUntilDate" => pkg.valid_until_date = Some(value),
        "ExternalRef" => {
            if let Some(ext_ref) = parse_external_ref_line(&value) {
                pkg.external_refs.push(ext_ref);
            }
        }
        _ => {}
    }
}

/// Parse `SPDXRef-A DEPENDS_ON SPDXRef-B`
fn parse_relationship_line(value: &str) -> Option<SpdxRelationship> {
    let mut parts = value.split_whitespace();
    Some(SpdxRelationship {
        spdx_element_id: parts.next()?.to_string(),
        relationship_type: parts.next()?.to_string(),
        related_spdx_element: parts.next()?.to_string(),
        comment: None,
    })
}

/// Parse `PACKAGE-MANAGER purl pkg:npm/lodash@4.17.21`
fn parse_external_ref_line(value: &str) -> Option<SpdxExternalRef> {
    let mut parts = value.split_whitespace();
    Some(SpdxExternalRef {
        reference_category: parts.next()?.to_string(),
        reference_type: parts.next()?.to_string(),
        reference_locator: parts.next()?.to_string(),
        comment: None,
    })
}

/// Parse `SHA256: abcdef...`
fn parse_checksum_line(value: &str) -> Option<SpdxChecksum> {
    let (algorithm, checksum) = value.split_once(':')?;
    Some(SpdxChecksum {
        algorithm: algorithm.trim().to_string(),
        checksum_value: checksum.trim().to_string(),
    })
}

/// Parse `d6a770ba38583ed4bb4525bd96e50461655d2758 (excludes: ./package.spdx)`
fn parse_verification_code(value: &str) -> SpdxVerificationCode {
    match value.split_once('(') {
        Some((code, excludes)) => SpdxVerificationCode {
            package_verification_code_value: code.trim().to_string(),
            package_verification_code_excluded_files: excludes
                .trim_end_matches(')')
                .trim()
                .trim_start_matches("excludes:")
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect(),
        },
        None => SpdxVerificationCode {
            package_verification_code_value: value.trim().to_string(),
            package_verification_code_excluded_files: Vec::new(),
        },
    }
}

fn strip_version_prefix(version: &str) -> String {
    version.strip_prefix("SPDX-").unwrap_or(version).to_string()
}
