//! Document assembly: root selection, metadata and the final BOM.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;
use xxhash_rust::xxh3::xxh3_128;

use crate::config::{ConvertOptions, SerialNumberMode};
use crate::convert::components::ComponentMapper;
use crate::convert::identifiers::RefTable;
use crate::convert::relationships::RelationshipProjector;
use crate::error::{ConvertError, Result, StructureErrorKind};
use crate::model::cyclonedx::{Bom, Component, ComponentType, Metadata, OrganizationalContact, Tools};
use crate::model::spdx::{asserted, CreatorKind, RelationshipType, SpdxDocument};

/// Builds a CycloneDX BOM from a parsed SPDX document.
pub struct DocumentAssembler<'a> {
    options: &'a ConvertOptions,
}

impl<'a> DocumentAssembler<'a> {
    #[must_use]
    pub const fn new(options: &'a ConvertOptions) -> Self {
        Self { options }
    }

    /// Assemble the BOM. `input` is the raw source, used for content-hash serials.
    pub fn assemble(&self, doc: &SpdxDocument, input: &[u8]) -> Result<Bom> {
        if doc.packages.is_empty() {
            return Err(ConvertError::structure(
                "assembling CycloneDX document",
                StructureErrorKind::NoPackages,
            ));
        }

        // The ref table must exist before any mapping or projection reads it
        let refs = RefTable::build(&doc.packages);
        let mapper = ComponentMapper::new(&refs);

        let root_index = find_root(doc, self.options.root_from_describes);
        let root = root_index.map(|i| mapper.map(i, &doc.packages[i]));

        let components: Vec<Component> = doc
            .packages
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != root_index)
            .map(|(i, pkg)| mapper.map(i, pkg))
            .collect();

        let dependencies = RelationshipProjector::new(doc, &refs).project();

        tracing::debug!(
            components = components.len(),
            dependencies = dependencies.len(),
            root = root.as_ref().and_then(|c| c.bom_ref.as_deref()).unwrap_or("<none>"),
            "assembled CycloneDX document"
        );

        let mut bom = Bom::new();
        bom.serial_number = Some(serial_number(self.options.serial_number, input));
        bom.metadata = Some(build_metadata(doc, root));
        bom.components = components;
        bom.dependencies = dependencies;
        Ok(bom)
    }
}

/// Locate the root package.
///
/// A package with a root sentinel id wins. Otherwise, when enabled, the
/// first package the document describes.
#[must_use]
pub fn find_root(doc: &SpdxDocument, from_describes: bool) -> Option<usize> {
    if let Some(index) = doc.packages.iter().position(|p| p.is_root()) {
        return Some(index);
    }
    if !from_describes {
        return None;
    }

    let document_id = doc.document_id();
    let described = doc
        .document_describes
        .iter()
        .map(String::as_str)
        .chain(doc.relationships.iter().filter_map(|rel| {
            match rel.kind() {
                RelationshipType::Describes if rel.spdx_element_id == document_id => {
                    Some(rel.related_spdx_element.as_str())
                }
                RelationshipType::DescribedBy if rel.related_spdx_element == document_id => {
                    Some(rel.spdx_element_id.as_str())
                }
                _ => None,
            }
        }));

    for id in described {
        if let Some(index) = doc.packages.iter().position(|p| p.spdx_id == id) {
            tracing::debug!(spdx_id = id, "root package taken from DESCRIBES");
            return Some(index);
        }
    }
    None
}

/// Metadata: timestamp, tools and authors from the creation info, plus the root.
fn build_metadata(doc: &SpdxDocument, root: Option<Component>) -> Metadata {
    let timestamp = doc
        .creation_info
        .as_ref()
        .and_then(|ci| asserted(ci.created.as_deref()))
        .map(normalize_timestamp);

    let mut tools = Vec::new();
    let mut authors = Vec::new();
    for creator in doc.creators() {
        match creator.kind {
            CreatorKind::Tool => {
                let (name, version) = split_tool_name(&creator.name);
                let mut tool = Component::new(ComponentType::Application, name);
                tool.version = version.map(str::to_string);
                tools.push(tool);
            }
            CreatorKind::Person | CreatorKind::Organization => {
                authors.push(OrganizationalContact {
                    name: Some(creator.name),
                    email: creator.email,
                });
            }
        }
    }

    Metadata {
        timestamp,
        tools: (!tools.is_empty()).then_some(Tools::Components { components: tools }),
        authors,
        component: root,
    }
}

/// Split `syft-0.98.0` into `("syft", Some("0.98.0"))`.
#[must_use]
pub fn split_tool_name(raw: &str) -> (&str, Option<&str>) {
    match raw.rsplit_once('-') {
        Some((name, version))
            if !name.is_empty() && version.starts_with(|c: char| c.is_ascii_digit()) =>
        {
            (name, Some(version))
        }
        _ => (raw, None),
    }
}

/// Re-render an RFC 3339 timestamp in UTC; unparseable values pass through.
fn normalize_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        Err(e) => {
            tracing::debug!(created = raw, error = %e, "creation timestamp is not RFC 3339");
            raw.to_string()
        }
    }
}

/// `urn:uuid:` serial number for the requested mode.
#[must_use]
pub fn serial_number(mode: SerialNumberMode, input: &[u8]) -> String {
    let uuid = match mode {
        SerialNumberMode::Random => Uuid::new_v4(),
        SerialNumberMode::ContentHash => {
            uuid::Builder::from_random_bytes(xxh3_128(input).to_be_bytes()).into_uuid()
        }
    };
    format!("urn:uuid:{uuid}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::spdx::{SpdxCreationInfo, SpdxPackage, SpdxRelationship};

    fn package(id: &str, name: &str, version: &str) -> SpdxPackage {
        SpdxPackage {
            spdx_id: id.into(),
            name: Some(name.into()),
            version_info: Some(version.into()),
            ..SpdxPackage::default()
        }
    }

    fn describes(to: &str) -> SpdxRelationship {
        SpdxRelationship {
            spdx_element_id: "SPDXRef-DOCUMENT".into(),
            relationship_type: "DESCRIBES".into(),
            related_spdx_element: to.into(),
            comment: None,
        }
    }

    #[test]
    fn test_no_packages_is_structure_error() {
        let doc = SpdxDocument::default();
        let err = DocumentAssembler::new(&ConvertOptions::default())
            .assemble(&doc, b"")
            .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Structure {
                source: StructureErrorKind::NoPackages,
                ..
            }
        ));
    }

    #[test]
    fn test_root_by_sentinel() {
        let doc = SpdxDocument {
            packages: vec![
                package("SPDXRef-lib", "lib", "2.0"),
                package("SPDXRef-RootPackage", "app", "1.0"),
            ],
            ..SpdxDocument::default()
        };
        assert_eq!(find_root(&doc, true), Some(1));

        let bom = DocumentAssembler::new(&ConvertOptions::default())
            .assemble(&doc, b"")
            .unwrap();
        let root = bom.root_component().unwrap();
        assert_eq!(root.name, "app");
        assert_eq!(root.bom_ref.as_deref(), Some("app@1.0"));
        assert_eq!(bom.components.len(), 1);
        assert!(bom.components.iter().all(|c| c.name != "app"));
    }

    #[test]
    fn test_root_by_describes() {
        let mut doc = SpdxDocument {
            packages: vec![
                package("SPDXRef-lib", "lib", "2.0"),
                package("SPDXRef-app", "app", "1.0"),
            ],
            relationships: vec![describes("SPDXRef-app")],
            ..SpdxDocument::default()
        };
        assert_eq!(find_root(&doc, true), Some(1));
        assert_eq!(find_root(&doc, false), None);

        doc.relationships.clear();
        doc.document_describes = vec!["SPDXRef-lib".into()];
        assert_eq!(find_root(&doc, true), Some(0));
    }

    #[test]
    fn test_no_root_leaves_metadata_component_unset() {
        let doc = SpdxDocument {
            packages: vec![package("SPDXRef-lib", "lib", "2.0")],
            ..SpdxDocument::default()
        };
        let bom = DocumentAssembler::new(&ConvertOptions::default())
            .assemble(&doc, b"")
            .unwrap();
        assert!(bom.root_component().is_none());
        assert_eq!(bom.components.len(), 1);
    }

    #[test]
    fn test_metadata_from_creation_info() {
        let doc = SpdxDocument {
            creation_info: Some(SpdxCreationInfo {
                created: Some("2024-01-02T03:04:05Z".into()),
                creators: vec![
                    "Tool: syft-0.98.0".into(),
                    "Tool: custom-scanner".into(),
                    "Organization: Acme (sbom@acme.example)".into(),
                    "Person: Jane Doe".into(),
                ],
                ..SpdxCreationInfo::default()
            }),
            packages: vec![package("SPDXRef-lib", "lib", "2.0")],
            ..SpdxDocument::default()
        };
        let bom = DocumentAssembler::new(&ConvertOptions::default())
            .assemble(&doc, b"")
            .unwrap();
        let metadata = bom.metadata.unwrap();
        assert_eq!(metadata.timestamp.as_deref(), Some("2024-01-02T03:04:05Z"));

        let Some(Tools::Components { components }) = metadata.tools else {
            panic!("expected tool components");
        };
        assert_eq!(components[0].name, "syft");
        assert_eq!(components[0].version.as_deref(), Some("0.98.0"));
        assert_eq!(components[1].name, "custom-scanner");
        assert_eq!(components[1].version, None);

        assert_eq!(metadata.authors.len(), 2);
        assert_eq!(metadata.authors[0].email.as_deref(), Some("sbom@acme.example"));
    }

    #[test]
    fn test_serial_numbers() {
        let a = serial_number(SerialNumberMode::ContentHash, b"input");
        let b = serial_number(SerialNumberMode::ContentHash, b"input");
        let c = serial_number(SerialNumberMode::ContentHash, b"other");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("urn:uuid:"));

        let uuid = Uuid::parse_str(a.trim_start_matches("urn:uuid:")).unwrap();
        assert_eq!(uuid.get_version_num(), 4);

        let r1 = serial_number(SerialNumberMode::Random, b"input");
        let r2 = serial_number(SerialNumberMode::Random, b"input");
        assert_ne!(r1, r2);
    }

    #[test]
    fn test_split_tool_name() {
        assert_eq!(split_tool_name("syft-0.98.0"), ("syft", Some("0.98.0")));
        assert_eq!(split_tool_name("spdx-sbom-generator-v1"), ("spdx-sbom-generator-v1", None));
        assert_eq!(split_tool_name("trivy"), ("trivy", None));
        assert_eq!(split_tool_name("-1.0"), ("-1.0", None));
    }

    #[test]
    fn test_timestamp_normalization() {
        assert_eq!(normalize_timestamp("2024-01-02T04:04:05+01:00"), "2024-01-02T03:04:05Z");
        assert_eq!(normalize_timestamp("yesterday"), "yesterday");
    }
}
