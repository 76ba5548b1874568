//! SPDX 2.x source document model.
//!
//! Only the parts of the SPDX schema the converter reads are modelled.
//! Unknown fields are ignored during deserialization. Optional SPDX values
//! that may carry the `NOASSERTION` / `NONE` sentinels stay `Option<String>`
//! here; [`asserted`] is the one place those sentinels are interpreted.

use serde::{Deserialize, Deserializer, Serialize};

/// SPDX sentinel meaning "the creator made no attempt to determine this".
pub const NOASSERTION: &str = "NOASSERTION";
/// SPDX sentinel meaning "there is no value".
pub const NONE: &str = "NONE";

/// Identifier the document uses to refer to itself.
pub const DOCUMENT_ID: &str = "SPDXRef-DOCUMENT";

/// Identifiers that designate the document's root package.
pub const ROOT_PACKAGE_IDS: [&str; 2] = ["SPDXRef-RootPackage", "RootPackage"];

/// Prefixes that mark file elements, which never become components.
const FILE_ID_PREFIXES: [&str; 2] = ["SPDXRef-File", "File-"];

/// Check whether a raw SPDX value is a "no value" sentinel.
///
/// Empty strings are treated the same as the sentinels.
#[must_use]
pub fn is_sentinel(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case(NOASSERTION)
        || trimmed.eq_ignore_ascii_case(NONE)
}

/// Return the value only if it is present and not a sentinel.
#[must_use]
pub fn asserted(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !is_sentinel(v))
}

/// Whether an element identifier follows the file naming convention.
#[must_use]
pub fn is_file_id(id: &str) -> bool {
    FILE_ID_PREFIXES.iter().any(|prefix| id.starts_with(prefix))
}

/// Whether an element identifier designates the root package.
#[must_use]
pub fn is_root_id(id: &str) -> bool {
    ROOT_PACKAGE_IDS.contains(&id)
}

/// Read a list that may be written as `null`, treating `null` as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// An SPDX document as read from JSON or tag-value input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxDocument {
    pub spdx_version: Option<String>,
    #[serde(rename = "SPDXID")]
    pub spdx_id: Option<String>,
    pub name: Option<String>,
    pub data_license: Option<String>,
    pub document_namespace: Option<String>,
    pub creation_info: Option<SpdxCreationInfo>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub document_describes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub packages: Vec<SpdxPackage>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub files: Vec<SpdxFile>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub relationships: Vec<SpdxRelationship>,
}

impl SpdxDocument {
    /// The identifier the document uses for itself.
    #[must_use]
    pub fn document_id(&self) -> &str {
        self.spdx_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(DOCUMENT_ID)
    }

    /// Creators listed in the creation info, parsed into kind/name/email.
    pub fn creators(&self) -> impl Iterator<Item = Creator> + '_ {
        self.creation_info
            .iter()
            .flat_map(|ci| ci.creators.iter())
            .filter_map(|raw| Creator::parse(raw))
    }

    /// Whether `id` names a file element of this document.
    #[must_use]
    pub fn is_file_element(&self, id: &str) -> bool {
        is_file_id(id) || self.files.iter().any(|f| f.spdx_id == id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxCreationInfo {
    pub created: Option<String>,
    #[serde(default)]
    pub creators: Vec<String>,
    pub license_list_version: Option<String>,
    pub comment: Option<String>,
}

/// One package entry of the source document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxPackage {
    #[serde(rename = "SPDXID", default)]
    pub spdx_id: String,
    pub name: Option<String>,
    pub version_info: Option<String>,
    pub package_file_name: Option<String>,
    pub supplier: Option<String>,
    pub originator: Option<String>,
    pub download_location: Option<String>,
    pub files_analyzed: Option<bool>,
    pub package_verification_code: Option<SpdxVerificationCode>,
    #[serde(default)]
    pub checksums: Vec<SpdxChecksum>,
    pub homepage: Option<String>,
    pub source_info: Option<String>,
    pub license_concluded: Option<String>,
    pub license_declared: Option<String>,
    pub license_comments: Option<String>,
    pub copyright_text: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub comment: Option<String>,
    #[serde(default)]
    pub external_refs: Vec<SpdxExternalRef>,
    #[serde(default)]
    pub attribution_texts: Vec<String>,
    pub primary_package_purpose: Option<String>,
    pub release_date: Option<String>,
    pub built_date: Option<String>,
    pub valid_until_date: Option<String>,
}

impl SpdxPackage {
    /// Package name, empty when the document left it out.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Package version, if one was asserted.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        asserted(self.version_info.as_deref())
    }

    /// The first package-manager locator that is a package URL.
    #[must_use]
    pub fn purl_locator(&self) -> Option<&str> {
        self.external_refs
            .iter()
            .find(|r| r.is_purl())
            .map(|r| r.reference_locator.trim())
    }

    /// Whether this package is the designated root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        is_root_id(&self.spdx_id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxVerificationCode {
    pub package_verification_code_value: String,
    #[serde(default)]
    pub package_verification_code_excluded_files: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxChecksum {
    pub algorithm: String,
    pub checksum_value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxExternalRef {
    pub reference_category: String,
    pub reference_type: String,
    pub reference_locator: String,
    pub comment: Option<String>,
}

impl SpdxExternalRef {
    /// Whether the reference category is the package-manager one.
    ///
    /// SPDX 2.2 spells it `PACKAGE-MANAGER`, 2.3 `PACKAGE_MANAGER`.
    #[must_use]
    pub fn is_package_manager(&self) -> bool {
        let category = self.reference_category.to_ascii_uppercase().replace('_', "-");
        category == "PACKAGE-MANAGER"
    }

    /// Whether this reference carries a package URL.
    #[must_use]
    pub fn is_purl(&self) -> bool {
        let locator = self.reference_locator.trim();
        locator.starts_with("pkg:")
            && (self.reference_type.eq_ignore_ascii_case("purl") || self.is_package_manager())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxRelationship {
    pub spdx_element_id: String,
    pub relationship_type: String,
    pub related_spdx_element: String,
    pub comment: Option<String>,
}

impl SpdxRelationship {
    /// The parsed relationship type.
    #[must_use]
    pub fn kind(&self) -> RelationshipType {
        RelationshipType::parse(&self.relationship_type)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxFile {
    #[serde(rename = "SPDXID", default)]
    pub spdx_id: String,
    pub file_name: Option<String>,
}

/// SPDX relationship vocabulary, as far as conversion cares about it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RelationshipType {
    Contains,
    DependsOn,
    BuildDependencyOf,
    RuntimeDependencyOf,
    DevDependencyOf,
    OptionalDependencyOf,
    TestDependencyOf,
    StaticLink,
    DynamicLink,
    Describes,
    DescribedBy,
    Other(String),
}

impl RelationshipType {
    /// Parse a relationship type tag. Accepts `-` or `_` as separator and any case.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "CONTAINS" => Self::Contains,
            "DEPENDS_ON" => Self::DependsOn,
            "BUILD_DEPENDENCY_OF" => Self::BuildDependencyOf,
            "RUNTIME_DEPENDENCY_OF" => Self::RuntimeDependencyOf,
            "DEV_DEPENDENCY_OF" => Self::DevDependencyOf,
            "OPTIONAL_DEPENDENCY_OF" => Self::OptionalDependencyOf,
            "TEST_DEPENDENCY_OF" => Self::TestDependencyOf,
            "STATIC_LINK" => Self::StaticLink,
            "DYNAMIC_LINK" => Self::DynamicLink,
            "DESCRIBES" => Self::Describes,
            "DESCRIBED_BY" => Self::DescribedBy,
            _ => Self::Other(normalized),
        }
    }

    /// Whether this relationship is a direct dependency edge.
    #[must_use]
    pub const fn is_dependency(&self) -> bool {
        matches!(
            self,
            Self::Contains
                | Self::DependsOn
                | Self::BuildDependencyOf
                | Self::RuntimeDependencyOf
                | Self::DevDependencyOf
                | Self::OptionalDependencyOf
                | Self::TestDependencyOf
                | Self::StaticLink
                | Self::DynamicLink
        )
    }

    /// Whether the edge points from dependency to dependent (`A *_DEPENDENCY_OF B`).
    #[must_use]
    pub const fn is_reversed(&self) -> bool {
        matches!(
            self,
            Self::BuildDependencyOf
                | Self::RuntimeDependencyOf
                | Self::DevDependencyOf
                | Self::OptionalDependencyOf
                | Self::TestDependencyOf
        )
    }
}

/// Kind of entity in the SPDX `"<Kind>: <Name> (<email>)"` convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatorKind {
    Tool,
    Person,
    Organization,
}

/// A parsed SPDX entity string, used for creators, suppliers and originators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creator {
    pub kind: CreatorKind,
    pub name: String,
    pub email: Option<String>,
}

impl Creator {
    /// Parse `"Organization: Acme Corp (ops@acme.example)"` and friends.
    ///
    /// Returns `None` for sentinels and strings without a recognised kind prefix.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (kind, rest) = raw.trim().split_once(':')?;
        let kind = match kind.trim() {
            "Tool" => CreatorKind::Tool,
            "Person" => CreatorKind::Person,
            "Organization" => CreatorKind::Organization,
            _ => return None,
        };
        let (name, email) = split_email(rest.trim());
        if is_sentinel(name) {
            return None;
        }
        Some(Self {
            kind,
            name: name.to_string(),
            email,
        })
    }
}

/// Strip a trailing `(email)` from an entity name.
fn split_email(value: &str) -> (&str, Option<String>) {
    if let Some(open) = value.rfind('(') {
        if value.ends_with(')') {
            let email = value[open + 1..value.len() - 1].trim();
            let name = value[..open].trim();
            let email = (!email.is_empty()).then(|| email.to_string());
            return (name, email);
        }
    }
    (value, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        assert!(is_sentinel("NOASSERTION"));
        assert!(is_sentinel("none"));
        assert!(is_sentinel("  "));
        assert!(!is_sentinel("MIT"));
        assert_eq!(asserted(Some(" MIT ")), Some("MIT"));
        assert_eq!(asserted(Some("NOASSERTION")), None);
        assert_eq!(asserted(None), None);
    }

    #[test]
    fn test_file_and_root_ids() {
        assert!(is_file_id("SPDXRef-File-src-main.c"));
        assert!(is_file_id("File-abc"));
        assert!(!is_file_id("SPDXRef-Package-file-utils"));
        assert!(is_root_id("SPDXRef-RootPackage"));
        assert!(is_root_id("RootPackage"));
        assert!(!is_root_id("SPDXRef-Package"));
    }

    #[test]
    fn test_relationship_parse() {
        assert_eq!(RelationshipType::parse("CONTAINS"), RelationshipType::Contains);
        assert_eq!(
            RelationshipType::parse("dev-dependency-of"),
            RelationshipType::DevDependencyOf
        );
        assert!(RelationshipType::parse("STATIC_LINK").is_dependency());
        assert!(!RelationshipType::parse("DESCRIBES").is_dependency());
        assert!(!RelationshipType::parse("GENERATED_FROM").is_dependency());
        assert!(RelationshipType::parse("TEST_DEPENDENCY_OF").is_reversed());
        assert!(!RelationshipType::parse("DEPENDS_ON").is_reversed());
    }

    #[test]
    fn test_null_lists_read_as_empty() {
        let doc: SpdxDocument = serde_json::from_str(
            r#"{"spdxVersion": "SPDX-2.3", "packages": null, "relationships": null}"#,
        )
        .unwrap();
        assert!(doc.packages.is_empty());
        assert!(doc.relationships.is_empty());
        assert!(doc.files.is_empty());
    }

    #[test]
    fn test_creator_parse() {
        let c = Creator::parse("Organization: Acme Corp (ops@acme.example)").unwrap();
        assert_eq!(c.kind, CreatorKind::Organization);
        assert_eq!(c.name, "Acme Corp");
        assert_eq!(c.email.as_deref(), Some("ops@acme.example"));

        let c = Creator::parse("Person: Jane Doe ()").unwrap();
        assert_eq!(c.name, "Jane Doe");
        assert_eq!(c.email, None);

        let c = Creator::parse("Tool: syft-0.98.0").unwrap();
        assert_eq!(c.kind, CreatorKind::Tool);
        assert_eq!(c.name, "syft-0.98.0");

        assert!(Creator::parse("NOASSERTION").is_none());
        assert!(Creator::parse("Organization: NOASSERTION").is_none());
        assert!(Creator::parse("Robot: R2D2").is_none());
    }

    #[test]
    fn test_purl_locator() {
        let pkg = SpdxPackage {
            external_refs: vec![
                SpdxExternalRef {
                    reference_category: "SECURITY".into(),
                    reference_type: "cpe23Type".into(),
                    reference_locator: "cpe:2.3:a:x:y:1.0:*:*:*:*:*:*:*".into(),
                    comment: None,
                },
                SpdxExternalRef {
                    reference_category: "PACKAGE_MANAGER".into(),
                    reference_type: "purl".into(),
                    reference_locator: "pkg:npm/lib@2.0".into(),
                    comment: None,
                },
            ],
            ..Default::default()
        };
        assert_eq!(pkg.purl_locator(), Some("pkg:npm/lib@2.0"));
    }

    #[test]
    fn test_document_id_default() {
        let doc = SpdxDocument::default();
        assert_eq!(doc.document_id(), DOCUMENT_ID);
    }
}
