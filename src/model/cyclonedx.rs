//! CycloneDX target document model.
//!
//! These types serialize to CycloneDX 1.5 JSON and deserialize any
//! reasonably well-formed 1.4-1.6 JSON document for structural validation.

use serde::{Deserialize, Serialize};

/// Value of the `bomFormat` field.
pub const BOM_FORMAT: &str = "CycloneDX";
/// CycloneDX schema version produced by the converter.
pub const SPEC_VERSION: &str = "1.5";

/// A CycloneDX bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bom {
    pub bom_format: String,
    pub spec_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default = "default_bom_version")]
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

const fn default_bom_version() -> u32 {
    1
}

impl Bom {
    /// Create an empty BOM shell with the produced format and schema version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bom_format: BOM_FORMAT.to_string(),
            spec_version: SPEC_VERSION.to_string(),
            serial_number: None,
            version: default_bom_version(),
            metadata: None,
            components: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// The metadata (root) component, if any.
    #[must_use]
    pub fn root_component(&self) -> Option<&Component> {
        self.metadata.as_ref().and_then(|m| m.component.as_ref())
    }

    /// Look up a component by its bom-ref, including the metadata component.
    #[must_use]
    pub fn component_by_ref(&self, bom_ref: &str) -> Option<&Component> {
        self.root_component()
            .into_iter()
            .chain(self.components.iter())
            .find(|c| c.bom_ref.as_deref() == Some(bom_ref))
    }

    /// Look up the dependency entry for a bom-ref.
    #[must_use]
    pub fn dependency(&self, bom_ref: &str) -> Option<&Dependency> {
        self.dependencies.iter().find(|d| d.bom_ref == bom_ref)
    }
}

impl Default for Bom {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Tools>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<OrganizationalContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<Component>,
}

/// Tools that created the document.
///
/// 1.5+ documents use an object with `components`; 1.4 documents use a flat array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tools {
    Components {
        #[serde(default)]
        components: Vec<Component>,
    },
    Legacy(Vec<LegacyTool>),
}

impl Tools {
    /// Number of tool entries regardless of representation.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Components { components } => components.len(),
            Self::Legacy(tools) => tools.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyTool {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A CycloneDX component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    #[serde(rename = "bom-ref", skip_serializing_if = "Option::is_none")]
    pub bom_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<OrganizationalEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hashes: Vec<Hash>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub licenses: Vec<LicenseChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_references: Vec<ExternalReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
}

impl Component {
    /// Create a bare component of the given type.
    pub fn new(component_type: ComponentType, name: impl Into<String>) -> Self {
        Self {
            component_type,
            bom_ref: None,
            supplier: None,
            group: None,
            name: name.into(),
            version: None,
            description: None,
            hashes: Vec::new(),
            licenses: Vec::new(),
            copyright: None,
            purl: None,
            external_references: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Value of the first property with the given name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentType {
    Application,
    Framework,
    Library,
    Container,
    Platform,
    OperatingSystem,
    Device,
    DeviceDriver,
    Firmware,
    File,
    MachineLearningModel,
    Data,
    CryptographicAsset,
}

impl Default for ComponentType {
    fn default() -> Self {
        Self::Library
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationalEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub url: Vec<String>,
}

impl OrganizationalEntity {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            url: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationalContact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hash {
    pub alg: HashAlgorithm,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[serde(rename = "MD5")]
    Md5,
    #[serde(rename = "SHA-1")]
    Sha1,
    #[serde(rename = "SHA-256")]
    Sha256,
    #[serde(rename = "SHA-384")]
    Sha384,
    #[serde(rename = "SHA-512")]
    Sha512,
    #[serde(rename = "SHA3-256")]
    Sha3_256,
    #[serde(rename = "SHA3-384")]
    Sha3_384,
    #[serde(rename = "SHA3-512")]
    Sha3_512,
    #[serde(rename = "BLAKE2b-256")]
    Blake2b256,
    #[serde(rename = "BLAKE2b-384")]
    Blake2b384,
    #[serde(rename = "BLAKE2b-512")]
    Blake2b512,
    #[serde(rename = "BLAKE3")]
    Blake3,
}

/// Either a single license or an SPDX license expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LicenseChoice {
    License { license: License },
    Expression { expression: String },
}

impl LicenseChoice {
    /// The SPDX id, license name or expression text carried by this entry.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::License { license } => license.id.as_deref().or(license.name.as_deref()),
            Self::Expression { expression } => Some(expression),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReference {
    #[serde(rename = "type")]
    pub ref_type: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Direct dependencies of one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    #[serde(rename = "ref")]
    pub bom_ref: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_license_choice_shapes() {
        let id = LicenseChoice::License {
            license: License {
                id: Some("MIT".into()),
                ..Default::default()
            },
        };
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            r#"{"license":{"id":"MIT"}}"#
        );

        let expr = LicenseChoice::Expression {
            expression: "MIT OR Apache-2.0".into(),
        };
        assert_eq!(
            serde_json::to_string(&expr).unwrap(),
            r#"{"expression":"MIT OR Apache-2.0"}"#
        );
    }

    #[test]
    fn test_component_serializes_bom_ref_and_type() {
        let mut comp = Component::new(ComponentType::OperatingSystem, "alpine");
        comp.bom_ref = Some("apk/alpine@3.19".into());
        let json = serde_json::to_value(&comp).unwrap();
        assert_eq!(json["type"], "operating-system");
        assert_eq!(json["bom-ref"], "apk/alpine@3.19");
        assert!(json.get("licenses").is_none());
    }

    #[test]
    fn test_tools_accepts_both_shapes() {
        let modern: Tools =
            serde_json::from_str(r#"{"components":[{"type":"application","name":"syft"}]}"#)
                .unwrap();
        assert_eq!(modern.len(), 1);

        let legacy: Tools = serde_json::from_str(r#"[{"name":"syft","version":"1.0"}]"#).unwrap();
        assert!(matches!(legacy, Tools::Legacy(ref t) if t.len() == 1));
    }

    #[test]
    fn test_hash_algorithm_names() {
        let hash = Hash {
            alg: HashAlgorithm::Sha256,
            content: "abc".into(),
        };
        assert_eq!(
            serde_json::to_string(&hash).unwrap(),
            r#"{"alg":"SHA-256","content":"abc"}"#
        );
    }

    #[test]
    fn test_bom_version_defaults_to_one() {
        let bom: Bom =
            serde_json::from_str(r#"{"bomFormat":"CycloneDX","specVersion":"1.4"}"#).unwrap();
        assert_eq!(bom.version, 1);
        assert!(bom.components.is_empty());
    }
}
