//! Document models for both sides of the conversion.
//!
//! [`spdx`] describes the source document as it is read, [`cyclonedx`] the
//! target document as it is written. The two are deliberately independent:
//! nothing in one module refers to the other, and all translation lives in
//! [`crate::convert`].

pub mod cyclonedx;
pub mod spdx;

pub use cyclonedx::{
    Bom, Component, ComponentType, Dependency, ExternalReference, Hash, HashAlgorithm, License,
    LicenseChoice, Metadata, OrganizationalContact, OrganizationalEntity, Property, Tools,
};
pub use spdx::{
    Creator, CreatorKind, RelationshipType, SpdxChecksum, SpdxCreationInfo, SpdxDocument,
    SpdxExternalRef, SpdxPackage, SpdxRelationship,
};
