//! Package to component mapping.
//!
//! Everything SPDX says about a package that CycloneDX has a field for goes
//! into that field; the rest is carried as `spdx:`-namespaced properties so
//! no provenance is lost.

use crate::convert::identifiers::{clean_ref, RefTable};
use crate::convert::{license, purl};
use crate::model::cyclonedx::{
    Component, ComponentType, ExternalReference, Hash, HashAlgorithm, OrganizationalEntity,
    Property,
};
use crate::model::spdx::{asserted, is_sentinel, Creator, SpdxChecksum, SpdxPackage};

/// Property keys used for carried-through SPDX fields.
pub mod keys {
    pub const PACKAGE_IDENTIFIER: &str = "spdx:package:identifier";
    pub const SPDXID: &str = "spdx:spdxid";
    pub const DOWNLOAD_LOCATION: &str = "spdx:package:downloadLocation";
    pub const HOMEPAGE: &str = "spdx:package:homepage";
    pub const SOURCE_INFO: &str = "spdx:package:sourceInfo";
    pub const SUMMARY: &str = "spdx:package:summary";
    pub const DESCRIPTION: &str = "spdx:package:description";
    pub const COMMENT: &str = "spdx:package:comment";
    pub const COPYRIGHT_TEXT: &str = "spdx:package:copyrightText";
    pub const FILE_NAME: &str = "spdx:package:fileName";
    pub const RELEASE_DATE: &str = "spdx:package:releaseDate";
    pub const BUILT_DATE: &str = "spdx:package:builtDate";
    pub const VALID_UNTIL_DATE: &str = "spdx:package:validUntilDate";
    pub const VERIFICATION_CODE: &str = "spdx:package:verificationCode";
    pub const LICENSE_COMMENTS: &str = "spdx:package:licenseComments";
    pub const PRIMARY_PURPOSE: &str = "spdx:package:primaryPackagePurpose";
    pub const ATTRIBUTION_TEXT: &str = "spdx:package:attributionText";
}

/// Maps SPDX packages to CycloneDX components against a finished ref table.
pub struct ComponentMapper<'a> {
    refs: &'a RefTable,
}

impl<'a> ComponentMapper<'a> {
    #[must_use]
    pub const fn new(refs: &'a RefTable) -> Self {
        Self { refs }
    }

    /// Map the package at `index`. Never fails; missing fields are simply left out.
    #[must_use]
    pub fn map(&self, index: usize, pkg: &SpdxPackage) -> Component {
        let mut component = Component::new(
            component_type(pkg.primary_package_purpose.as_deref()),
            pkg.name().trim(),
        );
        component.bom_ref = Some(
            self.refs
                .for_package(index)
                .map_or_else(|| clean_ref(&pkg.spdx_id), str::to_string),
        );
        component.version = pkg.version().map(str::to_string);

        component.purl = purl::resolve(pkg);
        component.group = component.purl.as_deref().and_then(purl::scoped_group);

        component.description = asserted(pkg.description.as_deref())
            .or_else(|| asserted(pkg.summary.as_deref()))
            .map(str::to_string);
        component.licenses = license::map_licenses(pkg);
        component.supplier = supplier(pkg);
        component.hashes = pkg.checksums.iter().filter_map(map_checksum).collect();
        component.copyright = asserted(pkg.copyright_text.as_deref()).map(str::to_string);
        component.external_references = external_references(pkg);
        component.properties = properties(pkg);

        component
    }
}

/// Component type from `primaryPackagePurpose`; library when absent or unmapped.
#[must_use]
pub fn component_type(purpose: Option<&str>) -> ComponentType {
    let Some(purpose) = purpose else {
        return ComponentType::Library;
    };
    match purpose.trim().to_ascii_uppercase().replace('_', "-").as_str() {
        "APPLICATION" => ComponentType::Application,
        "FRAMEWORK" => ComponentType::Framework,
        "LIBRARY" => ComponentType::Library,
        "CONTAINER" => ComponentType::Container,
        "OPERATING-SYSTEM" => ComponentType::OperatingSystem,
        "DEVICE" => ComponentType::Device,
        "FIRMWARE" => ComponentType::Firmware,
        "FILE" => ComponentType::File,
        _ => ComponentType::Library,
    }
}

/// Supplier name, preferring `supplier` over `originator`.
#[must_use]
pub fn supplier(pkg: &SpdxPackage) -> Option<OrganizationalEntity> {
    [pkg.supplier.as_deref(), pkg.originator.as_deref()]
        .into_iter()
        .flatten()
        .find_map(entity_name)
        .map(OrganizationalEntity::named)
}

/// Name part of an SPDX entity string, without kind prefix or email.
fn entity_name(raw: &str) -> Option<String> {
    if let Some(creator) = Creator::parse(raw) {
        return Some(creator.name);
    }
    let name = match raw.rfind('(') {
        Some(open) if raw.trim_end().ends_with(')') => &raw[..open],
        _ => raw,
    };
    let name = name.trim();
    // A kind prefix that Creator::parse rejected is either unknown or a sentinel
    let name = name
        .split_once(':')
        .filter(|(kind, _)| matches!(kind.trim(), "Tool" | "Person" | "Organization"))
        .map_or(name, |(_, rest)| rest.trim());
    (!is_sentinel(name)).then(|| name.to_string())
}

/// Translate a checksum; unknown algorithms are dropped.
#[must_use]
pub fn map_checksum(checksum: &SpdxChecksum) -> Option<Hash> {
    let alg = match checksum.algorithm.trim().to_ascii_uppercase().replace('-', "").as_str() {
        "SHA1" => HashAlgorithm::Sha1,
        "SHA256" => HashAlgorithm::Sha256,
        "SHA512" => HashAlgorithm::Sha512,
        "MD5" => HashAlgorithm::Md5,
        other => {
            tracing::debug!(algorithm = other, "dropping checksum with unsupported algorithm");
            return None;
        }
    };
    let content = checksum.checksum_value.trim();
    if content.is_empty() {
        return None;
    }
    Some(Hash {
        alg,
        content: content.to_string(),
    })
}

fn external_references(pkg: &SpdxPackage) -> Vec<ExternalReference> {
    let mut refs = Vec::new();
    if let Some(url) = asserted(pkg.download_location.as_deref()) {
        refs.push(ExternalReference {
            ref_type: "distribution".to_string(),
            url: url.to_string(),
            comment: None,
        });
    }
    if let Some(url) = asserted(pkg.homepage.as_deref()) {
        refs.push(ExternalReference {
            ref_type: "website".to_string(),
            url: url.to_string(),
            comment: None,
        });
    }
    refs
}

/// Provenance properties: identifier and SPDX id always, the rest when asserted.
#[must_use]
pub fn properties(pkg: &SpdxPackage) -> Vec<Property> {
    let identifier = match pkg.version() {
        Some(version) => format!("{}@{version}", pkg.name()),
        None => pkg.name().to_string(),
    };
    let mut props = vec![
        Property::new(keys::PACKAGE_IDENTIFIER, identifier),
        Property::new(keys::SPDXID, pkg.spdx_id.as_str()),
    ];

    let verification_code = pkg
        .package_verification_code
        .as_ref()
        .map(|code| code.package_verification_code_value.as_str());

    let optional = [
        (keys::DOWNLOAD_LOCATION, pkg.download_location.as_deref()),
        (keys::HOMEPAGE, pkg.homepage.as_deref()),
        (keys::SOURCE_INFO, pkg.source_info.as_deref()),
        (keys::SUMMARY, pkg.summary.as_deref()),
        (keys::DESCRIPTION, pkg.description.as_deref()),
        (keys::COMMENT, pkg.comment.as_deref()),
        (keys::COPYRIGHT_TEXT, pkg.copyright_text.as_deref()),
        (keys::FILE_NAME, pkg.package_file_name.as_deref()),
        (keys::RELEASE_DATE, pkg.release_date.as_deref()),
        (keys::BUILT_DATE, pkg.built_date.as_deref()),
        (keys::VALID_UNTIL_DATE, pkg.valid_until_date.as_deref()),
        (keys::VERIFICATION_CODE, verification_code),
        (keys::LICENSE_COMMENTS, pkg.license_comments.as_deref()),
        (keys::PRIMARY_PURPOSE, pkg.primary_package_purpose.as_deref()),
    ];
    props.extend(
        optional
            .into_iter()
            .filter_map(|(key, value)| asserted(value).map(|v| Property::new(key, v))),
    );

    props.extend(
        pkg.attribution_texts
            .iter()
            .filter_map(|text| asserted(Some(text.as_str())))
            .enumerate()
            .map(|(i, text)| Property::new(format!("{}:{i}", keys::ATTRIBUTION_TEXT), text)),
    );

    props
}
