//! Package URL recovery and synthesis.
//!
//! Packages that already carry a package-manager purl keep it. Everything
//! else gets a purl synthesized from ecosystem hints in the external
//! references, the Alpine `-rN` release suffix, or the `generic` type.

use std::str::FromStr;
use std::sync::LazyLock;

use packageurl::PackageUrl;
use regex::Regex;

use crate::model::spdx::SpdxPackage;

static ALPINE_RELEASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-r\d+$").expect("static regex"));

/// Package ecosystems the converter can recognise from SPDX hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ecosystem {
    Npm,
    Maven,
    Nuget,
    PyPi,
    RubyGems,
    Cargo,
    Apk,
    Generic,
}

impl Ecosystem {
    /// The purl type for this ecosystem.
    #[must_use]
    pub const fn purl_type(self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Maven => "maven",
            Self::Nuget => "nuget",
            Self::PyPi => "pypi",
            Self::RubyGems => "gem",
            Self::Cargo => "cargo",
            Self::Apk => "apk",
            Self::Generic => "generic",
        }
    }

    /// Map an external reference type to an ecosystem.
    fn from_reference_type(reference_type: &str) -> Option<Self> {
        match reference_type.trim().to_ascii_lowercase().as_str() {
            "npm" => Some(Self::Npm),
            "maven-central" | "maven" => Some(Self::Maven),
            "nuget" => Some(Self::Nuget),
            "pypi" => Some(Self::PyPi),
            "gem" => Some(Self::RubyGems),
            "cargo" => Some(Self::Cargo),
            _ => None,
        }
    }

    /// Detect the ecosystem of a package without an explicit purl.
    #[must_use]
    pub fn detect(pkg: &SpdxPackage) -> Self {
        if let Some(eco) = pkg
            .external_refs
            .iter()
            .find_map(|r| Self::from_reference_type(&r.reference_type))
        {
            return eco;
        }
        if pkg.version().is_some_and(|v| ALPINE_RELEASE.is_match(v)) {
            return Self::Apk;
        }
        Self::Generic
    }
}

/// Split an npm-style scoped name `@scope/name` into `(Some(scope), name)`.
#[must_use]
pub fn split_scoped_name(name: &str) -> (Option<&str>, &str) {
    if let Some(scoped) = name.strip_prefix('@') {
        if let Some((scope, rest)) = scoped.split_once('/') {
            if !scope.is_empty() && !rest.is_empty() {
                return (Some(scope), rest);
            }
        }
    }
    (None, name)
}

/// Build a purl string from its parts.
///
/// Returns `None` for an empty name or parts the purl grammar rejects.
#[must_use]
pub fn synthesize(
    ecosystem: Ecosystem,
    namespace: Option<&str>,
    name: &str,
    version: Option<&str>,
) -> Option<String> {
    if name.trim().is_empty() {
        return None;
    }
    let mut purl = PackageUrl::new(ecosystem.purl_type(), name).ok()?;
    if let Some(namespace) = namespace {
        purl.with_namespace(namespace);
    }
    if let Some(version) = version {
        purl.with_version(version);
    }
    Some(purl.to_string())
}

/// Resolve the purl for a package: the explicit one, else a synthesized one.
#[must_use]
pub fn resolve(pkg: &SpdxPackage) -> Option<String> {
    if let Some(explicit) = pkg.purl_locator().filter(|p| !p.is_empty()) {
        return Some(explicit.to_string());
    }

    let ecosystem = Ecosystem::detect(pkg);
    let (namespace, name) = split_scoped_name(pkg.name().trim());
    let purl = synthesize(ecosystem, namespace, name, pkg.version());
    if purl.is_none() {
        tracing::debug!(spdx_id = %pkg.spdx_id, "no package URL could be synthesized");
    }
    purl
}

/// Component group: the namespace of a scoped purl (`@scope` or `%40scope`).
///
/// npm namespaces are always scopes; other ecosystems only count when the
/// namespace is explicitly scoped.
#[must_use]
pub fn scoped_group(purl: &str) -> Option<String> {
    let parsed = PackageUrl::from_str(purl).ok()?;
    let namespace = parsed.namespace().filter(|ns| !ns.is_empty())?;

    let stripped = namespace
        .strip_prefix('@')
        .or_else(|| namespace.strip_prefix("%40"));
    match stripped {
        Some(scope) => Some(scope.to_string()),
        None if parsed.ty().eq_ignore_ascii_case("npm") => Some(namespace.to_string()),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::spdx::SpdxExternalRef;

    fn pkg(name: &str, version: Option<&str>) -> SpdxPackage {
        SpdxPackage {
            spdx_id: "SPDXRef-pkg".into(),
            name: Some(name.into()),
            version_info: version.map(str::to_string),
            ..SpdxPackage::default()
        }
    }

    fn hint(reference_type: &str, locator: &str) -> SpdxExternalRef {
        SpdxExternalRef {
            reference_category: "PACKAGE-MANAGER".into(),
            reference_type: reference_type.into(),
            reference_locator: locator.into(),
            comment: None,
        }
    }

    #[test]
    fn test_explicit_purl_wins() {
        let mut p = pkg("lib", Some("2.0"));
        p.external_refs.push(hint("purl", "pkg:npm/lib@2.0"));
        assert_eq!(resolve(&p).as_deref(), Some("pkg:npm/lib@2.0"));
    }

    #[test]
    fn test_scoped_npm_synthesis() {
        let mut p = pkg("@myorg/pkg", Some("1.0.0"));
        p.external_refs.push(hint("npm", "@myorg/pkg@1.0.0"));
        let purl = resolve(&p).unwrap();
        let parsed = PackageUrl::from_str(&purl).unwrap();
        assert_eq!(parsed.ty(), "npm");
        assert_eq!(parsed.namespace(), Some("myorg"));
        assert_eq!(parsed.name(), "pkg");
        assert_eq!(parsed.version(), Some("1.0.0"));
        assert_eq!(scoped_group(&purl).as_deref(), Some("myorg"));
    }

    #[test]
    fn test_alpine_detection() {
        let p = pkg("musl", Some("1.2.3-r4"));
        assert_eq!(Ecosystem::detect(&p), Ecosystem::Apk);
        assert!(resolve(&p).unwrap().starts_with("pkg:apk/musl@"));
    }

    #[test]
    fn test_ecosystem_hints() {
        let mut p = pkg("commons-lang3", Some("3.12.0"));
        p.external_refs.push(hint("maven-central", "org.apache:commons-lang3:3.12.0"));
        assert_eq!(Ecosystem::detect(&p), Ecosystem::Maven);

        let mut p = pkg("serde", Some("1.0.0"));
        p.external_refs.push(hint("cargo", "serde@1.0.0"));
        assert_eq!(Ecosystem::detect(&p), Ecosystem::Cargo);
    }

    #[test]
    fn test_generic_fallback() {
        let p = pkg("thing", Some("1.0"));
        assert_eq!(resolve(&p).as_deref(), Some("pkg:generic/thing@1.0"));

        let p = pkg("thing", Some("NOASSERTION"));
        assert_eq!(resolve(&p).as_deref(), Some("pkg:generic/thing"));
    }

    #[test]
    fn test_empty_name_has_no_purl() {
        assert_eq!(resolve(&pkg("", Some("1.0"))), None);
        assert_eq!(resolve(&SpdxPackage::default()), None);
    }

    #[test]
    fn test_split_scoped_name() {
        assert_eq!(split_scoped_name("@scope/name"), (Some("scope"), "name"));
        assert_eq!(split_scoped_name("plain"), (None, "plain"));
        assert_eq!(split_scoped_name("@/name"), (None, "@/name"));
        assert_eq!(split_scoped_name("@scope"), (None, "@scope"));
    }

    #[test]
    fn test_scoped_group() {
        assert_eq!(
            scoped_group("pkg:npm/%40angular/core@17.0.0").as_deref(),
            Some("angular")
        );
        assert_eq!(
            scoped_group("pkg:npm/myorg/pkg@1.0.0").as_deref(),
            Some("myorg")
        );
        assert_eq!(scoped_group("pkg:maven/org.apache/commons@1.0"), None);
        assert_eq!(scoped_group("pkg:npm/lodash@4.17.21"), None);
        assert_eq!(scoped_group("garbage"), None);
    }
}
