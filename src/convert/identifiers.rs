//! Reference normalization and the SPDX-id to bom-ref table.
//!
//! A bom-ref is derived from the package URL when one is present, otherwise
//! from `name@version` or the bare name. The result is human-legible and
//! stable across runs for the same input.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::LazyLock;

use indexmap::IndexMap;
use packageurl::PackageUrl;
use regex::Regex;

use crate::model::spdx::SpdxPackage;

/// Characters that are not allowed in a reference, collapsed as runs.
static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\s\p{Cc}<>:"|\\?*]+"#).expect("static regex"));

static REPEATED_DASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("static regex"));

/// Replace unsafe runs with `-`, collapse repeated `-` and trim the ends.
#[must_use]
pub fn clean_ref(raw: &str) -> String {
    let replaced = UNSAFE_CHARS.replace_all(raw, "-");
    let collapsed = REPEATED_DASHES.replace_all(&replaced, "-");
    collapsed.trim_matches('-').to_string()
}

/// Reference for a package URL: `type/namespace/name@version`.
///
/// Qualifiers and subpath do not take part. A string that does not parse
/// as a package URL is cleaned as-is.
#[must_use]
pub fn purl_ref(purl: &str) -> String {
    let Ok(parsed) = PackageUrl::from_str(purl) else {
        tracing::debug!(purl, "malformed package URL, cleaning raw string");
        return clean_ref(purl);
    };

    let mut parts = vec![parsed.ty().to_string()];
    if let Some(namespace) = parsed.namespace().filter(|ns| !ns.is_empty()) {
        parts.push(namespace.to_string());
    }
    match parsed.version().filter(|v| !v.is_empty()) {
        Some(version) => parts.push(format!("{}@{version}", parsed.name())),
        None => parts.push(parsed.name().to_string()),
    }
    clean_ref(&parts.join("/"))
}

/// Reference for a package: purl first, then `name@version`, then `name`.
#[must_use]
pub fn package_ref(purl: Option<&str>, name: &str, version: Option<&str>) -> String {
    if let Some(purl) = purl.filter(|p| !p.trim().is_empty()) {
        return purl_ref(purl.trim());
    }
    match version {
        Some(version) => clean_ref(&format!("{name}@{version}")),
        None => clean_ref(name),
    }
}

/// Bom-refs for every package of a document, plus the SPDX-id lookup.
///
/// Refs are assigned per package position, so each package gets its own ref
/// even when the document repeats an SPDX id or leaves it out. When two
/// packages normalize to the same ref, later ones get a `-2`, `-3`, ...
/// suffix in document order. An id shared by several packages resolves to
/// the first of them.
#[derive(Debug, Clone, Default)]
pub struct RefTable {
    refs: Vec<String>,
    by_id: IndexMap<String, usize>,
}

impl RefTable {
    /// Build the table over every package of a document.
    #[must_use]
    pub fn build(packages: &[SpdxPackage]) -> Self {
        let mut refs = Vec::with_capacity(packages.len());
        let mut by_id = IndexMap::with_capacity(packages.len());
        let mut taken: HashSet<String> = HashSet::with_capacity(packages.len());

        for (index, pkg) in packages.iter().enumerate() {
            let spdx_id = pkg.spdx_id.trim();
            if spdx_id.is_empty() {
                tracing::debug!(index, "package without SPDX id");
            } else if by_id.contains_key(spdx_id) {
                tracing::debug!(spdx_id, index, "duplicate SPDX id, relationships use the first");
            } else {
                by_id.insert(spdx_id.to_string(), index);
            }

            let mut base = package_ref(pkg.purl_locator(), pkg.name(), pkg.version());
            if base.is_empty() {
                // Nameless package without purl: the SPDX id is all we have
                base = clean_ref(spdx_id);
            }
            if base.is_empty() {
                base = "component".to_string();
            }

            let mut candidate = base.clone();
            let mut suffix = 2;
            while taken.contains(&candidate) {
                candidate = format!("{base}-{suffix}");
                suffix += 1;
            }
            if candidate != base {
                tracing::debug!(spdx_id, base = %base, bom_ref = %candidate, "ref collision");
            }

            taken.insert(candidate.clone());
            refs.push(candidate);
        }

        Self { refs, by_id }
    }

    /// The ref of the package at `index` in document order.
    #[must_use]
    pub fn for_package(&self, index: usize) -> Option<&str> {
        self.refs.get(index).map(String::as_str)
    }

    /// The mapped ref, if the id belongs to a package.
    #[must_use]
    pub fn get(&self, spdx_id: &str) -> Option<&str> {
        self.by_id
            .get(spdx_id.trim())
            .and_then(|&index| self.for_package(index))
    }

    /// The mapped ref, or the raw id when the id is not a known package.
    #[must_use]
    pub fn resolve<'a>(&'a self, spdx_id: &'a str) -> &'a str {
        self.get(spdx_id).unwrap_or(spdx_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Iterate package refs in document order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.refs.iter().map(String::as_str)
    }
}
