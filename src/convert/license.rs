//! License selection and classification.

use crate::model::cyclonedx::{License, LicenseChoice};
use crate::model::spdx::{asserted, SpdxPackage};

/// Markers that make a license string a compound expression.
const EXPRESSION_MARKERS: [&str; 5] = [" AND ", " OR ", " WITH ", "(", ")"];

/// Whether the license string must be carried as an expression.
#[must_use]
pub fn is_expression(license: &str) -> bool {
    EXPRESSION_MARKERS.iter().any(|m| license.contains(m))
}

/// Pick the effective license string: declared first, then concluded.
#[must_use]
pub fn effective_license(pkg: &SpdxPackage) -> Option<&str> {
    asserted(pkg.license_declared.as_deref()).or_else(|| asserted(pkg.license_concluded.as_deref()))
}

/// Translate one license string into a CycloneDX license entry.
///
/// Known SPDX ids are canonicalised; anything else (including
/// `LicenseRef-` references) becomes a named license.
#[must_use]
pub fn license_choice(license: &str) -> LicenseChoice {
    let license = license.trim();
    if is_expression(license) {
        if spdx::Expression::parse_mode(license, spdx::ParseMode::LAX).is_err() {
            tracing::debug!(license, "license expression does not parse, keeping verbatim");
        }
        return LicenseChoice::Expression {
            expression: license.to_string(),
        };
    }

    let entry = match spdx::license_id(license) {
        Some(id) => License {
            id: Some(id.name.to_string()),
            ..License::default()
        },
        None => {
            tracing::debug!(license, "not an SPDX license id, emitting as name");
            License {
                name: Some(license.to_string()),
                ..License::default()
            }
        }
    };
    LicenseChoice::License { license: entry }
}

/// Licenses for a package: at most one entry, by precedence.
#[must_use]
pub fn map_licenses(pkg: &SpdxPackage) -> Vec<LicenseChoice> {
    effective_license(pkg)
        .map(license_choice)
        .into_iter()
        .collect()
}
