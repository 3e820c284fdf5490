//! SPDX license identifier table.
//!
//! The `license` field of a CFF document must be a recognized SPDX short
//! identifier. The table below covers the identifiers that appear in
//! practice for research software; matching is case-sensitive, as SPDX
//! identifiers are.

/// Recognized SPDX license identifiers, sorted for binary search.
static SPDX_IDENTIFIERS: &[&str] = &[
    "0BSD",
    "AFL-3.0",
    "AGPL-1.0-only",
    "AGPL-1.0-or-later",
    "AGPL-3.0-only",
    "AGPL-3.0-or-later",
    "Apache-1.1",
    "Apache-2.0",
    "Artistic-1.0",
    "Artistic-2.0",
    "BSD-1-Clause",
    "BSD-2-Clause",
    "BSD-2-Clause-Patent",
    "BSD-3-Clause",
    "BSD-3-Clause-Clear",
    "BSD-4-Clause",
    "BSL-1.0",
    "CC-BY-3.0",
    "CC-BY-4.0",
    "CC-BY-NC-4.0",
    "CC-BY-NC-SA-4.0",
    "CC-BY-SA-4.0",
    "CC0-1.0",
    "CDDL-1.0",
    "CDDL-1.1",
    "CECILL-2.1",
    "CECILL-B",
    "CECILL-C",
    "ECL-2.0",
    "EPL-1.0",
    "EPL-2.0",
    "EUPL-1.1",
    "EUPL-1.2",
    "GFDL-1.3-only",
    "GFDL-1.3-or-later",
    "GPL-1.0-only",
    "GPL-1.0-or-later",
    "GPL-2.0-only",
    "GPL-2.0-or-later",
    "GPL-3.0-only",
    "GPL-3.0-or-later",
    "ISC",
    "LGPL-2.0-only",
    "LGPL-2.0-or-later",
    "LGPL-2.1-only",
    "LGPL-2.1-or-later",
    "LGPL-3.0-only",
    "LGPL-3.0-or-later",
    "LPPL-1.3c",
    "MIT",
    "MIT-0",
    "MPL-1.1",
    "MPL-2.0",
    "MS-PL",
    "MS-RL",
    "NCSA",
    "ODC-By-1.0",
    "ODbL-1.0",
    "OFL-1.1",
    "OSL-3.0",
    "PDDL-1.0",
    "PSF-2.0",
    "Python-2.0",
    "UPL-1.0",
    "Unlicense",
    "Vim",
    "W3C",
    "WTFPL",
    "Zlib",
];

// Deprecated short forms that still show up in older citation files. They
// are rejected, but the suggestion machinery maps them to a current id.
static DEPRECATED_ALIASES: &[(&str, &str)] = &[
    ("AGPL-3.0", "AGPL-3.0-only"),
    ("GPL-2.0", "GPL-2.0-only"),
    ("GPL-3.0", "GPL-3.0-only"),
    ("LGPL-2.1", "LGPL-2.1-only"),
    ("LGPL-3.0", "LGPL-3.0-only"),
];

/// Returns `true` if `license` is a recognized SPDX identifier.
///
/// # Examples
///
/// ```
/// use cffkit_core::is_valid_license;
///
/// assert!(is_valid_license("Apache-2.0"));
/// assert!(!is_valid_license("Not-A-License"));
/// assert!(!is_valid_license("apache-2.0")); // case-sensitive
/// ```
pub fn is_valid_license(license: &str) -> bool {
    SPDX_IDENTIFIERS.binary_search(&license).is_ok()
}

/// Suggests a recognized identifier for an invalid license token.
///
/// Handles the two common mistakes: wrong casing and deprecated short
/// forms without an `-only`/`-or-later` suffix.
///
/// # Examples
///
/// ```
/// use cffkit_core::suggest_license;
///
/// assert_eq!(suggest_license("apache-2.0"), Some("Apache-2.0"));
/// assert_eq!(suggest_license("GPL-3.0"), Some("GPL-3.0-only"));
/// assert_eq!(suggest_license("Not-A-License"), None);
/// ```
pub fn suggest_license(license: &str) -> Option<&'static str> {
    for (alias, replacement) in DEPRECATED_ALIASES {
        if license.eq_ignore_ascii_case(alias) {
            return Some(replacement);
        }
    }
    SPDX_IDENTIFIERS
        .iter()
        .find(|id| id.eq_ignore_ascii_case(license))
        .copied()
}
