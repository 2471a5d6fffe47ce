use std::sync::OnceLock;

use regex::Regex;

fn qualifier_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:_[A-Z]+)+$").expect("static regex"))
}

/// Canonical variety name: trailing `_XYZ` dialect/source qualifiers are
/// removed, so `Mixtec_A` and `Mixtec_SM` both become `Mixtec`.
///
/// A name that consists only of a qualifier is returned unchanged.
pub fn canonical_language_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = qualifier_suffix().replace(trimmed, "");
    if stripped.is_empty() {
        trimmed.to_string()
    } else {
        stripped.into_owned()
    }
}
