use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// ASCII identifier fragment for a gloss: diacritics dropped, lower-cased,
/// everything but `[a-z0-9]` removed.
///
/// `"Hand (of body)"` → `"handofbody"`, `"árbol"` → `"arbol"`.
pub fn slug(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}
