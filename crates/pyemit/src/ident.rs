//! Identifier grammar: sanitizing raw text into legal Python identifiers
//! and converting between naming styles.

use std::sync::LazyLock;

use ahash::AHashSet;

/// The Python 3 hard keywords. Soft keywords (`match`, `case`, `type`)
/// are legal identifiers and are deliberately not listed.
pub static RESERVED_WORDS: LazyLock<AHashSet<&'static str>> = LazyLock::new(|| {
    [
        "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
        "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
        "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
        "try", "while", "with", "yield",
    ]
    .into_iter()
    .collect()
});

#[must_use]
pub fn is_reserved(text: &str) -> bool {
    RESERVED_WORDS.contains(text)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// True when `text` is already a legal identifier, reserved or not.
#[must_use]
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if is_ident_start(c) => chars.all(is_ident_continue),
        _ => false,
    }
}

/// Turns arbitrary text into a legal, non-reserved identifier.
///
/// Characters outside `[A-Za-z0-9_]` become `_`, a leading digit gets an
/// underscore prefix, empty input becomes `x`, and reserved words get a
/// trailing underscore. Idempotent: applying it twice changes nothing.
#[must_use]
pub fn safe_identifier(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        out.push(if is_ident_continue(c) { c } else { '_' });
    }
    if out.is_empty() {
        out.push('x');
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    avoid_reserved(out)
}

/// Appends a trailing underscore when `name` collides with a keyword.
#[must_use]
pub fn avoid_reserved(name: String) -> String {
    if is_reserved(&name) {
        let mut name = name;
        name.push('_');
        name
    } else {
        name
    }
}

/// True when `text` could plausibly be imported: a legal identifier that
/// is not a keyword. Used to filter free-variable candidates.
#[must_use]
pub fn looks_exportable(text: &str) -> bool {
    is_identifier(text) && !is_reserved(text)
}

/// Converts camel case to snake case; text already in snake case passes
/// through unchanged. Used for value names; type names keep their casing.
#[must_use]
pub fn pythonize(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_ascii_lowercase() || chars[i - 1].is_ascii_digit());
            let next_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            let prev_underscore = i > 0 && chars[i - 1] == '_';
            if i > 0 && !prev_underscore && (prev_lower || next_lower) {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Styles a module path segment: snake-cased, sanitized, collision-safe.
#[must_use]
pub fn safe_module_file_name(segment: &str) -> String {
    safe_identifier(&pythonize(segment))
}

/// Names an exported test function. The triple underscore keeps the
/// prefix unambiguous when the styled name itself starts with `test`,
/// and external runners discover tests by the plain `test` prefix.
#[must_use]
pub fn test_function_name(base: &str) -> String {
    format!("test___{}", safe_identifier(&pythonize(base)))
}
