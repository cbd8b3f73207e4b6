//! Dotted identifiers for module references and decorator names.
//!
//! A dotted identifier is a run of leading relative dots followed by one
//! or more module name parts, e.g. `..pkg.mod` or `typing`.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::token::TokenSink;

/// One part of a [`DottedIdentifier`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiPart {
    /// A leading `.` marking one level of relative ascent.
    RelDot,
    /// A module name segment.
    Module(String),
}

impl DiPart {
    fn text(&self) -> &str {
        match self {
            Self::RelDot => ".",
            Self::Module(name) => name,
        }
    }
}

/// Direction of descent from one module path toward another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descent {
    /// The target continues below this path through the named child.
    Into(String),
    /// The target is this path.
    Same,
    /// The target is not below this path.
    None,
}

/// A (possibly relative) dotted module reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DottedIdentifier {
    parts: Vec<DiPart>,
}

impl DottedIdentifier {
    /// Builds from parts.
    ///
    /// # Panics
    ///
    /// Panics when no module part is present, or when a relative dot
    /// follows a module part.
    #[must_use]
    pub fn new(parts: Vec<DiPart>) -> Self {
        let mut seen_module = false;
        for part in &parts {
            match part {
                DiPart::Module(_) => seen_module = true,
                DiPart::RelDot => {
                    assert!(!seen_module, "relative dots must lead the identifier");
                }
            }
        }
        assert!(seen_module, "dotted identifier needs at least one module part");
        Self { parts }
    }

    /// Builds an absolute identifier from plain name segments.
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn dotted<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(segments.into_iter().map(|s| DiPart::Module(s.into())).collect())
    }

    /// Parses text such as `..pkg.mod` or `typing`.
    ///
    /// # Panics
    ///
    /// Panics on malformed text (empty segment, trailing dot after a
    /// module part).
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut parts = Vec::new();
        let mut rest = text;
        while let Some(stripped) = rest.strip_prefix('.') {
            parts.push(DiPart::RelDot);
            rest = stripped;
        }
        if !rest.is_empty() {
            for segment in rest.split('.') {
                assert!(crate::ident::is_identifier(segment), "bad module segment {segment:?} in {text:?}");
                parts.push(DiPart::Module(segment.to_owned()));
            }
        }
        Self::new(parts)
    }

    /// Builds from file path segments, snake-styling each and eliding a
    /// trailing `__init__` segment.
    #[must_use]
    pub fn from_path<'a, I>(segments: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::new(
            segments
                .into_iter()
                .filter(|s| *s != "__init__")
                .map(|s| DiPart::Module(crate::ident::safe_module_file_name(s)))
                .collect(),
        )
    }

    #[must_use]
    pub fn is_relative(&self) -> bool {
        matches!(self.parts.first(), Some(DiPart::RelDot))
    }

    /// The module name segments, relative dots excluded.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|p| match p {
            DiPart::Module(name) => Some(name.as_str()),
            DiPart::RelDot => None,
        })
    }

    /// When this identifier is a single plain part, returns it.
    #[must_use]
    pub fn as_simple_name(&self) -> Option<&str> {
        match self.parts.as_slice() {
            [DiPart::Module(name)] => Some(name),
            _ => None,
        }
    }

    /// Extends with one more name segment.
    #[must_use]
    pub fn dot(&self, name: impl Into<String>) -> Self {
        let mut parts = self.parts.clone();
        parts.push(DiPart::Module(name.into()));
        Self { parts }
    }

    /// Given this is `foo.bar` and `target` is `foo.bar.qux.wat`, finds
    /// the next level of descent (`qux`).
    #[must_use]
    pub fn find(&self, target: &Self) -> Descent {
        let mut mine = self.parts.iter();
        let mut theirs = target.parts.iter();
        loop {
            match (mine.next(), theirs.next()) {
                (Some(DiPart::Module(a)), Some(DiPart::Module(b))) if a == b => {}
                (Some(_), Some(_)) | (Some(_), None) => return Descent::None,
                (None, Some(DiPart::Module(next))) => return Descent::Into(next.clone()),
                (None, Some(DiPart::RelDot)) => return Descent::None,
                (None, None) => return Descent::Same,
            }
        }
    }

    pub fn render_to(&self, sink: &mut dyn TokenSink) {
        let mut needs_dot = false;
        for part in &self.parts {
            match part {
                // Leading dots glue only to the following name; a `Both`
                // dot would also swallow the space after `from`.
                DiPart::RelDot => sink.token(
                    ".",
                    crate::token::TokenKind::Punctuation,
                    crate::token::TokenAssoc::Right,
                ),
                DiPart::Module(name) => {
                    if needs_dot {
                        sink.token(
                            ".",
                            crate::token::TokenKind::Punctuation,
                            crate::token::TokenAssoc::Both,
                        );
                    }
                    needs_dot = true;
                    sink.name(name);
                }
            }
        }
    }
}

impl fmt::Display for DottedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut prior = "";
        for part in &self.parts {
            f.write_str(prior)?;
            f.write_str(part.text())?;
            prior = match part {
                DiPart::RelDot => "",
                DiPart::Module(_) => ".",
            };
        }
        Ok(())
    }
}

impl Ord for DottedIdentifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

impl PartialOrd for DottedIdentifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        for text in ["typing", "pkg.sub.mod", ".sibling", "..up.two"] {
            assert_eq!(DottedIdentifier::parse(text).to_string(), text);
        }
    }

    #[test]
    #[should_panic(expected = "at least one module part")]
    fn rejects_bare_dots() {
        let _ = DottedIdentifier::parse("..");
    }

    #[test]
    #[should_panic(expected = "relative dots must lead")]
    fn rejects_interior_relative_dots() {
        let _ = DottedIdentifier::new(vec![
            DiPart::Module("a".into()),
            DiPart::RelDot,
            DiPart::Module("b".into()),
        ]);
    }

    #[test]
    fn descent() {
        let base = DottedIdentifier::dotted(["foo", "bar"]);
        let deep = DottedIdentifier::dotted(["foo", "bar", "qux", "wat"]);
        assert_eq!(base.find(&deep), Descent::Into("qux".into()));
        assert_eq!(base.find(&base.clone()), Descent::Same);
        assert_eq!(deep.find(&base), Descent::None);
        assert_eq!(base.find(&DottedIdentifier::dotted(["foo", "baz"])), Descent::None);
    }

    #[test]
    fn from_path_elides_init_and_styles_segments() {
        let id = DottedIdentifier::from_path(["MyPkg", "SomeMod", "__init__"]);
        assert_eq!(id.to_string(), "my_pkg.some_mod");
    }

    #[test]
    fn simple_name() {
        assert_eq!(DottedIdentifier::parse("mod").as_simple_name(), Some("mod"));
        assert_eq!(DottedIdentifier::parse("a.b").as_simple_name(), None);
        assert_eq!(DottedIdentifier::parse(".a").as_simple_name(), None);
    }
}
