//! Literal anchor matching around labeled values.

use super::FieldExtractor;

/// Strip `prefix` and `suffix` from `s`.
///
/// Succeeds only when `s` literally starts with `prefix` and ends with `suffix`
/// (without the two overlapping).
pub fn remove_prefix_suffix<'a>(s: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    s.strip_prefix(prefix)?.strip_suffix(suffix)
}

/// Text between the first `before` and the next `after`.
///
/// With an empty `after` everything following `before` is returned.
pub fn substring_between<'a>(s: &'a str, before: &str, after: &str) -> Option<&'a str> {
    let start = s.find(before)? + before.len();
    let rest = &s[start..];
    if after.is_empty() {
        return Some(rest);
    }
    let end = rest.find(after)?;
    Some(&rest[..end])
}

/// Declarative description of how a value is anchored in its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Whole cell is `prefix` + value + `suffix`.
    PrefixSuffix {
        prefix: &'static str,
        suffix: &'static str,
    },
    /// Value sits between `before` and `after` anywhere in the cell.
    Between {
        before: &'static str,
        after: &'static str,
    },
}

impl Anchor {
    /// Apply the anchor to raw text.
    pub fn apply<'a>(&self, text: &'a str) -> Option<&'a str> {
        match *self {
            Anchor::PrefixSuffix { prefix, suffix } => remove_prefix_suffix(text, prefix, suffix),
            Anchor::Between { before, after } => substring_between(text, before, after),
        }
    }
}

impl FieldExtractor for Anchor {
    type Output = String;

    /// Cells are trimmed before matching and the value after it.
    fn extract(&self, text: &str) -> Option<String> {
        self.apply(text.trim()).map(|value| value.trim().to_string())
    }
}
