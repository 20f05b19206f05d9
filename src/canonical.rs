//! Display-form type names.
//!
//! Metadata encodes a generic type's arity as a backtick followed by a decimal
//! count (`Map`2`). The canonical form swaps that suffix for an open generic
//! spelling (`Map<,>`), which doubles as the join key when comparing two type
//! inventories.

use std::borrow::Borrow;
use std::fmt;

/// Character that introduces a generic arity suffix in metadata names.
pub const ARITY_MARKER: char = '`';

/// Largest arity rendered as separators. Generic parameter numbers are 16-bit
/// in metadata; anything above keeps its digits instead (`T<70000>`).
pub const MAX_GENERIC_ARITY: u32 = u16::MAX as u32;

/// A type name in canonical display form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalTypeName(String);

impl CanonicalTypeName {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CanonicalTypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CanonicalTypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Convert a raw metadata type name into its canonical display form.
///
/// Every arity marker is replaced by a bracket pair holding `n - 1` commas,
/// where `n` is the digit run that follows the marker. A marker with no digits,
/// or an arity of one, renders as `<>`. An arity above [`MAX_GENERIC_ARITY`]
/// keeps its digit run between the brackets, so distinct arities never share a
/// canonical name. Characters outside arity suffixes are copied verbatim, so
/// names without a marker come back unchanged.
#[must_use]
pub fn canonicalize(raw: &str) -> CanonicalTypeName {
    let mut out = String::with_capacity(raw.len() + 2);
    let mut rest = raw;

    while let Some(marker) = rest.find(ARITY_MARKER) {
        out.push_str(&rest[..marker]);
        let after = &rest[marker + ARITY_MARKER.len_utf8()..];
        let digits_len = after
            .find(|ch: char| !ch.is_ascii_digit())
            .unwrap_or(after.len());
        push_arity(&mut out, &after[..digits_len]);
        rest = &after[digits_len..];
    }
    out.push_str(rest);

    CanonicalTypeName(out)
}

fn push_arity(out: &mut String, digits: &str) {
    out.push('<');
    match digits.parse::<u32>() {
        Ok(arity) if arity <= MAX_GENERIC_ARITY => {
            for _ in 1..arity {
                out.push(',');
            }
        }
        _ if digits.is_empty() => {}
        _ => out.push_str(digits.trim_start_matches('0')),
    }
    out.push('>');
}
