use std::num::NonZeroU32;

pub type Int = i64;
pub type UInt = u32;
pub type NonZeroUInt = NonZeroU32;

pub type Float = f64;

/// An ordered collection that can never be empty.
pub type NonEmpty<T> = vec1::Vec1<T>;

/// The characters a token is split on, each becoming a token of its own.
pub const LEFT_SEP: &str = "[";
pub const RIGHT_SEP: &str = "]";
pub const COMMA_SEP: &str = ",";

/// Word characters as used by labels, table keys and tag names.
pub(crate) fn is_word(s: &str) -> bool {
    s.chars().all(|c| c.is_alphanumeric() || c == '_')
}
