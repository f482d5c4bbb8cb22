//! Hierarchical primary-key value type for the SIS engine.
//!
//! A [`Pk`] mimics a directory hierarchy: an ordered, non-empty sequence of
//! non-empty string segments. It is a plain value type — constructors never
//! mutate their inputs, and [`Pk::prefix`]/[`Pk::suffix`] return new values.
//!
//! Ported from the Go prototype's `internal/pk` package (`PK []string` with
//! `Prefix`/`Suffix` built on `slices.Concat`), with one addition: segments
//! are validated at construction time to reject characters that would make a
//! serialised-path comparison ambiguous (see `spec.md` §9, Open Question 2).

#![deny(unsafe_code)]

use std::fmt;

use serde::de::{Deserializer, Error as DeError};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

/// Characters forbidden inside a single segment, since they could be mistaken
/// for the path separator when a `Pk` is serialised to a string and compared.
const FORBIDDEN_IN_SEGMENT: [char; 2] = ['/', '\\'];

/// Errors raised when constructing or validating a [`Pk`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PkError {
    /// The path (or segment list) had no segments at all.
    #[error("pk must have at least one segment")]
    Empty,
    /// A segment was the empty string.
    #[error("pk segment {index} is empty")]
    EmptySegment {
        /// Index of the offending segment.
        index: usize,
    },
    /// A segment contained a character that could be confused with a path separator.
    #[error("pk segment {index} ({segment:?}) contains a forbidden separator character")]
    ForbiddenCharacter {
        /// Index of the offending segment.
        index: usize,
        /// The offending segment's contents.
        segment: String,
    },
}

/// An ordered sequence of non-empty path segments.
///
/// `Pk` is cheap to clone and compares by segment, not by any serialised
/// form — two `Pk`s are equal iff their segment vectors are equal.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Pk(Vec<String>);

impl Pk {
    /// Parse a delimited path using `/` as the segment separator.
    ///
    /// # Errors
    ///
    /// Returns [`PkError::Empty`] for an empty string, or
    /// [`PkError::EmptySegment`]/[`PkError::ForbiddenCharacter`] if any
    /// resulting segment is invalid.
    pub fn parse(path: &str) -> Result<Self, PkError> {
        Self::parse_with_separator(path, '/')
    }

    /// Parse a delimited path using an arbitrary single-character separator.
    ///
    /// Mirrors `pk.New` in the Go prototype, which split on
    /// `os.PathSeparator`; any consistent, non-empty single character works
    /// as long as it is used consistently within a deployment.
    ///
    /// # Errors
    ///
    /// Same as [`Pk::parse`].
    pub fn parse_with_separator(path: &str, separator: char) -> Result<Self, PkError> {
        let segments: Vec<String> = path.split(separator).map(str::to_owned).collect();
        Self::from_segments(segments)
    }

    /// Construct directly from a segment list, validating each segment.
    ///
    /// # Errors
    ///
    /// Returns [`PkError::Empty`], [`PkError::EmptySegment`], or
    /// [`PkError::ForbiddenCharacter`].
    pub fn from_segments(segments: Vec<String>) -> Result<Self, PkError> {
        if segments.is_empty() {
            return Err(PkError::Empty);
        }
        for (index, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                return Err(PkError::EmptySegment { index });
            }
            if segment.chars().any(|c| FORBIDDEN_IN_SEGMENT.contains(&c)) {
                return Err(PkError::ForbiddenCharacter { index, segment: segment.clone() });
            }
        }
        Ok(Self(segments))
    }

    /// Serialise back to a delimited path using `/`.
    pub fn to_path(&self) -> String {
        self.to_path_with_separator('/')
    }

    /// Serialise back to a delimited path using an arbitrary separator.
    pub fn to_path_with_separator(&self, separator: char) -> String {
        self.0.join(&separator.to_string())
    }

    /// Return `prefix ++ self` as a new `Pk`.
    ///
    /// Neither operand is mutated.
    #[must_use]
    pub fn prefix(&self, prefix: &Pk) -> Pk {
        let mut segments = prefix.0.clone();
        segments.extend(self.0.iter().cloned());
        Pk(segments)
    }

    /// Return `self ++ suffix` as a new `Pk`.
    ///
    /// Neither operand is mutated.
    #[must_use]
    pub fn suffix(&self, suffix: &Pk) -> Pk {
        let mut segments = self.0.clone();
        segments.extend(suffix.0.iter().cloned());
        Pk(segments)
    }

    /// View the segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A `Pk` is never empty after construction, but this mirrors the
    /// standard `is_empty` convention for len-bearing types.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Pk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

impl Serialize for Pk {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for segment in &self.0 {
            seq.serialize_element(segment)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Pk {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let segments = Vec::<String>::deserialize(deserializer)?;
        Pk::from_segments(segments).map_err(DeError::custom)
    }
}
