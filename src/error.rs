// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! Error types and utilities.

use failure::Fail;
use std::fmt::{self, Display};

/// Either `Ok(T)` or `Err(LinkError)`.
pub type Result<T> = ::std::result::Result<T, LinkError>;

/// Any failure building or parsing links.
#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum LinkError {
    /// An attribute name (or its value) was rejected while building a link.
    #[fail(display = "Invalid attribute {:?}: {}", name, reason)]
    InvalidAttribute { name: String, reason: &'static str },

    /// The link target or relation was rejected while building a link.
    #[fail(display = "Invalid link: {}", _0)]
    InvalidLink(String),

    /// The header value does not follow the Link header grammar.
    ///
    /// `entry` is the zero-based position of the offending entry.
    #[fail(display = "Malformed header at entry {}: {}", entry, reason)]
    MalformedHeader { entry: usize, reason: Malformed },
}

impl LinkError {
    pub(crate) fn invalid_attribute(name: &str, reason: &'static str) -> LinkError {
        LinkError::InvalidAttribute {
            name: name.to_string(),
            reason,
        }
    }

    pub(crate) fn malformed(entry: usize, reason: Malformed) -> LinkError {
        LinkError::MalformedHeader { entry, reason }
    }

    /// The reason of a `MalformedHeader` error, if that is what this is.
    pub fn malformed_reason(&self) -> Option<&Malformed> {
        match self {
            LinkError::MalformedHeader { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Why a header entry could not be parsed.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Malformed {
    /// Nothing between two commas, or a trailing comma.
    EmptyEntry,
    /// The target is not wrapped in `<` and `>`.
    MissingAngleBrackets,
    /// A quoted string runs to the end of the input.
    UnterminatedQuote,
    /// The entry has no `rel` parameter, or an empty one.
    MissingRelation,
    /// Any other grammar violation, with a short description.
    InvalidSyntax(String),
    /// A `name*=` parameter whose value is not a valid RFC 8187 value.
    InvalidExtendedValue(String),
}

impl Display for Malformed {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Malformed::EmptyEntry => write!(formatter, "empty entry"),
            Malformed::MissingAngleBrackets => {
                write!(formatter, "target must be enclosed in angle brackets")
            }
            Malformed::UnterminatedQuote => write!(formatter, "unterminated quoted string"),
            Malformed::MissingRelation => write!(formatter, "missing rel parameter"),
            Malformed::InvalidSyntax(detail) => write!(formatter, "invalid syntax, {}", detail),
            Malformed::InvalidExtendedValue(detail) => {
                write!(formatter, "invalid extended value, {}", detail)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display() {
        let err = LinkError::malformed(2, Malformed::MissingRelation);

        assert_eq!(
            err.to_string(),
            "Malformed header at entry 2: missing rel parameter"
        );
    }

    #[test]
    fn malformed_reason_of_other_errors() {
        let err = LinkError::invalid_attribute("", "name is empty");

        assert_eq!(err.malformed_reason(), None);
        assert_eq!(err.to_string(), r#"Invalid attribute "": name is empty"#);
    }
}
