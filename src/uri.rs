// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

use crate::error::{LinkError, Result};
use std::fmt::{self, Display};
use url::Url;

/// The target of a link, kept verbatim as a URI-reference.
///
/// A target can be relative (`/app.css`) in which case RFC8288 Section 3.2
/// says it is resolved against the context of the link. Use `resolve` to get
/// an absolute URL given the URL of the response.
///
/// ```
/// use linkset::uri::UriRef;
/// use url::Url;
///
/// let base = Url::parse("https://example.org/blog/post").unwrap();
/// let target = UriRef::new("../app.css").unwrap();
///
/// assert_eq!(target.resolve(&base).unwrap().as_str(), "https://example.org/app.css");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UriRef(String);

impl UriRef {
    /// Fails when the reference is empty, contains angle brackets, which
    /// could not be serialized inside `<...>`, or contains CR, LF or NUL.
    pub fn new(uri: impl Into<String>) -> Result<UriRef> {
        let uri = uri.into();

        if uri.trim().is_empty() {
            return Err(LinkError::InvalidLink("target URI is empty".into()));
        }

        if uri.contains(|c: char| c == '<' || c == '>') {
            return Err(LinkError::InvalidLink(format!(
                "target URI {:?} contains angle brackets",
                uri
            )));
        }

        if uri.contains(|c: char| c == '\r' || c == '\n' || c == '\0') {
            return Err(LinkError::InvalidLink(format!(
                "target URI {:?} contains a line break or NUL",
                uri
            )));
        }

        Ok(UriRef(uri))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the reference parses as a URL on its own.
    pub fn is_absolute(&self) -> bool {
        Url::parse(&self.0).is_ok()
    }

    pub fn resolve(&self, base: &Url) -> Result<Url> {
        base.join(&self.0).map_err(|err| {
            LinkError::InvalidLink(format!("cannot resolve {:?} against {}: {}", self.0, base, err))
        })
    }
}

impl Display for UriRef {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl AsRef<str> for UriRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
