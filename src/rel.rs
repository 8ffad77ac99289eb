// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! Well-known relation types and shorthand constructors.
//!
//! The helpers only set the relation. `preload` links are meant to carry an
//! `as` attribute naming the destination (`style`, `script`, `font`, ...)
//! but nothing here enforces it: the header is valid without it.
//!
//! ```
//! use linkset::rel;
//!
//! let link = rel::preload("/app.js")
//!     .and_then(|link| link.with_attribute("as", "script"))
//!     .unwrap();
//!
//! assert_eq!(link.to_string(), r#"</app.js>; rel="preload"; as="script""#);
//! ```

use crate::error::Result;
use crate::link::Link;

pub const ALTERNATE: &str = "alternate";
pub const DNS_PREFETCH: &str = "dns-prefetch";
pub const PRECONNECT: &str = "preconnect";
pub const PREFETCH: &str = "prefetch";
pub const PRELOAD: &str = "preload";
pub const PRERENDER: &str = "prerender";

/// Flag attribute telling push-capable servers not to push a preload.
pub const NOPUSH: &str = "nopush";

/// A link with an arbitrary relation.
pub fn link(uri: impl Into<String>, relation: impl Into<String>) -> Result<Link> {
    Link::new(uri, relation)
}

pub fn alternate(uri: impl Into<String>) -> Result<Link> {
    Link::new(uri, ALTERNATE)
}

/// Resolve the DNS of an origin ahead of time.
pub fn dns_prefetch(uri: impl Into<String>) -> Result<Link> {
    Link::new(uri, DNS_PREFETCH)
}

/// Open a connection to an origin ahead of time.
pub fn preconnect(uri: impl Into<String>) -> Result<Link> {
    Link::new(uri, PRECONNECT)
}

/// Fetch a resource likely needed by the next navigation.
pub fn prefetch(uri: impl Into<String>) -> Result<Link> {
    Link::new(uri, PREFETCH)
}

/// Fetch a resource needed by the current page.
pub fn preload(uri: impl Into<String>) -> Result<Link> {
    Link::new(uri, PRELOAD)
}

/// Render a page likely visited next.
pub fn prerender(uri: impl Into<String>) -> Result<Link> {
    Link::new(uri, PRERENDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_set_relation() {
        let cases = vec![
            (alternate("/index.jsonld"), ALTERNATE),
            (dns_prefetch("https://fonts.example.org"), DNS_PREFETCH),
            (preconnect("https://cdn.example.org"), PRECONNECT),
            (prefetch("/next.html"), PREFETCH),
            (preload("/app.css"), PRELOAD),
            (prerender("/checkout"), PRERENDER),
            (link("/feed", "self"), "self"),
        ];

        for (link, relation) in cases {
            let link = link.expect("Expect a valid link");

            assert_eq!(link.relation(), relation);
            assert!(link.attributes().is_empty());
        }
    }

    #[test]
    fn preload_without_as_is_valid() {
        let link = preload("/app.css").expect("Expect a valid link");

        assert_eq!(link.to_string(), r#"</app.css>; rel="preload""#);
        assert!(link.is_push_candidate());
    }

    #[test]
    fn helpers_reject_empty_uri() {
        assert!(preload("").is_err());
        assert!(dns_prefetch("").is_err());
    }
}
