// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! Attaching links to a request or response.
//!
//! Request handling code gets hold of the context explicitly, adds links to
//! it while it runs, and the response layer reads the header value once at
//! the end. There is no global slot.
//!
//! ```
//! use linkset::context::{self, LinkContext};
//! use linkset::{rel, LinkSet};
//!
//! struct Response {
//!     links: LinkSet,
//! }
//!
//! impl LinkContext for Response {
//!     fn link_set(&self) -> &LinkSet {
//!         &self.links
//!     }
//!
//!     fn link_set_mut(&mut self) -> &mut LinkSet {
//!         &mut self.links
//!     }
//! }
//!
//! let mut response = Response { links: LinkSet::new() };
//! context::add_link(&mut response, rel::preconnect("https://cdn.example.org").unwrap());
//!
//! assert_eq!(
//!     context::header_value(&response).as_ref().map(String::as_str),
//!     Some(r#"<https://cdn.example.org>; rel="preconnect""#)
//! );
//! ```

use crate::header::LinkSet;
use crate::link::Link;
use log::trace;

/// Name of the HTTP header carrying the serialized set.
pub const HEADER_NAME: &str = "Link";

/// Anything holding the links of one request/response exchange.
pub trait LinkContext {
    fn link_set(&self) -> &LinkSet;

    fn link_set_mut(&mut self) -> &mut LinkSet;
}

impl LinkContext for LinkSet {
    fn link_set(&self) -> &LinkSet {
        self
    }

    fn link_set_mut(&mut self) -> &mut LinkSet {
        self
    }
}

/// Appends `link` to the links of `context`.
pub fn add_link<C: LinkContext + ?Sized>(context: &mut C, link: Link) {
    trace!("Adding link {}", link);
    context.link_set_mut().push(link);
}

/// The value to send in the `Link` header, or `None` when there are no links
/// and the header should be left out.
pub fn header_value<C: LinkContext + ?Sized>(context: &C) -> Option<String> {
    let links = context.link_set();

    if links.is_empty() {
        None
    } else {
        Some(links.serialize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rel;

    #[derive(Default)]
    struct Request {
        path: String,
        links: LinkSet,
    }

    impl LinkContext for Request {
        fn link_set(&self) -> &LinkSet {
            &self.links
        }

        fn link_set_mut(&mut self) -> &mut LinkSet {
            &mut self.links
        }
    }

    fn handle(request: &mut Request) {
        if request.path == "/" {
            add_link(request, rel::preload("/app.css").unwrap());
        }
        add_link(request, rel::dns_prefetch("https://fonts.example.org").unwrap());
    }

    #[test]
    fn empty_context_has_no_header() {
        let request = Request::default();

        assert_eq!(header_value(&request), None);
    }

    #[test]
    fn requests_do_not_share_links() {
        let mut home = Request {
            path: "/".into(),
            ..Request::default()
        };
        let mut about = Request {
            path: "/about".into(),
            ..Request::default()
        };

        handle(&mut home);
        handle(&mut about);

        assert_eq!(home.links.len(), 2);
        assert_eq!(about.links.len(), 1);
        assert_eq!(
            header_value(&about),
            Some(r#"<https://fonts.example.org>; rel="dns-prefetch""#.to_string())
        );
    }

    #[test]
    fn link_set_is_a_context() {
        let mut links = LinkSet::new();

        add_link(&mut links, rel::prefetch("/next").unwrap());

        assert_eq!(
            header_value(&links),
            Some(r#"</next>; rel="prefetch""#.to_string())
        );
        assert_eq!(HEADER_NAME, "Link");
    }
}
