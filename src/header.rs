// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

use crate::error::{LinkError, Result};
use crate::link::Link;
use crate::parser::{self, ParsePolicy};
use std::fmt::{self, Display};
use std::iter::FromIterator;
use std::slice;
use std::str::FromStr;
use std::vec;
use url::Url;

/// An ordered collection of links, the content of one `Link` header.
///
/// Insertion order is kept: it is the order of the header entries and so the
/// order in which push-capable servers consider preloads.
///
/// A set is meant to live in a single request or response context. It is
/// mutated in place by `push`/`remove` and is not synchronised; never share
/// one instance across concurrently handled requests.
///
/// ```
/// use linkset::{rel, LinkSet};
///
/// let links = LinkSet::new()
///     .with_link(rel::alternate("/index.jsonld").unwrap())
///     .with_link(rel::preload("/app.css").and_then(|l| l.with_flag("nopush")).unwrap());
///
/// assert_eq!(
///     links.serialize(),
///     r#"</index.jsonld>; rel="alternate",</app.css>; rel="preload"; nopush"#
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkSet {
    links: Vec<Link>,
}

impl LinkSet {
    pub fn new() -> LinkSet {
        LinkSet { links: vec![] }
    }

    /// Parses a header value, failing as a whole on any malformed entry.
    pub fn parse(input: &str) -> Result<LinkSet> {
        parser::parse(input)
    }

    pub fn parse_with(input: &str, policy: ParsePolicy) -> Result<LinkSet> {
        parser::parse_with(input, policy)
    }

    pub fn with_link(mut self, link: Link) -> LinkSet {
        self.push(link);
        self
    }

    /// Drops the first link equal to `link`, if any.
    pub fn without_link(mut self, link: &Link) -> LinkSet {
        self.remove(link);
        self
    }

    pub fn push(&mut self, link: Link) {
        self.links.push(link);
    }

    /// Removes the first link equal to `link`. Returns whether one was found.
    pub fn remove(&mut self, link: &Link) -> bool {
        match self.links.iter().position(|l| l == link) {
            Some(index) => {
                self.links.remove(index);
                true
            }
            None => false,
        }
    }

    /// The links in insertion order. Call again to start over.
    pub fn links(&self) -> slice::Iter<Link> {
        self.links.iter()
    }

    /// Links having `relation` among their relation types.
    pub fn links_by_relation<'a>(&'a self, relation: &'a str) -> impl Iterator<Item = &'a Link> {
        self.links.iter().filter(move |link| link.has_relation(relation))
    }

    /// Preload links a push-capable server may push.
    pub fn push_candidates(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|link| link.is_push_candidate())
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Resolves every target against `base`. Fails as a whole if any target
    /// cannot be resolved.
    pub fn resolve(&self, base: &Url) -> Result<LinkSet> {
        self.links.iter().map(|link| link.resolve(base)).collect()
    }

    /// The header value: entries joined by `,`. An empty set gives an empty
    /// string.
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

impl Display for LinkSet {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        for (index, link) in self.links.iter().enumerate() {
            if index > 0 {
                write!(formatter, ",")?;
            }
            write!(formatter, "{}", link)?;
        }

        Ok(())
    }
}

impl FromStr for LinkSet {
    type Err = LinkError;

    fn from_str(input: &str) -> Result<LinkSet> {
        parser::parse(input)
    }
}

impl FromIterator<Link> for LinkSet {
    fn from_iter<I: IntoIterator<Item = Link>>(iter: I) -> LinkSet {
        LinkSet {
            links: iter.into_iter().collect(),
        }
    }
}

impl Extend<Link> for LinkSet {
    fn extend<I: IntoIterator<Item = Link>>(&mut self, iter: I) {
        self.links.extend(iter);
    }
}

impl IntoIterator for LinkSet {
    type Item = Link;
    type IntoIter = vec::IntoIter<Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.into_iter()
    }
}

impl<'a> IntoIterator for &'a LinkSet {
    type Item = &'a Link;
    type IntoIter = slice::Iter<'a, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}
