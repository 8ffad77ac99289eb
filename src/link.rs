// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

use crate::error::{LinkError, Result};
use crate::param::{normalize_name, Param, Value};
use crate::parser;
use crate::rel;
use crate::uri::UriRef;
use std::fmt::{self, Display};
use std::str::FromStr;
use url::Url;

/// A typed link: a target, a relation and an ordered set of attributes.
///
/// Links are values. The builder methods consume the link and hand back a new
/// one, so a link never changes once it has been shared.
///
/// ```
/// use linkset::Link;
///
/// let link = Link::new("/app.css", "preload")
///     .and_then(|link| link.with_attribute("as", "style"))
///     .unwrap();
///
/// assert_eq!(link.to_string(), r#"</app.css>; rel="preload"; as="style""#);
/// ```
#[derive(Debug, Clone)]
pub struct Link {
    target: UriRef,
    relation: String,
    params: Vec<Param>,
}

impl Link {
    pub fn new(uri: impl Into<String>, relation: impl Into<String>) -> Result<Link> {
        let target = UriRef::new(uri)?;
        let relation = relation.into();

        if relation.trim().is_empty() {
            return Err(LinkError::InvalidLink("relation is empty".into()));
        }

        if relation.contains(|c: char| c == '\r' || c == '\n' || c == '\0') {
            return Err(LinkError::InvalidLink(format!(
                "relation {:?} contains a line break or NUL",
                relation
            )));
        }

        Ok(Link {
            target,
            relation,
            params: vec![],
        })
    }

    pub fn uri(&self) -> &str {
        self.target.as_str()
    }

    pub fn target(&self) -> &UriRef {
        &self.target
    }

    /// The raw relation, possibly several space-separated relation types.
    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// Each relation type of the link.
    ///
    /// ```
    /// use linkset::Link;
    ///
    /// let link = Link::new("/", "start http://example.net/relation/other").unwrap();
    /// let rels: Vec<&str> = link.relations().collect();
    ///
    /// assert_eq!(rels, vec!["start", "http://example.net/relation/other"]);
    /// ```
    pub fn relations(&self) -> impl Iterator<Item = &str> {
        self.relation.split_whitespace()
    }

    /// Relation types compare case-insensitively (RFC8288 Section 2.1.1).
    pub fn has_relation(&self, relation: &str) -> bool {
        self.relations().any(|rel| rel.eq_ignore_ascii_case(relation))
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.params
            .iter()
            .find(|param| param.name().eq_ignore_ascii_case(name))
            .map(Param::value)
    }

    pub fn attributes(&self) -> &[Param] {
        &self.params
    }

    /// Sets an attribute, replacing the value in place if the name is
    /// already present.
    pub fn with_attribute(mut self, name: &str, value: impl Into<Value>) -> Result<Link> {
        let param = Param::new(name, value)?;

        match self.params.iter_mut().find(|p| p.name() == param.name()) {
            Some(existing) => existing.set_value(param.into_value()),
            None => self.params.push(param),
        }

        Ok(self)
    }

    /// Sets a boolean attribute such as `nopush` or `crossorigin`.
    pub fn with_flag(self, name: &str) -> Result<Link> {
        self.with_attribute(name, Value::Flag)
    }

    /// Removes an attribute. Names that are absent or invalid leave the link
    /// untouched.
    pub fn without_attribute(mut self, name: &str) -> Link {
        if let Ok(name) = normalize_name(name) {
            self.params.retain(|param| param.name() != name);
        }

        self
    }

    /// A preload link without `nopush`, which HTTP/2 servers and proxies may
    /// turn into a server push.
    pub fn is_push_candidate(&self) -> bool {
        self.has_relation(rel::PRELOAD) && self.attribute(rel::NOPUSH).is_none()
    }

    /// Resolves the target against `base`, keeping relation and attributes.
    pub fn resolve(&self, base: &Url) -> Result<Link> {
        let url = self.target.resolve(base)?;

        Ok(Link {
            target: UriRef::new(url.into_string())?,
            relation: self.relation.clone(),
            params: self.params.clone(),
        })
    }

    /// Attribute insertion used by the parser. The first occurrence of a name
    /// wins, except that a star value replaces a plain one (RFC8288 Section
    /// 3.4.1). Returns false when `param` was dropped.
    pub(crate) fn push_param(&mut self, param: Param) -> bool {
        match self.params.iter_mut().find(|p| p.name() == param.name()) {
            Some(existing) if param.is_star() && !existing.is_star() => {
                existing.set_value(param.into_value());
                true
            }
            Some(_) => false,
            None => {
                self.params.push(param);
                true
            }
        }
    }
}

/// Two links are equal when target, relation and attribute mapping match,
/// regardless of attribute order.
impl PartialEq for Link {
    fn eq(&self, other: &Link) -> bool {
        self.target == other.target
            && self.relation == other.relation
            && self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .all(|param| other.attribute(param.name()) == Some(param.value()))
    }
}

impl Eq for Link {}

impl Display for Link {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "<{}>; rel={}",
            self.target,
            Value::Text(self.relation.clone())
        )?;

        for param in &self.params {
            write!(formatter, "; {}", param)?;
        }

        Ok(())
    }
}

/// Parses exactly one header entry.
impl FromStr for Link {
    type Err = LinkError;

    fn from_str(input: &str) -> Result<Link> {
        parser::parse_single(input)
    }
}
