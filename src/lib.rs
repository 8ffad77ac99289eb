// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! Build, serialize and parse HTTP `Link` headers (RFC8288), the way
//! preloads and resource hints are announced to browsers and HTTP/2 servers.
//!
//! ```
//! use linkset::{rel, LinkSet};
//!
//! let links = LinkSet::new()
//!     .with_link(rel::preload("/app.css").and_then(|l| l.with_attribute("as", "style")).unwrap())
//!     .with_link(rel::dns_prefetch("https://fonts.example.org").unwrap());
//!
//! let value = links.serialize();
//!
//! assert_eq!(LinkSet::parse(&value).unwrap(), links);
//! ```

extern crate pest;
#[macro_use]
extern crate pest_derive;

pub mod context;
pub mod error;
pub mod header;
pub mod link;
pub mod param;
pub mod parser;
pub mod rel;
pub mod uri;

pub use error::{LinkError, Malformed, Result};
pub use header::LinkSet;
pub use link::Link;
pub use param::Value;
pub use parser::{parse, parse_with, ParsePolicy};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::Encoding;

    #[test]
    fn preload_with_destination() {
        let link = Link::new("/app.css", "preload")
            .and_then(|link| link.with_attribute("as", "style"))
            .expect("Expect a valid link");

        let actual = LinkSet::new().with_link(link).serialize();

        assert_eq!(actual, r#"</app.css>; rel="preload"; as="style""#);
    }

    #[test]
    fn alternate_and_nopush_preload() {
        let links = LinkSet::new()
            .with_link(Link::new("/index.jsonld", "alternate").unwrap())
            .with_link(
                Link::new("/app.css", "preload")
                    .and_then(|link| link.with_flag("nopush"))
                    .unwrap(),
            );

        assert_eq!(
            links.serialize(),
            r#"</index.jsonld>; rel="alternate",</app.css>; rel="preload"; nopush"#
        );
    }

    #[test]
    fn nopush_round_trip() {
        let input = r#"</app.css>; rel="preload"; nopush"#;

        let actual = parse(input).expect("Expect a valid header");
        let link = actual.links().next().expect("Expect one link");

        assert_eq!(link.attribute("nopush"), Some(&Value::Flag));
        assert_eq!(actual.serialize(), input);
    }

    #[test]
    fn missing_angle_brackets() {
        let actual = parse("/app.css; rel=preload");

        assert_eq!(
            actual,
            Err(LinkError::MalformedHeader {
                entry: 0,
                reason: Malformed::MissingAngleBrackets
            })
        );
    }

    #[test]
    fn multiple_links() {
        let input =
            r#"<https://example.org/3>; rel="next", <https://example.org/1>; rel="previous""#;

        let actual = parse(input).expect("Expect a valid header");
        let expected = LinkSet::new()
            .with_link(Link::new("https://example.org/3", "next").unwrap())
            .with_link(Link::new("https://example.org/1", "previous").unwrap());

        assert_eq!(actual, expected);
    }

    #[test]
    fn link_header_field_examples_1() {
        let input =
            r#"<http://example.com/TheBook/chapter2>; rel="previous"; title="previous chapter""#;

        let actual = parse(input).expect("Expect a valid header");
        let expected = LinkSet::new().with_link(
            Link::new("http://example.com/TheBook/chapter2", "previous")
                .and_then(|link| link.with_attribute("title", "previous chapter"))
                .unwrap(),
        );

        assert_eq!(actual, expected);
    }

    #[test]
    fn link_header_field_examples_3() {
        let input = "</terms>; rel=\"copyright\"; anchor=\"#foo\"";

        let actual = parse(input).expect("Expect a valid header");
        let expected = LinkSet::new().with_link(
            Link::new("/terms", "copyright")
                .and_then(|link| link.with_attribute("anchor", "#foo"))
                .unwrap(),
        );

        assert_eq!(actual, expected);
    }

    #[test]
    fn link_header_field_examples_4() {
        let input = r#"</TheBook/chapter2>; rel="previous"; title*=UTF-8'de'letztes%20Kapitel, </TheBook/chapter4>; rel="next"; title*=UTF-8'de'n%c3%a4chstes%20Kapitel"#;

        let title = |value: &str| Value::Compound {
            encoding: Encoding::Utf8,
            language: Some("de".into()),
            value: value.into(),
        };
        let expected = LinkSet::new()
            .with_link(
                Link::new("/TheBook/chapter2", "previous")
                    .and_then(|link| link.with_attribute("title", title("letztes Kapitel")))
                    .unwrap(),
            )
            .with_link(
                Link::new("/TheBook/chapter4", "next")
                    .and_then(|link| link.with_attribute("title", title("nächstes Kapitel")))
                    .unwrap(),
            );

        let actual = parse(input).expect("Expect a valid header");

        assert_eq!(actual, expected);
        assert_eq!(parse(&actual.serialize()), Ok(expected));
    }

    #[test]
    fn link_header_field_examples_5() {
        let input = r#"<http://example.org/>; rel="start http://example.net/relation/other""#;

        let actual = parse(input).expect("Expect a valid header");
        let link = actual.links().next().expect("Expect one link");

        assert!(link.has_relation("start"));
        assert!(link.has_relation("http://example.net/relation/other"));
    }

    #[test]
    fn unicode_fest() {
        let input = "<http://example.org/\u{FE0F}>; rel=\"\u{1F383}\"";

        let actual = parse(input).expect("Expect a valid header");
        let expected =
            LinkSet::new().with_link(Link::new("http://example.org/\u{FE0F}", "🎃").unwrap());

        assert_eq!(actual, expected);
        assert_eq!(actual.serialize(), input);
    }

    #[test]
    fn round_trip_awkward_values() {
        let links = LinkSet::new()
            .with_link(
                rel::preload("/fonts/a,b.woff2")
                    .and_then(|link| link.with_attribute("as", "font"))
                    .and_then(|link| link.with_flag("crossorigin"))
                    .unwrap(),
            )
            .with_link(
                rel::link("/feed", "alternate")
                    .and_then(|link| link.with_attribute("title", r#"News; "daily", \ all"#))
                    .and_then(|link| link.with_attribute("type", "application/atom+xml"))
                    .unwrap(),
            )
            .with_link(rel::preload("/fonts/a,b.woff2").unwrap());

        let actual = parse(&links.serialize()).expect("Expect a valid header");

        assert_eq!(actual, links);
    }

    #[test]
    fn round_trip_compound_values() {
        let compound = |encoding: Encoding, language: Option<&str>, value: &str| Value::Compound {
            encoding,
            language: language.map(String::from),
            value: value.into(),
        };
        let links = LinkSet::new()
            .with_link(
                Link::new("/a", "x")
                    .and_then(|link| {
                        link.with_attribute("title", compound(Encoding::Extension("GIB".into()), None, "%C0%FF%EE"))
                    })
                    .unwrap(),
            )
            .with_link(
                Link::new("/b", "x")
                    .and_then(|link| link.with_attribute("title", compound(Encoding::Utf8, Some(""), "€ rates")))
                    .unwrap(),
            )
            .with_link(
                Link::new("/c", "x")
                    .and_then(|link| link.with_attribute("title", compound(Encoding::Utf8, Some("en"), "it's 100%")))
                    .unwrap(),
            );

        let actual = parse(&links.serialize()).expect("Expect a valid header");

        assert_eq!(actual, links);
    }

    #[test]
    fn parsed_links_stay_ordered() {
        let links = parse(r#"</c>; rel=x, </a>; rel=x, </b>; rel=x"#)
            .expect("Expect a valid header")
            .without_link(&Link::new("/a", "x").unwrap())
            .with_link(Link::new("/d", "x").unwrap());

        let uris: Vec<&str> = links.links().map(Link::uri).collect();

        assert_eq!(uris, vec!["/c", "/b", "/d"]);
    }
}
