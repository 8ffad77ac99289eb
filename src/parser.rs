// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! Link header parser.
//!
//! A header value is first split into entries on commas that are neither
//! inside a quoted string nor inside a `<...>` target. Each entry is then
//! parsed on its own by the RFC8288 grammar.

use crate::error::{LinkError, Malformed, Result};
use crate::header::LinkSet;
use crate::link::Link;
use crate::param::{Param, Value};
use log::{debug, warn};
use pest::error::{Error as PestError, LineColLocation};
use pest::{iterators::Pair, Parser};

#[derive(Parser)]
#[grammar = "rfc8288.pest"]
pub struct Rfc8288Parser;

/// What to do with an entry that cannot be parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParsePolicy {
    /// Fail the whole header on the first malformed entry.
    Strict,
    /// Log and drop malformed entries, keep the rest in order.
    SkipMalformed,
}

impl Default for ParsePolicy {
    fn default() -> ParsePolicy {
        ParsePolicy::Strict
    }
}

/// Parses a header value, failing on the first malformed entry.
///
/// ```
/// let links = linkset::parse(r#"</app.css>; rel="preload"; as="style"; nopush"#).unwrap();
///
/// assert_eq!(links.len(), 1);
/// ```
pub fn parse(input: &str) -> Result<LinkSet> {
    parse_with(input, ParsePolicy::Strict)
}

/// Parses a header value. An empty or blank value is an empty set.
pub fn parse_with(input: &str, policy: ParsePolicy) -> Result<LinkSet> {
    let mut links = LinkSet::new();

    if input.trim().is_empty() {
        return Ok(links);
    }

    for (index, segment) in split(input).into_iter().enumerate() {
        let result = match segment.unterminated {
            Some(reason) => Err(LinkError::malformed(index, reason)),
            None => parse_entry(segment.text.trim(), index),
        };

        match result {
            Ok(link) => links.push(link),
            Err(err) => match policy {
                ParsePolicy::Strict => return Err(err),
                ParsePolicy::SkipMalformed => warn!("Skipping link header entry: {}", err),
            },
        }
    }

    debug!("Parsed {} links from header", links.len());

    Ok(links)
}

/// Parses a value holding exactly one entry.
pub(crate) fn parse_single(input: &str) -> Result<Link> {
    let mut links = parse(input)?.into_iter();

    match (links.next(), links.next()) {
        (Some(link), None) => Ok(link),
        (None, _) => Err(LinkError::malformed(0, Malformed::EmptyEntry)),
        (Some(_), Some(_)) => Err(LinkError::malformed(
            1,
            Malformed::InvalidSyntax("expected a single link".into()),
        )),
    }
}

/// A raw entry as cut by `split`.
#[derive(Debug, PartialEq)]
struct Segment<'a> {
    text: &'a str,
    /// Set when the input ended inside a quoted string or a target.
    unterminated: Option<Malformed>,
}

#[derive(Clone, Copy)]
enum Scan {
    Outside,
    InsideQuote,
    QuoteEscape,
    InsideTarget,
}

fn split(input: &str) -> Vec<Segment> {
    let mut segments = vec![];
    let mut state = Scan::Outside;
    let mut start = 0;
    // Only a `<` opening an entry starts a target.
    let mut at_entry_start = true;

    for (i, c) in input.char_indices() {
        state = match (state, c) {
            (Scan::Outside, ',') => {
                segments.push(Segment {
                    text: &input[start..i],
                    unterminated: None,
                });
                start = i + c.len_utf8();
                at_entry_start = true;
                continue;
            }
            (Scan::Outside, '"') => Scan::InsideQuote,
            (Scan::Outside, '<') if at_entry_start => Scan::InsideTarget,
            (Scan::Outside, _) => Scan::Outside,
            (Scan::InsideQuote, '\\') => Scan::QuoteEscape,
            (Scan::InsideQuote, '"') => Scan::Outside,
            (Scan::InsideQuote, _) => Scan::InsideQuote,
            (Scan::QuoteEscape, _) => Scan::InsideQuote,
            (Scan::InsideTarget, '>') => Scan::Outside,
            (Scan::InsideTarget, _) => Scan::InsideTarget,
        };

        if !c.is_whitespace() {
            at_entry_start = false;
        }
    }

    let unterminated = match state {
        Scan::Outside => None,
        Scan::InsideQuote | Scan::QuoteEscape => Some(Malformed::UnterminatedQuote),
        Scan::InsideTarget => Some(Malformed::MissingAngleBrackets),
    };

    segments.push(Segment {
        text: &input[start..],
        unterminated,
    });

    segments
}

/// Parses one trimmed entry. `index` is only used to report errors.
pub(crate) fn parse_entry(entry: &str, index: usize) -> Result<Link> {
    if entry.is_empty() {
        return Err(LinkError::malformed(index, Malformed::EmptyEntry));
    }

    if !entry.starts_with('<') || !entry.contains('>') {
        return Err(LinkError::malformed(index, Malformed::MissingAngleBrackets));
    }

    let mut pairs = Rfc8288Parser::parse(Rule::link, entry)
        .map_err(|err| LinkError::malformed(index, syntax_error(&err)))?;

    match pairs.next() {
        Some(pair) => link_from_rule(pair, index),
        None => Err(LinkError::malformed(
            index,
            Malformed::InvalidSyntax("no link found".into()),
        )),
    }
}

fn link_from_rule(pair: Pair<Rule>, index: usize) -> Result<Link> {
    let mut target = "";
    let mut relation = None;
    let mut params = vec![];

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::target => target = inner_pair.as_str(),

            Rule::param => {
                let (name, value) = param_from_rule(inner_pair);

                // Occurrences of rel after the first are ignored (RFC8288
                // Section 3.3).
                if name.eq_ignore_ascii_case("rel") {
                    if relation.is_none() {
                        relation = Some(value.unwrap_or_default());
                    }
                } else {
                    params.push((name, value));
                }
            }

            Rule::EOI => (),

            _ => unreachable!(),
        }
    }

    let relation = match relation {
        Some(ref rel) if !rel.trim().is_empty() => rel.clone(),
        _ => return Err(LinkError::malformed(index, Malformed::MissingRelation)),
    };

    let mut link = Link::new(target, relation).map_err(|err| invalid(index, &err))?;

    for (name, value) in params {
        let param = match (name.ends_with('*'), value) {
            (true, Some(value)) => {
                let value =
                    Value::from_extended(&value).map_err(|reason| LinkError::malformed(index, reason))?;
                Param::new(&name[..name.len() - 1], value)
            }
            (true, None) => {
                return Err(LinkError::malformed(
                    index,
                    Malformed::InvalidExtendedValue(format!("{} has no value", name)),
                ))
            }
            (false, Some(value)) => Param::new(name, value),
            (false, None) => Param::new(name, Value::Flag),
        }
        .map_err(|err| invalid(index, &err))?;

        if !link.push_param(param) {
            debug!("Ignoring repeated parameter {:?} of link to {}", name, target);
        }
    }

    Ok(link)
}

/// Returns the param name verbatim and its value, unquoted.
fn param_from_rule(pair: Pair<Rule>) -> (&str, Option<String>) {
    let mut name = "";
    let mut value = None;

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::name => name = inner_pair.as_str(),

            Rule::token_value => value = Some(inner_pair.as_str().to_string()),

            Rule::quoted_text => value = Some(unescape(inner_pair.as_str())),

            _ => unreachable!(),
        }
    }

    (name, value)
}

fn unescape(quoted: &str) -> String {
    let mut text = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => text.extend(chars.next()),
            _ => text.push(c),
        }
    }

    text
}

fn invalid(index: usize, err: &LinkError) -> LinkError {
    LinkError::malformed(index, Malformed::InvalidSyntax(err.to_string()))
}

fn syntax_error(err: &PestError<Rule>) -> Malformed {
    let column = match err.line_col {
        LineColLocation::Pos((_, column)) => column,
        LineColLocation::Span((_, column), _) => column,
    };

    Malformed::InvalidSyntax(format!("unexpected input at column {}", column))
}
