// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

use crate::error::{LinkError, Malformed, Result};
use percent_encoding::{
    define_encode_set, percent_decode, utf8_percent_encode, EncodeSet, DEFAULT_ENCODE_SET,
};
use std::fmt::{self, Display};

define_encode_set! {
    /// Everything outside RFC8187 `attr-char`, so an encoded value is always
    /// a valid token.
    pub ATTR_CHAR_ENCODE_SET = [DEFAULT_ENCODE_SET] | {
        '%', '\'', '(', ')', '*', ',', '/', ':', ';', '=', '@', '[', '\\', ']'
    }
}

/// A link attribute pair.
///
/// An attribute has three types of value: a flag with no value at all, text
/// or compound (RFC8187).
///
/// A "flag attribute", for example `nopush`, is represented as:
///
/// ```norun
/// Param {
///     name: "nopush".into(),
///     value: Value::Flag,
/// };
/// ```
///
/// A "star attribute", for example, `title*=utf-8'ca'%C3%A0bac` is stored
/// without the star:
///
/// ```norun
/// Param {
///     name: "title".to_string(),
///     value: Value::Compound {
///         encoding: Encoding::Utf8,
///         language: Some("ca".to_string()),
///         value: "àbac".to_string()
///     }
/// };
/// ```
///
/// Names are case-insensitive and kept lowercased.
///
/// ## Examples
///
/// ```
/// use linkset::param::{Param, Value};
///
/// let param = Param::new("As", "style").unwrap();
///
/// assert_eq!(param.name(), "as");
/// assert_eq!(param.value(), &Value::Text("style".into()));
/// assert_eq!(param.to_string(), r#"as="style""#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    name: String,
    value: Value,
}

impl Param {
    pub fn new(name: &str, value: impl Into<Value>) -> Result<Param> {
        let name = normalize_name(name)?;
        let value = value.into().normalize();

        if let Some(reason) = value.rejection() {
            return Err(LinkError::invalid_attribute(&name, reason));
        }

        Ok(Param { name, value })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consumes the param and returns its value.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// A star param e.g. "title*" is a param marked to identify that its value
    /// is a compound value.
    pub fn is_star(&self) -> bool {
        self.value.is_compound()
    }

    pub(crate) fn set_value(&mut self, value: Value) {
        self.value = value;
    }
}

impl Display for Param {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match &self.value {
            Value::Flag => write!(formatter, "{}", self.name),
            Value::Text(_) => write!(formatter, "{}={}", self.name, self.value),
            Value::Compound { .. } => write!(formatter, "{}*={}", self.name, self.value),
        }
    }
}

/// Checks an attribute name and returns it lowercased.
///
/// A name must be a non-empty RFC7230 token, must not end with `*` (reserved
/// to flag compound values) and must not be `rel`, which is the relation of
/// the link itself.
pub fn normalize_name(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(LinkError::invalid_attribute(name, "name is empty"));
    }

    if !name.chars().all(is_tchar) {
        return Err(LinkError::invalid_attribute(
            name,
            "name must only contain token characters",
        ));
    }

    if name.ends_with('*') {
        return Err(LinkError::invalid_attribute(
            name,
            "name must not end with '*'",
        ));
    }

    let name = name.to_ascii_lowercase();

    if name == "rel" {
        return Err(LinkError::invalid_attribute(
            &name,
            "rel is the relation of the link",
        ));
    }

    Ok(name)
}

/// RFC7230 `tchar`.
pub(crate) fn is_tchar(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

/// The character encoding of a compound value.
///
/// RFC8187 Section 3.2.1 names it as "charset" and defines it as:
///
/// ```abnf
/// charset = "UTF-8" / mime-charset
/// ```
///
/// It also says:
///
/// > Producers MUST use the "UTF-8" ([RFC3629]) character encoding.
/// > Extension character encodings (mime-charset) are reserved for future
/// > use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Extension(String),
}

impl From<&str> for Encoding {
    fn from(s: &str) -> Encoding {
        let sl = s.to_lowercase();

        match &sl[..] {
            "utf-8" => Encoding::Utf8,
            _ => Encoding::Extension(sl),
        }
    }
}

impl Display for Encoding {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Encoding::Utf8 => write!(formatter, "UTF-8"),
            Encoding::Extension(ext) => write!(formatter, "{}", ext),
        }
    }
}

/// An attribute value: a bare flag, a text or a compound of text, character
/// encoding and optionally a language tag.
///
/// Note that RFC8187 names a compound value as "extended value".
///
/// When the encoding of a compound value is not UTF-8, the value will be kept
/// untouched, that is percent-encoded.
///
/// `Display` renders the value as it goes on the wire after the `=`:
///
/// ```
/// use linkset::param::Value;
///
/// let value = Value::Text(r#"say "hi""#.into());
///
/// assert_eq!(value.to_string(), r#""say \"hi\"""#);
/// ```
///
/// ```
/// use linkset::param::{Value, Encoding};
///
/// let value = Value::Compound {
///     encoding: Encoding::Utf8,
///     language: Some("en".into()),
///     value: "GBP (£)".into(),
/// };
///
/// assert_eq!(value.to_string(), "UTF-8'en'GBP%20%28%C2%A3%29");
/// ```
///
/// ```
/// use linkset::param::{Value, Encoding};
///
/// let value = Value::Compound {
///     encoding: Encoding::Extension("GIB".into()),
///     language: None,
///     value: "%C0%FF%EE".into(),
/// };
///
/// assert_eq!(value.to_string(), "GIB''%C0%FF%EE");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// A boolean attribute, present without value, e.g. `nopush`.
    Flag,
    Text(String),
    Compound {
        encoding: Encoding,
        language: Option<String>,
        value: String,
    },
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Text(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Text(s)
    }
}

impl Value {
    /// Returns the text value from either text or compound values.
    pub fn text(&self) -> Option<&str> {
        match self {
            Value::Flag => None,
            Value::Text(value) => Some(value.as_str()),
            Value::Compound { value, .. } => Some(value.as_str()),
        }
    }

    pub fn is_flag(&self) -> bool {
        match self {
            Value::Flag => true,
            _ => false,
        }
    }

    pub fn is_compound(&self) -> bool {
        match self {
            Value::Compound { .. } => true,
            _ => false,
        }
    }

    /// Parses an RFC8187 extended value: `charset'[language]'value-chars`.
    pub fn from_extended(input: &str) -> ::std::result::Result<Value, Malformed> {
        let mut parts = input.splitn(3, '\'');

        let (charset, language, raw) = match (parts.next(), parts.next(), parts.next()) {
            (Some(charset), Some(language), Some(raw)) if !charset.is_empty() => {
                (charset, language, raw)
            }
            _ => {
                return Err(Malformed::InvalidExtendedValue(format!(
                    "expected charset'language'value, got {:?}",
                    input
                )))
            }
        };

        let encoding = Encoding::from(charset);
        let value = match encoding {
            Encoding::Utf8 => percent_decode(raw.as_bytes())
                .decode_utf8()
                .map_err(|err| Malformed::InvalidExtendedValue(err.to_string()))?
                .into_owned(),
            Encoding::Extension(_) => raw.to_string(),
        };

        let language = if language.is_empty() {
            None
        } else {
            Some(language.to_string())
        };

        Ok(Value::Compound {
            encoding,
            language,
            value,
        })
    }

    /// Puts a compound value in the form the parser gives back: extension
    /// charsets lowercased and an empty language dropped.
    fn normalize(self) -> Value {
        match self {
            Value::Compound {
                encoding,
                language,
                value,
            } => Value::Compound {
                encoding: match encoding {
                    Encoding::Extension(charset) => Encoding::Extension(charset.to_ascii_lowercase()),
                    utf8 => utf8,
                },
                language: language.filter(|lang| !lang.is_empty()),
                value,
            },
            other => other,
        }
    }

    /// Why this value cannot go in a header, if it cannot.
    fn rejection(&self) -> Option<&'static str> {
        match self {
            Value::Flag => None,
            Value::Text(text) => {
                if text.contains(|c: char| c == '\r' || c == '\n' || c == '\0') {
                    Some("value contains a line break or NUL")
                } else {
                    None
                }
            }
            Value::Compound {
                encoding,
                language,
                value,
            } => {
                let is_tag = |lang: &String| lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');

                if !language.as_ref().map_or(true, is_tag) {
                    return Some("language must be a language tag");
                }

                match encoding {
                    Encoding::Extension(charset) if charset.is_empty() => Some("charset is empty"),
                    Encoding::Extension(charset) if charset.eq_ignore_ascii_case("utf-8") => {
                        Some("use Encoding::Utf8 for the UTF-8 charset")
                    }
                    Encoding::Extension(charset) if charset.contains('\'') => {
                        Some("charset must not contain '\''")
                    }
                    Encoding::Extension(charset) if !charset.chars().all(is_tchar) => {
                        Some("charset must only contain token characters")
                    }
                    Encoding::Extension(_) if !value.chars().all(is_tchar) => {
                        Some("value of an extension charset must stay percent-encoded")
                    }
                    _ => None,
                }
            }
        }
    }
}

impl Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Flag => Ok(()),
            Value::Text(val) => {
                write!(formatter, "\"")?;
                for c in val.chars() {
                    if c == '"' || c == '\\' {
                        write!(formatter, "\\")?;
                    }
                    write!(formatter, "{}", c)?;
                }
                write!(formatter, "\"")
            }
            Value::Compound {
                encoding,
                language,
                value,
            } => {
                let val = match encoding {
                    Encoding::Utf8 => utf8_percent_encode(value, ATTR_CHAR_ENCODE_SET).to_string(),
                    _ => value.to_string(),
                };

                write!(
                    formatter,
                    "{}'{}'{}",
                    encoding,
                    language.as_ref().map(String::as_str).unwrap_or(""),
                    val
                )
            }
        }
    }
}
