use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const ENCODED_HASH: &str = "%23";

/// Player, clan or war tag in the URL-encoded form the API expects (`%23ABC`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    /// Accepts `#abc`, `abc` or `%23abc` and normalizes to `%23ABC`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(ValidationError::EmptyTag);
        }

        let rest = if raw
            .get(..ENCODED_HASH.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(ENCODED_HASH))
        {
            &raw[ENCODED_HASH.len()..]
        } else if let Some(stripped) = raw.strip_prefix('#') {
            stripped
        } else {
            raw
        };

        let rest = rest.trim().to_uppercase();
        if rest.is_empty() {
            return Err(ValidationError::EmptyTag);
        }

        Ok(Self(format!("{ENCODED_HASH}{rest}")))
    }

    /// Encoded form, ready to be used as a path segment.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human form with a literal `#`.
    pub fn display_form(&self) -> String {
        format!("#{}", &self.0[ENCODED_HASH.len()..])
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Tag {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Tag {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Tag> for String {
    fn from(value: Tag) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_tag_variants() {
        for input in ["#abc", "abc", "%23abc", " %23Abc ", "# abc"] {
            assert_eq!(Tag::parse(input).expect("valid").as_str(), "%23ABC", "{input}");
        }
    }

    #[test]
    fn rejects_empty_tags() {
        for input in ["", "   ", "#", "%23", "%23  "] {
            assert_eq!(Tag::parse(input), Err(ValidationError::EmptyTag), "{input:?}");
        }
    }

    #[test]
    fn display_form_uses_hash() {
        assert_eq!(Tag::parse("2pp").expect("valid").display_form(), "#2PP");
    }
}
