use core::fmt;

/// Typed literal value of a statement attribute.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AttrValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl AttrValue {
    /// Classifies an unquoted token.
    ///
    /// `true`/`false` are booleans and `null` is null. Tokens containing `.`,
    /// `e` or `E` are floats, anything else must be an integer. Returns `None`
    /// when the token is none of these.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "true" => Some(Self::Bool(true)),
            "false" => Some(Self::Bool(false)),
            "null" => Some(Self::Null),
            _ if token.contains(['.', 'e', 'E']) => token.parse().ok().map(Self::Float),
            _ => token.parse().ok().map(Self::Int),
        }
    }

    /// Name of the value's type, as used in error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Floats, and integers widened to `f64`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:?}"),
            Self::Str(value) => write!(f, "\"{}\"", value.escape_debug()),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_unquoted_tokens() {
        assert_eq!(AttrValue::from_token("true"), Some(AttrValue::Bool(true)));
        assert_eq!(AttrValue::from_token("null"), Some(AttrValue::Null));
        assert_eq!(AttrValue::from_token("-42"), Some(AttrValue::Int(-42)));
        assert_eq!(AttrValue::from_token("3.5"), Some(AttrValue::Float(3.5)));
        assert_eq!(AttrValue::from_token("1e3"), Some(AttrValue::Float(1000.0)));
        assert_eq!(AttrValue::from_token("patrol"), None);
        assert_eq!(AttrValue::from_token("1.2.3"), None);
        assert_eq!(AttrValue::from_token("True"), None);
    }

    #[test]
    fn integers_widen_to_float() {
        assert_eq!(AttrValue::Int(2).as_float(), Some(2.0));
        assert_eq!(AttrValue::Float(2.0).as_int(), None);
    }

    #[test]
    fn display_quotes_strings() {
        assert_eq!(AttrValue::from("a\"b").to_string(), r#""a\"b""#);
        assert_eq!(AttrValue::Float(1.0).to_string(), "1.0");
        assert_eq!(AttrValue::Null.to_string(), "null");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_plain_json() {
        let values = vec![
            AttrValue::Null,
            AttrValue::Bool(true),
            AttrValue::Int(3),
            AttrValue::from("go"),
        ];
        assert_eq!(
            serde_json::to_string(&values).unwrap(),
            r#"[null,true,3,"go"]"#
        );
    }
}
