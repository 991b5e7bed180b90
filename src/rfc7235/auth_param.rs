//! The `auth-param` production of RFC 7235 section 2.1.

use std::fmt;

use super::is_token;

/// A single `key=value` parameter of a challenge or of credentials.
///
/// The value is stored unquoted. Serialization always emits a quoted string and
/// escapes embedded `"` and `\` characters, so a value built in code can carry any
/// text. Values coming from the tokenizer go through [`AuthParam::parse`], which
/// removes the surrounding quotes instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthParam {
    key: String,
    value: String,
}

impl AuthParam {
    /// Builds a parameter for serialization.
    ///
    /// `key` must be a `token`; this is checked in debug builds only.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vigil::rfc7235::AuthParam;
    ///
    /// let param = AuthParam::new("realm", "say \"hi\"");
    /// assert_eq!(param.to_string(), "realm=\"say \\\"hi\\\"\"");
    /// ```
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        debug_assert!(is_token(&key), "auth-param key {key:?} is not a token");
        Self {
            key,
            value: value.into(),
        }
    }

    /// Builds a parameter from text read off the wire, stripping one pair of
    /// surrounding double quotes from the value if present.
    pub fn parse(key: &str, value: &str) -> Self {
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        Self {
            key: key.to_owned(),
            value: value.to_owned(),
        }
    }

    /// The parameter name, e.g. `realm`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The value, without surrounding quotes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vigil::rfc7235::AuthParam;
    ///
    /// let param = AuthParam::parse("realm", "\"my realm\"");
    /// assert_eq!(param.value(), "my realm");
    /// ```
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for AuthParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=\"", self.key)?;
        for c in self.value.chars() {
            if matches!(c, '"' | '\\') {
                f.write_str("\\")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str("\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_strips_one_pair_of_quotes() {
        assert_eq!(AuthParam::parse("realm", "\"api\"").value(), "api");
        assert_eq!(AuthParam::parse("realm", "api").value(), "api");
        assert_eq!(AuthParam::parse("opaque", "\"\"").value(), "");
        assert_eq!(AuthParam::parse("odd", "\"").value(), "\"");
        assert_eq!(AuthParam::parse("half", "\"api").value(), "\"api");
    }

    #[test]
    fn display_quotes_and_escapes() {
        assert_eq!(AuthParam::new("realm", "api").to_string(), "realm=\"api\"");
        assert_eq!(
            AuthParam::new("realm", "a\"b").to_string(),
            "realm=\"a\\\"b\""
        );
        assert_eq!(
            AuthParam::new("path", "c:\\dir").to_string(),
            "path=\"c:\\\\dir\""
        );
    }

    #[test]
    fn parsed_values_are_requoted_on_display() {
        let param = AuthParam::parse("nonce", "\"9c58\"");
        assert_eq!(param.to_string(), "nonce=\"9c58\"");
    }
}
