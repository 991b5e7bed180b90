//! `WWW-Authenticate` header value (RFC 7235 section 4.1).
//!
//! ```text
//! WWW-Authenticate = 1#challenge
//! ```

use std::fmt;

use http::{HeaderValue, header::InvalidHeaderValue};

use super::Challenge;

/// An ordered list of challenges rendered as a single `WWW-Authenticate` value.
///
/// Insertion order is kept and duplicates are allowed.
///
/// # Examples
///
/// ```rust
/// use vigil::rfc7235::{Challenge, WwwAuthenticateHeader};
///
/// let mut header = WwwAuthenticateHeader::new();
/// let mut basic = Challenge::new("Basic");
/// basic.add_param("realm", "api");
/// header.add_challenge(basic);
/// header.add_challenge(Challenge::new("Negotiate"));
///
/// assert_eq!(header.to_string(), "Basic realm=\"api\", Negotiate");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WwwAuthenticateHeader {
    challenges: Vec<Challenge>,
}

impl WwwAuthenticateHeader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a challenge after the existing ones.
    pub fn add_challenge(&mut self, challenge: Challenge) {
        self.challenges.push(challenge);
    }

    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    /// Renders the header as an HTTP header value.
    ///
    /// Fails if a realm or other parameter holds bytes that are not allowed in a
    /// header value, such as a line break.
    pub fn to_header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.to_string())
    }
}

impl From<Challenge> for WwwAuthenticateHeader {
    fn from(challenge: Challenge) -> Self {
        Self {
            challenges: vec![challenge],
        }
    }
}

impl FromIterator<Challenge> for WwwAuthenticateHeader {
    fn from_iter<I: IntoIterator<Item = Challenge>>(iter: I) -> Self {
        Self {
            challenges: iter.into_iter().collect(),
        }
    }
}

impl Extend<Challenge> for WwwAuthenticateHeader {
    fn extend<I: IntoIterator<Item = Challenge>>(&mut self, iter: I) {
        self.challenges.extend(iter);
    }
}

impl fmt::Display for WwwAuthenticateHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, challenge) in self.challenges.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{challenge}")?;
        }
        Ok(())
    }
}
