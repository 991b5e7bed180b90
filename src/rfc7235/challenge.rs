//! `challenge` and `credentials` values of RFC 7235 section 2.1.
//!
//! Both carry an authentication scheme followed by either a single `token68` or a
//! list of `auth-param`s, never both. The mutators below uphold that rule by
//! refusing the change and returning `false`.

use std::{
    fmt,
    ops::{Deref, DerefMut},
};

use super::{AuthParam, is_token, is_token68};

/// A server-issued challenge, sent in `WWW-Authenticate`.
///
/// # Examples
///
/// ```rust
/// use vigil::rfc7235::{AuthParam, Challenge};
///
/// let basic = Challenge::with_token68("Basic", "dGVzdA==");
/// assert_eq!(basic.to_string(), "Basic dGVzdA==");
///
/// let digest = Challenge::with_params(
///     "Digest",
///     [AuthParam::new("realm", "api"), AuthParam::new("nonce", "abc123")],
/// );
/// assert_eq!(digest.to_string(), "Digest realm=\"api\", nonce=\"abc123\"");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    scheme: String,
    token68: Option<String>,
    auth_params: Vec<AuthParam>,
}

impl Challenge {
    /// Creates a challenge carrying only a scheme.
    pub fn new(scheme: impl Into<String>) -> Self {
        let scheme = scheme.into();
        debug_assert!(is_token(&scheme), "auth-scheme {scheme:?} is not a token");
        Self {
            scheme,
            token68: None,
            auth_params: Vec::new(),
        }
    }

    /// Creates a challenge whose payload is a `token68`.
    ///
    /// `token68` must match the `token68` grammar; this is checked in debug builds
    /// only. Use [`Challenge::set_token68`] for values that are not trusted.
    pub fn with_token68(scheme: impl Into<String>, token68: impl Into<String>) -> Self {
        let token68 = token68.into();
        debug_assert!(is_token68(&token68), "token68 {token68:?} is not valid");
        let mut challenge = Self::new(scheme);
        challenge.token68 = Some(token68);
        challenge
    }

    /// Creates a challenge whose payload is an ordered list of parameters.
    pub fn with_params<I>(scheme: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = AuthParam>,
    {
        let mut challenge = Self::new(scheme);
        challenge.auth_params = params.into_iter().collect();
        challenge
    }

    /// The auth-scheme exactly as given, e.g. `Basic`.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The `token68` payload, if the challenge carries one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vigil::rfc7235::Challenge;
    ///
    /// assert_eq!(Challenge::with_token68("Basic", "dGVzdA==").token68(), Some("dGVzdA=="));
    /// assert_eq!(Challenge::new("Negotiate").token68(), None);
    /// ```
    pub fn token68(&self) -> Option<&str> {
        self.token68.as_deref()
    }

    /// Parameters in insertion order; empty when the challenge has none.
    pub fn auth_params(&self) -> &[AuthParam] {
        &self.auth_params
    }

    /// Looks up a parameter by key, ignoring ASCII case.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.auth_params
            .iter()
            .find(|p| p.key().eq_ignore_ascii_case(key))
            .map(AuthParam::value)
    }

    /// Sets the `token68`.
    ///
    /// Returns `false` and leaves `self` untouched if parameters are already present
    /// or if `token68` does not match the `token68` grammar.
    pub fn set_token68(&mut self, token68: impl Into<String>) -> bool {
        let token68 = token68.into();
        if !self.auth_params.is_empty() || !is_token68(&token68) {
            return false;
        }
        self.token68 = Some(token68);
        true
    }

    /// Replaces the parameter list.
    ///
    /// Returns `false` and leaves `self` untouched if a `token68` is present.
    pub fn set_auth_params<I>(&mut self, params: I) -> bool
    where
        I: IntoIterator<Item = AuthParam>,
    {
        if self.token68.is_some() {
            return false;
        }
        self.auth_params = params.into_iter().collect();
        true
    }

    /// Appends a parameter.
    ///
    /// Returns `false` and leaves `self` untouched if a `token68` is present.
    pub fn add_auth_param(&mut self, param: AuthParam) -> bool {
        if self.token68.is_some() {
            return false;
        }
        self.auth_params.push(param);
        true
    }

    /// Appends a `key="value"` parameter built with [`AuthParam::new`].
    pub fn add_param(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        self.add_auth_param(AuthParam::new(key, value))
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.scheme)?;
        if let Some(token68) = &self.token68 {
            return write!(f, " {token68}");
        }
        for (i, param) in self.auth_params.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, " {param}")?;
        }
        Ok(())
    }
}

/// Client-supplied credentials, read from `Authorization`.
///
/// Credentials have exactly the shape of a [`Challenge`] and dereference to one; the
/// separate type only records which side of the exchange the value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials(Challenge);

impl Credentials {
    /// Credentials carrying only a scheme.
    pub fn new(scheme: impl Into<String>) -> Self {
        Self(Challenge::new(scheme))
    }

    pub fn with_token68(scheme: impl Into<String>, token68: impl Into<String>) -> Self {
        Self(Challenge::with_token68(scheme, token68))
    }

    pub fn with_params<I>(scheme: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = AuthParam>,
    {
        Self(Challenge::with_params(scheme, params))
    }

    /// Parses an `Authorization` header value. See [`super::extract_credentials`].
    pub fn parse(header: &str) -> Option<Self> {
        super::extract_credentials(header)
    }

    /// Parses an `Authorization` header value that may hold non-visible bytes.
    pub fn from_header(value: &http::HeaderValue) -> Option<Self> {
        value.to_str().ok().and_then(Self::parse)
    }

    /// Returns `true` if the scheme equals `scheme`, ignoring ASCII case.
    pub fn is_scheme(&self, scheme: &str) -> bool {
        self.0.scheme.eq_ignore_ascii_case(scheme)
    }

    /// Unwraps the underlying [`Challenge`].
    pub fn into_inner(self) -> Challenge {
        self.0
    }
}

impl Deref for Credentials {
    type Target = Challenge;

    fn deref(&self) -> &Challenge {
        &self.0
    }
}

impl DerefMut for Credentials {
    fn deref_mut(&mut self) -> &mut Challenge {
        &mut self.0
    }
}

impl From<Challenge> for Credentials {
    fn from(challenge: Challenge) -> Self {
        Self(challenge)
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
