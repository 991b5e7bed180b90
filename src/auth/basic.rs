//! HTTP Basic authentication (RFC 7617).
//!
//! [`BasicAuthenticator`] reads the `Authorization` header, decodes the `Basic`
//! credentials and asks a [`PasswordMatcher`] whether the username/password pair
//! is acceptable. Rejected requests get a `401 Unauthorized` carrying a
//! `WWW-Authenticate: Basic realm="...", charset="..."` challenge.
//!
//! # Examples
//!
//! ```rust
//! use vigil::auth::basic::{BasicAuthenticator, StaticUsers};
//! use vigil::types::Request;
//!
//! // Static users
//! let auth = BasicAuthenticator::new("Admin Area", StaticUsers::multiple([
//!     ("alice", "secret1"),
//!     ("bob", "secret2"),
//! ]));
//!
//! // Dynamic verification
//! let auth = BasicAuthenticator::new("api", |_realm: &str, user: &str, pass: &str, _req: &Request| {
//!     user == "admin" && pass == "admin"
//! });
//! ```

use std::{borrow::Cow, collections::HashMap, fmt};

use base64::{Engine, engine::general_purpose::STANDARD};
use http::{HeaderValue, header};
use tracing::{debug, warn};

use crate::{
    auth::{AuthOutcome, Authenticator, Denial},
    config::Config,
    rfc7235::{AuthParam, Challenge, Credentials, WwwAuthenticateHeader},
    types::Request,
};

/// Scheme name, compared case-insensitively.
pub const BASIC_SCHEME: &str = "Basic";

/// Charset advertised and used for decoding unless configured otherwise.
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// Realm used by [`Config`] when `VIGIL_REALM` is unset.
pub const DEFAULT_REALM: &str = "Restricted";

/// Checks a decoded username/password pair.
///
/// Implemented for closures taking `(realm, username, password, request)`.
pub trait PasswordMatcher: Send + Sync + 'static {
    fn match_password(&self, realm: &str, username: &str, password: &str, req: &Request) -> bool;
}

impl<F> PasswordMatcher for F
where
    F: Fn(&str, &str, &str, &Request) -> bool + Send + Sync + 'static,
{
    fn match_password(&self, realm: &str, username: &str, password: &str, req: &Request) -> bool {
        self(realm, username, password, req)
    }
}

/// In-memory username to password table.
#[derive(Clone, Default)]
pub struct StaticUsers {
    users: HashMap<String, String>,
}

impl StaticUsers {
    /// A table with one user.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vigil::auth::basic::StaticUsers;
    ///
    /// let users = StaticUsers::single("admin", "secret123");
    /// assert_eq!(users.len(), 1);
    /// ```
    pub fn single(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self::multiple(std::iter::once((user, pass)))
    }

    /// A table built from `(user, password)` pairs. Later duplicates win.
    pub fn multiple<I, T, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, P)>,
        T: Into<String>,
        P: Into<String>,
    {
        Self {
            users: pairs
                .into_iter()
                .map(|(u, p)| (u.into(), p.into()))
                .collect(),
        }
    }

    /// Adds or replaces the password of `user`.
    pub fn insert(&mut self, user: impl Into<String>, pass: impl Into<String>) {
        self.users.insert(user.into(), pass.into());
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl fmt::Debug for StaticUsers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.users.keys()).finish()
    }
}

impl PasswordMatcher for StaticUsers {
    fn match_password(&self, _realm: &str, username: &str, password: &str, _req: &Request) -> bool {
        self.users.get(username).is_some_and(|p| p == password)
    }
}

/// Character encodings accepted for decoded credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Utf8,
    Latin1,
    Ascii,
}

impl Charset {
    /// Resolves an encoding label, ignoring ASCII case.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(Charset::Utf8),
            "iso-8859-1" | "iso8859-1" | "iso_8859-1" | "latin1" | "l1" => Some(Charset::Latin1),
            "us-ascii" | "ascii" => Some(Charset::Ascii),
            _ => None,
        }
    }

    /// Decodes `bytes`, failing on sequences the encoding cannot represent.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Charset::Utf8 => String::from_utf8(bytes.to_vec()).ok(),
            Charset::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            Charset::Ascii => bytes
                .is_ascii()
                .then(|| bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

/// Why a Basic token68 could not be turned into a username and password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("credentials are not valid base64")]
    InvalidBase64,
    #[error("unsupported charset `{0}`")]
    UnsupportedCharset(String),
    #[error("credentials are not valid in the configured charset")]
    InvalidText,
    #[error("credentials have no `:` separator")]
    MissingColon,
}

/// Decoded `user-id:password` pair.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Decodes a Basic token68 into username and password.
///
/// Missing `=` padding is restored before decoding. The password is everything
/// after the first `:`, so it may itself contain colons or be empty.
pub fn decode_token68(token68: &str, charset: &str) -> Result<BasicCredentials, DecodeError> {
    let charset = Charset::from_label(charset)
        .ok_or_else(|| DecodeError::UnsupportedCharset(charset.to_owned()))?;

    let bytes = STANDARD
        .decode(pad(token68).as_bytes())
        .map_err(|_| DecodeError::InvalidBase64)?;
    let text = charset.decode(&bytes).ok_or(DecodeError::InvalidText)?;

    let (username, password) = text.split_once(':').ok_or(DecodeError::MissingColon)?;
    Ok(BasicCredentials {
        username: username.to_owned(),
        password: password.to_owned(),
    })
}

fn pad(token68: &str) -> Cow<'_, str> {
    match token68.len() % 4 {
        0 => Cow::Borrowed(token68),
        rem => {
            let mut padded = String::with_capacity(token68.len() + 4 - rem);
            padded.push_str(token68);
            padded.extend(std::iter::repeat_n('=', 4 - rem));
            Cow::Owned(padded)
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum Rejection {
    #[error("missing Authorization header")]
    MissingHeader,
    #[error("Authorization header is not valid credentials")]
    Malformed,
    #[error("scheme `{0}` is not Basic")]
    WrongScheme(String),
    #[error("Basic credentials carry no token68")]
    MissingToken68,
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("password rejected for `{0}`")]
    BadPassword(String),
}

/// Authenticator for the `Basic` scheme.
pub struct BasicAuthenticator<M> {
    realm: String,
    charset: String,
    challenge: Challenge,
    challenge_header: Option<HeaderValue>,
    matcher: M,
}

impl<M> BasicAuthenticator<M>
where
    M: PasswordMatcher,
{
    /// Creates an authenticator that decodes credentials as UTF-8.
    pub fn new(realm: impl Into<String>, matcher: M) -> Self {
        Self::with_charset(realm, DEFAULT_CHARSET, matcher)
    }

    /// Creates an authenticator with an explicit charset label.
    ///
    /// The label is also advertised in the challenge. An unknown label is accepted
    /// here but every request will then be denied.
    pub fn with_charset(realm: impl Into<String>, charset: impl Into<String>, matcher: M) -> Self {
        let realm = realm.into();
        let charset = charset.into();

        if Charset::from_label(&charset).is_none() {
            warn!(%charset, "unsupported charset for basic authentication");
        }

        let challenge = Challenge::with_params(
            BASIC_SCHEME,
            [
                AuthParam::new("realm", realm.as_str()),
                AuthParam::new("charset", charset.as_str()),
            ],
        );
        let challenge_header = match WwwAuthenticateHeader::from(challenge.clone()).to_header_value()
        {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%realm, "basic challenge is not a valid header value, it will not be sent");
                None
            }
        };

        Self {
            realm,
            charset,
            challenge,
            challenge_header,
            matcher,
        }
    }

    /// Creates an authenticator from the realm and charset of `config`.
    pub fn from_config(config: &Config, matcher: M) -> Self {
        Self::with_charset(config.realm.as_str(), config.charset.as_str(), matcher)
    }

    /// The realm advertised in the challenge.
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Charset used to decode credentials and advertised in the challenge.
    pub fn charset(&self) -> &str {
        &self.charset
    }

    /// The challenge sent with every denial.
    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    /// Decodes `token68` with this authenticator's charset.
    pub fn decode_token68(&self, token68: &str) -> Result<BasicCredentials, DecodeError> {
        decode_token68(token68, &self.charset)
    }

    fn verify(&self, req: &Request) -> Result<(), Rejection> {
        let value = req
            .headers()
            .get(header::AUTHORIZATION)
            .ok_or(Rejection::MissingHeader)?;
        let credentials = Credentials::from_header(value).ok_or(Rejection::Malformed)?;

        if !credentials.is_scheme(BASIC_SCHEME) {
            return Err(Rejection::WrongScheme(credentials.scheme().to_owned()));
        }
        let token68 = credentials.token68().ok_or(Rejection::MissingToken68)?;
        let basic = self.decode_token68(token68)?;

        if self
            .matcher
            .match_password(&self.realm, &basic.username, &basic.password, req)
        {
            debug!(username = %basic.username, realm = %self.realm, "basic authentication succeeded");
            Ok(())
        } else {
            Err(Rejection::BadPassword(basic.username))
        }
    }

    fn denial(&self) -> Denial {
        let mut denial = Denial::unauthorized();
        if let Some(value) = &self.challenge_header {
            denial.add_header_value(header::WWW_AUTHENTICATE, value.clone());
        }
        denial
    }
}

impl<M> Authenticator for BasicAuthenticator<M>
where
    M: PasswordMatcher,
{
    fn authenticate_request(&self, req: &Request) -> AuthOutcome {
        match self.verify(req) {
            Ok(()) => AuthOutcome::Allowed,
            Err(Rejection::Decode(DecodeError::UnsupportedCharset(charset))) => {
                warn!(%charset, realm = %self.realm, "cannot decode basic credentials");
                AuthOutcome::Denied(self.denial())
            }
            Err(reason) => {
                debug!(%reason, realm = %self.realm, "basic authentication rejected");
                AuthOutcome::Denied(self.denial())
            }
        }
    }
}

impl<M> fmt::Debug for BasicAuthenticator<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthenticator")
            .field("realm", &self.realm)
            .field("charset", &self.charset)
            .finish_non_exhaustive()
    }
}
