//! RFC 7235 authentication header grammar.
//!
//! This module implements the pieces of the HTTP authentication framework that are
//! shared by every scheme: the `token`, `token68` and `auth-param` productions, the
//! `Challenge` / `Credentials` values built from them, the `Authorization` header
//! tokenizer and the `WWW-Authenticate` header serializer.
//!
//! ```text
//! credentials    = auth-scheme [ 1*SP ( token68 / #auth-param ) ]
//! challenge      = auth-scheme [ 1*SP ( token68 / #auth-param ) ]
//! auth-scheme    = token
//! auth-param     = token BWS "=" BWS ( token / quoted-string )
//! token          = 1*tchar
//! tchar          = "!" / "#" / "$" / "%" / "&" / "'" / "*" / "+" / "-" / "."
//!                / "^" / "_" / "`" / "|" / "~" / DIGIT / ALPHA
//! token68        = 1*( ALPHA / DIGIT / "-" / "." / "_" / "~" / "+" / "/" ) *"="
//! ```
//!
//! # Examples
//!
//! ```rust
//! use vigil::rfc7235::{Challenge, AuthParam, extract_credentials};
//!
//! let credentials = extract_credentials("Basic dXNlcjpwYXNz").unwrap();
//! assert_eq!(credentials.scheme(), "Basic");
//! assert_eq!(credentials.token68(), Some("dXNlcjpwYXNz"));
//!
//! let challenge = Challenge::with_params("Digest", [AuthParam::new("realm", "api")]);
//! assert_eq!(challenge.to_string(), "Digest realm=\"api\"");
//! ```

pub mod auth_param;
pub mod challenge;
pub mod tokenizer;
pub mod www_authenticate;

pub use auth_param::AuthParam;
pub use challenge::{Challenge, Credentials};
pub use tokenizer::extract_credentials;
pub use www_authenticate::WwwAuthenticateHeader;

/// Returns `true` if `b` is an RFC 7230 `tchar`.
#[inline]
pub(crate) fn is_tchar(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'.'
                | b'^'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
        )
}

/// Returns `true` if `b` may appear before the padding of a `token68`.
#[inline]
pub(crate) fn is_token68_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~' | b'+' | b'/')
}

/// Length of the run of `tchar` bytes at the start of `bytes`.
pub(crate) fn token_len(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| is_tchar(**b)).count()
}

/// Length of the `token68` at the start of `bytes`, or zero if there is none.
pub(crate) fn token68_len(bytes: &[u8]) -> usize {
    let body = bytes.iter().take_while(|b| is_token68_char(**b)).count();
    if body == 0 {
        return 0;
    }
    body + bytes[body..].iter().take_while(|b| **b == b'=').count()
}

/// Length of the `auth-param` at the start of `bytes`, if one starts there.
///
/// The value is either a `token` or a quoted string whose content is any run of
/// bytes other than `"`. Escaped quotes are not recognised.
pub(crate) fn auth_param_len(bytes: &[u8]) -> Option<usize> {
    let key = token_len(bytes);
    if key == 0 || bytes.get(key) != Some(&b'=') {
        return None;
    }

    let rest = &bytes[key + 1..];
    let value = token_len(rest);
    if value > 0 {
        return Some(key + 1 + value);
    }

    if rest.first() != Some(&b'"') {
        return None;
    }
    rest[1..]
        .iter()
        .position(|b| *b == b'"')
        .map(|close| key + 1 + close + 2)
}

/// Checks whether `s` is a valid RFC 7230 `token`.
///
/// # Examples
///
/// ```rust
/// use vigil::rfc7235::is_token;
///
/// assert!(is_token("Basic"));
/// assert!(is_token("x-custom!scheme"));
/// assert!(!is_token("Basic\""));
/// assert!(!is_token(""));
/// ```
pub fn is_token(s: &str) -> bool {
    !s.is_empty() && token_len(s.as_bytes()) == s.len()
}

/// Checks whether `s` is a valid RFC 7235 `token68`.
///
/// # Examples
///
/// ```rust
/// use vigil::rfc7235::is_token68;
///
/// assert!(is_token68("dXNlcjpwYXNz"));
/// assert!(is_token68("789ab824bed8db7da11b2="));
/// assert!(is_token68("a/b+c=="));
/// assert!(!is_token68("=abc"));
/// assert!(!is_token68("ab=c"));
/// ```
pub fn is_token68(s: &str) -> bool {
    !s.is_empty() && token68_len(s.as_bytes()) == s.len()
}

/// Checks whether `s` is exactly one `auth-param` (`token "=" token` or
/// `token "=" quoted-string`).
pub fn is_auth_param(s: &str) -> bool {
    auth_param_len(s.as_bytes()) == Some(s.len())
}

/// Splits an `auth-param` at its first `=` and builds an [`AuthParam`] from it,
/// stripping the quotes of a quoted value.
///
/// Returns `None` if `s` is not exactly one `auth-param`.
///
/// # Examples
///
/// ```rust
/// use vigil::rfc7235::extract_auth_param;
///
/// let param = extract_auth_param("realm=\"my realm\"").unwrap();
/// assert_eq!(param.key(), "realm");
/// assert_eq!(param.value(), "my realm");
///
/// assert!(extract_auth_param("realm").is_none());
/// ```
pub fn extract_auth_param(s: &str) -> Option<AuthParam> {
    if !is_auth_param(s) {
        return None;
    }
    let (key, value) = s.split_once('=')?;
    Some(AuthParam::parse(key, value))
}
