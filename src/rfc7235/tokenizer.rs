//! `Authorization` header tokenizer.
//!
//! Parsing runs in two passes. The lexer splits the raw header value into candidate
//! tokens: at every position it measures the `auth-param`, `token68` and `token`
//! that start there and keeps the longest one, preferring them in that order on a
//! tie. Bytes that start none of them (spaces, commas, stray quotes) separate
//! tokens and are dropped. A small state machine then assembles the tokens into
//! [`Credentials`].
//!
//! Exactly one scheme is read per header value. For example
//! `Basic 789ab824bed8db7da11b2= realm="x"` lexes into
//! `[Basic, 789ab824bed8db7da11b2=, realm="x"]` and is rejected because nothing may
//! follow a `token68`.

use super::{
    Credentials, auth_param_len, extract_auth_param, is_token, is_token68, token_len,
    token68_len,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    Begin,
    Scheme,
    Token68,
    AuthParams,
}

/// Parses an `Authorization` header value into [`Credentials`].
///
/// Returns `None` for an empty value and for any grammar violation; callers cannot
/// and should not distinguish the two.
///
/// # Examples
///
/// ```rust
/// use vigil::rfc7235::extract_credentials;
///
/// let basic = extract_credentials("Basic 789ab824bed8db7da11b2=").unwrap();
/// assert_eq!(basic.token68(), Some("789ab824bed8db7da11b2="));
///
/// let digest = extract_credentials("Digest realm=\"api\", nonce=\"9c58\"").unwrap();
/// assert_eq!(digest.param("nonce"), Some("9c58"));
///
/// assert!(extract_credentials("Digest realm=\"api\", nonce").is_none());
/// ```
pub fn extract_credentials(header: &str) -> Option<Credentials> {
    let mut credentials: Option<Credentials> = None;
    let mut state = ReadState::Begin;

    for token in tokenize(header) {
        match state {
            ReadState::Begin => {
                if !is_token(token) {
                    return None;
                }
                credentials = Some(Credentials::new(token));
                state = ReadState::Scheme;
            }
            ReadState::Scheme => {
                let creds = credentials.as_mut()?;
                if is_token68(token) {
                    if !creds.set_token68(token) {
                        return None;
                    }
                    state = ReadState::Token68;
                } else {
                    creds.add_auth_param(extract_auth_param(token)?);
                    state = ReadState::AuthParams;
                }
            }
            ReadState::Token68 => return None,
            ReadState::AuthParams => {
                let param = extract_auth_param(token)?;
                credentials.as_mut()?.add_auth_param(param);
            }
        }
    }

    credentials
}

/// Splits a header value into lexical tokens.
pub(crate) fn tokenize(input: &str) -> Vec<&str> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        match longest_match(&bytes[pos..]) {
            Some(len) => {
                // Matches begin and end on ASCII bytes, so these are char boundaries.
                tokens.push(&input[pos..pos + len]);
                pos += len;
            }
            None => pos += 1,
        }
    }

    tokens
}

fn longest_match(bytes: &[u8]) -> Option<usize> {
    let auth_param = auth_param_len(bytes).unwrap_or(0);
    let token68 = token68_len(bytes);
    let token = token_len(bytes);

    let mut best = auth_param;
    if token68 > best {
        best = token68;
    }
    if token > best {
        best = token;
    }
    (best > 0).then_some(best)
}
