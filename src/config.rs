//! Environment configuration.
//!
//! Every field can be set through a `VIGIL_`-prefixed variable:
//!
//! | variable        | default          |
//! |-----------------|------------------|
//! | `VIGIL_BIND`    | `127.0.0.1:8080` |
//! | `VIGIL_REALM`   | `Restricted`     |
//! | `VIGIL_CHARSET` | `UTF-8`          |
//! | `VIGIL_USERS`   | empty            |
//!
//! `VIGIL_USERS` is a comma separated list of `user:password` entries.

use anyhow::{Context, bail};
use serde::Deserialize;

use crate::auth::basic::{DEFAULT_CHARSET, DEFAULT_REALM, StaticUsers};

pub const ENV_PREFIX: &str = "VIGIL_";

/// Process configuration, see the module docs for the variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_realm")]
    pub realm: String,
    #[serde(default = "default_charset")]
    pub charset: String,
    #[serde(default)]
    pub users: Vec<String>,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_owned()
}

fn default_realm() -> String {
    DEFAULT_REALM.to_owned()
}

fn default_charset() -> String {
    DEFAULT_CHARSET.to_owned()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            realm: default_realm(),
            charset: default_charset(),
            users: Vec::new(),
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        envy::prefixed(ENV_PREFIX)
            .from_env()
            .context("invalid VIGIL_* environment")
    }

    /// Reads the configuration from explicit `VIGIL_*` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter(pairs.into_iter().map(|(k, v)| (k.into(), v.into())))
            .context("invalid VIGIL_* configuration")
    }

    /// Builds the user table from `users`.
    pub fn static_users(&self) -> anyhow::Result<StaticUsers> {
        let mut users = StaticUsers::default();
        for entry in &self.users {
            let Some((user, pass)) = entry.split_once(':') else {
                bail!("user entry `{entry}` is not of the form user:password");
            };
            if user.is_empty() {
                bail!("user entry `{entry}` has an empty user name");
            }
            users.insert(user, pass);
        }
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_pairs(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.realm, "Restricted");
        assert_eq!(config.charset, "UTF-8");
    }

    #[test]
    fn reads_prefixed_pairs() {
        let config = Config::from_pairs([
            ("VIGIL_BIND", "0.0.0.0:9000"),
            ("VIGIL_REALM", "ops"),
            ("VIGIL_CHARSET", "ISO-8859-1"),
            ("VIGIL_USERS", "alice:a,bob:b:c"),
            ("OTHER_REALM", "ignored"),
        ])
        .unwrap();

        assert_eq!(config.bind, "0.0.0.0:9000");
        assert_eq!(config.realm, "ops");
        assert_eq!(config.charset, "ISO-8859-1");
        assert_eq!(config.users, ["alice:a", "bob:b:c"]);
        assert_eq!(config.static_users().unwrap().len(), 2);
    }

    #[test]
    fn malformed_user_entry_is_an_error() {
        let config = Config {
            users: vec!["alice".to_owned()],
            ..Config::default()
        };
        let err = config.static_users().unwrap_err();
        assert!(err.to_string().contains("alice"));

        let config = Config {
            users: vec![":pw".to_owned()],
            ..Config::default()
        };
        assert!(config.static_users().is_err());
    }
}
