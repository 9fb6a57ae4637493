//! Shared configuration for northgrid.
//!
//! TOML profiles, bearer-token resolution (env + keyring + plaintext),
//! and translation to `northgrid_core::ClientConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use northgrid_core::{ClientConfig, DEFAULT_ENDPOINT, ListFailurePolicy, TlsVerification};

/// Keyring service name; entries are keyed `<profile>/token`.
pub const KEYRING_SERVICE: &str = "northgrid";

/// Env var consulted when a profile names no `token_env` of its own.
pub const TOKEN_ENV: &str = "NORTHGRID_TOKEN";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is given on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named endpoint profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Pick the profile name: explicit choice, then `default_profile`, then "default".
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(ToOwned::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    /// Look up a profile. A missing profile falls back to the built-in defaults.
    pub fn profile(&self, name: &str) -> Profile {
        self.profiles.get(name).cloned().unwrap_or_else(|| {
            debug!(profile = name, "profile not in config; using built-in defaults");
            Profile::default()
        })
    }
}

/// Values applied to every profile that doesn't override them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub strict_list_errors: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
            strict_list_errors: false,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// A named customers endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Collection URL (e.g., "https://localhost:7244/customers").
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer token (plaintext; prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the bearer token.
    pub token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout, in seconds.
    pub timeout: Option<u64>,

    /// Show list-fetch failures instead of silently emptying the grid.
    pub strict_list_errors: Option<bool>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
            token_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            strict_list_errors: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_ENDPOINT.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "northgrid", "northgrid").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("northgrid");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
///
/// `NORTHGRID_` env vars override file values; nested keys use `__`
/// (e.g. `NORTHGRID_DEFAULTS__TIMEOUT=10`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NORTHGRID_").split("__"));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), profiles = config.profiles.len(), "config loaded");
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the bearer token from the credential chain (no CLI flag step).
///
/// Order: the profile's `token_env`, `NORTHGRID_TOKEN`, the system keyring,
/// then the plaintext `token`. `None` means requests go out with an empty
/// bearer token.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    resolve_token_with(profile, profile_name, |name| std::env::var(name).ok())
}

fn resolve_token_with(
    profile: &Profile,
    profile_name: &str,
    lookup_env: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    // 1. Profile's token_env → env var lookup
    if let Some(val) = profile.token_env.as_deref().and_then(&lookup_env) {
        debug!(profile = profile_name, "token from profile env var");
        return Some(SecretString::from(val));
    }

    // 2. Global env var
    if let Some(val) = lookup_env(TOKEN_ENV) {
        debug!(profile = profile_name, "token from {TOKEN_ENV}");
        return Some(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token")) {
        if let Ok(secret) = entry.get_password() {
            debug!(profile = profile_name, "token from keyring");
            return Some(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    profile.token.clone().map(SecretString::from)
}

// ── Translation to the runtime config ───────────────────────────────

/// Build a `ClientConfig` from a profile and the global defaults.
///
/// `token_override` (the CLI flag) wins over the whole credential chain.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    token_override: Option<SecretString>,
) -> Result<ClientConfig, ConfigError> {
    let endpoint: url::Url = profile
        .api_url
        .parse()
        .map_err(|e| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL '{}': {e}", profile.api_url),
        })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let list_failure = if profile
        .strict_list_errors
        .unwrap_or(defaults.strict_list_errors)
    {
        ListFailurePolicy::Strict
    } else {
        ListFailurePolicy::Lenient
    };

    let mut config = ClientConfig::new(endpoint);
    config.token = token_override.or_else(|| resolve_token(profile, profile_name));
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.list_failure = list_failure;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const UNUSED_PROFILE: &str = "northgrid-test-no-keyring-entry";

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.active_profile_name(None), "default");
        assert!(config.profiles.is_empty());
        assert_eq!(config.profile("default").api_url, DEFAULT_ENDPOINT);
    }

    #[test]
    fn profiles_load_from_toml() {
        let (_dir, path) = write_config(
            r#"
default_profile = "staging"

[defaults]
timeout = 5

[profiles.staging]
api_url = "https://staging.example.com/customers"
token_env = "STAGING_TOKEN"
strict_list_errors = true
"#,
        );
        let config = load_config_from(&path).unwrap();

        assert_eq!(config.active_profile_name(None), "staging");
        assert_eq!(config.active_profile_name(Some("local")), "local");
        assert_eq!(config.defaults.timeout, 5);
        let staging = config.profile("staging");
        assert_eq!(staging.api_url, "https://staging.example.com/customers");
        assert_eq!(staging.token_env.as_deref(), Some("STAGING_TOKEN"));
        assert_eq!(staging.strict_list_errors, Some(true));
    }

    #[test]
    fn profile_env_var_wins_over_global_and_plaintext() {
        let profile = Profile {
            token_env: Some("MY_TOKEN".into()),
            token: Some("plaintext".into()),
            ..Profile::default()
        };
        let token = resolve_token_with(&profile, UNUSED_PROFILE, |name| match name {
            "MY_TOKEN" => Some("from-profile-env".into()),
            TOKEN_ENV => Some("from-global-env".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(token.expose_secret(), "from-profile-env");
    }

    #[test]
    fn global_env_var_used_when_profile_var_unset() {
        let profile = Profile {
            token_env: Some("MY_TOKEN".into()),
            ..Profile::default()
        };
        let token = resolve_token_with(&profile, UNUSED_PROFILE, |name| {
            (name == TOKEN_ENV).then(|| "from-global-env".into())
        })
        .unwrap();
        assert_eq!(token.expose_secret(), "from-global-env");
    }

    #[test]
    fn plaintext_token_is_last_resort() {
        let profile = Profile {
            token: Some("plaintext".into()),
            ..Profile::default()
        };
        let token = resolve_token_with(&profile, UNUSED_PROFILE, |_| None).unwrap();
        assert_eq!(token.expose_secret(), "plaintext");
    }

    #[test]
    fn client_config_applies_overrides() {
        let profile = Profile {
            api_url: "https://api.example.com/customers".into(),
            timeout: Some(7),
            strict_list_errors: Some(true),
            ..Profile::default()
        };
        let config = profile_to_client_config(
            &profile,
            UNUSED_PROFILE,
            &Defaults::default(),
            Some(SecretString::from("cli-token")),
        )
        .unwrap();

        assert_eq!(config.endpoint.as_str(), "https://api.example.com/customers");
        assert_eq!(config.timeout, Duration::from_secs(7));
        assert_eq!(config.list_failure, ListFailurePolicy::Strict);
        assert_eq!(config.tls, TlsVerification::SystemDefaults);
        assert_eq!(config.token.unwrap().expose_secret(), "cli-token");
    }

    #[test]
    fn insecure_default_beats_ca_cert() {
        let profile = Profile {
            ca_cert: Some("/etc/ssl/northgrid.pem".into()),
            ..Profile::default()
        };
        let defaults = Defaults {
            insecure: true,
            ..Defaults::default()
        };
        let config =
            profile_to_client_config(&profile, UNUSED_PROFILE, &defaults, None).unwrap();
        assert_eq!(config.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(config.list_failure, ListFailurePolicy::Lenient);
    }

    #[test]
    fn invalid_url_is_a_validation_error() {
        let profile = Profile {
            api_url: "not a url".into(),
            ..Profile::default()
        };
        let err = profile_to_client_config(&profile, UNUSED_PROFILE, &Defaults::default(), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "api_url"));
    }
}
