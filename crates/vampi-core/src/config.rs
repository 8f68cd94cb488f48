//! Runtime configuration for `VAmPI`.
//!
//! Resolved once at startup from environment variables and passed by value
//! to everything that needs it. Resolution never fails: a variable that is
//! absent, empty, or malformed resolves to its default, because the host
//! process must always be able to start.

/// Default token lifetime in seconds.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 60;
/// Default listen port.
pub const DEFAULT_LISTEN_PORT: u16 = 5050;
/// Default environment label.
pub const DEFAULT_ENVIRONMENT: &str = "local";
/// Default deployment label.
pub const DEFAULT_DEPLOYMENT: &str = "develop";

/// Immutable configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Whether intentionally insecure request handling is enabled.
    pub vulnerable_mode: bool,
    /// Lifetime of issued auth tokens, always greater than zero.
    pub token_ttl_secs: u64,
    /// Port the HTTP listener binds to, never zero.
    pub listen_port: u16,
    /// Name of the deployment environment (e.g. `production`).
    pub environment_label: String,
    /// Best-effort identity of the deployed build (e.g. a branch name).
    pub deployment_label: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            vulnerable_mode: false,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            listen_port: DEFAULT_LISTEN_PORT,
            environment_label: DEFAULT_ENVIRONMENT.to_owned(),
            deployment_label: DEFAULT_DEPLOYMENT.to_owned(),
        }
    }
}

impl RuntimeConfig {
    /// Resolve configuration from the process environment.
    ///
    /// Environment variables:
    /// - `vulnerable` — integer, non-zero enables vulnerable mode; `true`/`false` also accepted (default: disabled)
    /// - `tokentimetolive` — token lifetime in seconds, positive (default: `60`)
    /// - `PORT` — listen port, 1-65535 (default: `5050`)
    /// - `RAILWAY_ENVIRONMENT` — environment label (default: `local`)
    /// - `RAILWAY_GIT_BRANCH` — deployment label (default: `develop`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn resolve<F>(read: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let vulnerable_mode = read("vulnerable")
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.vulnerable_mode);

        let token_ttl_secs = read("tokentimetolive")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|ttl| *ttl > 0)
            .unwrap_or(defaults.token_ttl_secs);

        let listen_port = read("PORT")
            .and_then(|v| v.trim().parse::<u16>().ok())
            .filter(|port| *port != 0)
            .unwrap_or(defaults.listen_port);

        let environment_label =
            non_empty(read("RAILWAY_ENVIRONMENT")).unwrap_or(defaults.environment_label);

        let deployment_label =
            non_empty(read("RAILWAY_GIT_BRANCH")).unwrap_or(defaults.deployment_label);

        Self {
            vulnerable_mode,
            token_ttl_secs,
            listen_port,
            environment_label,
            deployment_label,
        }
    }
}

/// Integers are flags (non-zero is on); `true`/`false` are accepted too.
fn parse_flag(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n != 0);
    }
    match raw.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn resolve(vars: &[(&str, &str)]) -> RuntimeConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        RuntimeConfig::resolve(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = resolve(&[]);
        assert_eq!(config, RuntimeConfig::default());
        assert!(!config.vulnerable_mode);
        assert_eq!(config.token_ttl_secs, 60);
        assert_eq!(config.listen_port, 5050);
        assert_eq!(config.environment_label, "local");
    }

    #[test]
    fn port_is_parsed() {
        assert_eq!(resolve(&[("PORT", "8080")]).listen_port, 8080);
    }

    #[test]
    fn malformed_port_falls_back() {
        assert_eq!(resolve(&[("PORT", "not-a-number")]).listen_port, 5050);
        assert_eq!(resolve(&[("PORT", "0")]).listen_port, 5050);
        assert_eq!(resolve(&[("PORT", "70000")]).listen_port, 5050);
        assert_eq!(resolve(&[("PORT", "-1")]).listen_port, 5050);
    }

    #[test]
    fn token_ttl_must_be_positive() {
        assert_eq!(resolve(&[("tokentimetolive", "300")]).token_ttl_secs, 300);
        assert_eq!(resolve(&[("tokentimetolive", "0")]).token_ttl_secs, 60);
        assert_eq!(resolve(&[("tokentimetolive", "soon")]).token_ttl_secs, 60);
        assert_eq!(resolve(&[("tokentimetolive", "")]).token_ttl_secs, 60);
    }

    #[test]
    fn vulnerable_flag_accepts_integers_and_booleans() {
        assert!(resolve(&[("vulnerable", "1")]).vulnerable_mode);
        assert!(resolve(&[("vulnerable", "2")]).vulnerable_mode);
        assert!(resolve(&[("vulnerable", "TRUE")]).vulnerable_mode);
        assert!(!resolve(&[("vulnerable", "0")]).vulnerable_mode);
        assert!(!resolve(&[("vulnerable", "false")]).vulnerable_mode);
        assert!(!resolve(&[("vulnerable", "maybe")]).vulnerable_mode);
    }

    #[test]
    fn whitespace_is_trimmed() {
        let config = resolve(&[("PORT", " 9000 "), ("vulnerable", " 1 ")]);
        assert_eq!(config.listen_port, 9000);
        assert!(config.vulnerable_mode);
    }

    #[test]
    fn labels_ignore_blank_values() {
        let config = resolve(&[
            ("RAILWAY_ENVIRONMENT", "production"),
            ("RAILWAY_GIT_BRANCH", "   "),
        ]);
        assert_eq!(config.environment_label, "production");
        assert_eq!(config.deployment_label, "develop");
    }
}
