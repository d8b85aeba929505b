use stocker_core::messages::Locale;

use crate::auth::session::SessionConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Language of user-facing messages.
    pub locale: Locale,
    /// Session lifetime and cookie flags.
    pub session: SessionConfig,
    /// Account rules (login, sign-up, demo account).
    pub accounts: AccountPolicy,
    /// Administrator created at startup when no user with that name exists.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Rules applied to login, sign-up and the shared demo account.
#[derive(Debug, Clone)]
pub struct AccountPolicy {
    /// Login must present the user's family (group) id.
    pub require_group_on_login: bool,
    /// Whether `POST /auth/register` is open.
    pub allow_signup: bool,
    /// Username of the shared demo account.
    pub demo_username: String,
    /// Maximum number of items the demo account may own.
    pub demo_item_limit: i64,
}

impl Default for AccountPolicy {
    fn default() -> Self {
        Self {
            require_group_on_login: true,
            allow_signup: false,
            demo_username: "demo".to_string(),
            demo_item_limit: 20,
        }
    }
}

/// Credentials for the startup administrator.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
    pub group_id: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `3000`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `APP_ENV`                  | `development`           |
    /// | `APP_LOCALE`               | `en`                    |
    /// | `SESSION_TTL_DAYS`         | `30`                    |
    /// | `REQUIRE_GROUP_ON_LOGIN`   | `true`                  |
    /// | `ALLOW_SIGNUP`             | `false`                 |
    /// | `DEMO_USERNAME`            | `demo`                  |
    /// | `DEMO_ITEM_LIMIT`          | `20`                    |
    /// | `BOOTSTRAP_ADMIN_USERNAME` | unset                   |
    /// | `BOOTSTRAP_ADMIN_PASSWORD` | unset                   |
    /// | `BOOTSTRAP_ADMIN_GROUP`    | unset                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let production = std::env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let locale: Locale = std::env::var("APP_LOCALE")
            .unwrap_or_else(|_| "en".into())
            .parse()
            .expect("APP_LOCALE must be 'en' or 'ja'");

        let defaults = AccountPolicy::default();
        let accounts = AccountPolicy {
            require_group_on_login: env_flag(
                "REQUIRE_GROUP_ON_LOGIN",
                defaults.require_group_on_login,
            ),
            allow_signup: env_flag("ALLOW_SIGNUP", defaults.allow_signup),
            demo_username: std::env::var("DEMO_USERNAME").unwrap_or(defaults.demo_username),
            demo_item_limit: std::env::var("DEMO_ITEM_LIMIT")
                .map(|v| v.parse().expect("DEMO_ITEM_LIMIT must be a valid i64"))
                .unwrap_or(defaults.demo_item_limit),
        };

        let bootstrap_admin = match (
            std::env::var("BOOTSTRAP_ADMIN_USERNAME"),
            std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) if !username.is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin {
                    username,
                    password,
                    group_id: std::env::var("BOOTSTRAP_ADMIN_GROUP")
                        .ok()
                        .filter(|g| !g.trim().is_empty()),
                })
            }
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            locale,
            session: SessionConfig::from_env(production),
            accounts,
            bootstrap_admin,
        }
    }
}

/// Read a boolean env var (`true`/`false`/`1`/`0`), falling back to `default`.
fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            other => panic!("{name} must be a boolean, got '{other}'"),
        },
        Err(_) => default,
    }
}
