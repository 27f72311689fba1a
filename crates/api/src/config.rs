use featmgr_core::types::{LangId, ShopId};
use featmgr_db::tables::DEFAULT_TABLE_PREFIX;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development except
/// `database_url`, which must be provided.
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
    /// Time allowed for in-flight requests after a shutdown signal (default: `30`).
    pub shutdown_timeout_secs: u64,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Prefix shared by every catalog table (default: `ps_`).
    pub table_prefix: String,
    /// Language used when a request does not name one.
    pub default_lang_id: LangId,
    /// Shop used when a request does not name one.
    pub default_shop_id: ShopId,
    /// Apply `db/migrations` at startup (default: `false`).
    pub run_migrations: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `DATABASE_URL`         | required                   |
    /// | `DB_MAX_CONNECTIONS`   | `20`                       |
    /// | `TABLE_PREFIX`         | `ps_`                      |
    /// | `DEFAULT_LANG_ID`      | `1`                        |
    /// | `DEFAULT_SHOP_ID`      | `1`                        |
    /// | `RUN_MIGRATIONS`       | `false`                    |
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = env_or("SHUTDOWN_TIMEOUT_SECS", "30")
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let db_max_connections: u32 = env_or("DB_MAX_CONNECTIONS", "20")
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let table_prefix = env_or("TABLE_PREFIX", DEFAULT_TABLE_PREFIX);

        let default_lang_id: LangId = env_or("DEFAULT_LANG_ID", "1")
            .parse()
            .expect("DEFAULT_LANG_ID must be an integer");

        let default_shop_id: ShopId = env_or("DEFAULT_SHOP_ID", "1")
            .parse()
            .expect("DEFAULT_SHOP_ID must be an integer");

        let run_migrations = parse_flag(&env_or("RUN_MIGRATIONS", "false"));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            database_url,
            db_max_connections,
            table_prefix,
            default_lang_id,
            default_shop_id,
            run_migrations,
        }
    }

    /// Language to use for a request, falling back to the configured default
    /// when absent or not positive.
    pub fn lang_or_default(&self, id_lang: Option<LangId>) -> LangId {
        id_lang.filter(|&id| id > 0).unwrap_or(self.default_lang_id)
    }

    pub fn shop_or_default(&self, id_shop: Option<ShopId>) -> ShopId {
        id_shop.filter(|&id| id > 0).unwrap_or(self.default_shop_id)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: vec![],
            request_timeout_secs: 30,
            shutdown_timeout_secs: 30,
            database_url: String::new(),
            db_max_connections: 1,
            table_prefix: DEFAULT_TABLE_PREFIX.into(),
            default_lang_id: 1,
            default_shop_id: 3,
            run_migrations: false,
        }
    }

    #[test]
    fn missing_or_invalid_scope_falls_back_to_defaults() {
        let config = config();
        assert_eq!(config.lang_or_default(None), 1);
        assert_eq!(config.lang_or_default(Some(0)), 1);
        assert_eq!(config.lang_or_default(Some(2)), 2);
        assert_eq!(config.shop_or_default(Some(-5)), 3);
    }

    #[test]
    fn flag_parsing_accepts_common_spellings() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" 1 "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
