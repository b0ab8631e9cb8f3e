use std::env;
use std::path::PathBuf;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

use crate::error::{HarvestError, Result};

const DEFAULT_HOST: &str = "postgres";
const DEFAULT_PORT: u16 = 5432;
const DEFAULT_SQL_DIR: &str = "sql";

/// Connection descriptor for the destination database.
#[derive(Clone)]
pub struct DbConfig {
    pub name: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub ssl: bool,
}

impl DbConfig {
    /// Read `DB_NAME`, `DB_USER`, `DB_PASSWORD`, `DB_HOST`, `DB_PORT` and
    /// `DB_SSL`, after loading a `.env` file if one exists.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &'static str| {
            lookup(name).ok_or(HarvestError::Config {
                name,
                reason: "not set".to_string(),
            })
        };

        let port = match lookup("DB_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| HarvestError::Config {
                name: "DB_PORT",
                reason: format!("{raw:?} is not a port: {e}"),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            name: required("DB_NAME")?,
            user: required("DB_USER")?,
            password: required("DB_PASSWORD")?,
            host: lookup("DB_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            ssl: lookup("DB_SSL").is_some_and(|v| v.eq_ignore_ascii_case("true")),
        })
    }

    pub fn ssl_mode(&self) -> PgSslMode {
        if self.ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Disable
        }
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(self.ssl_mode())
    }
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("name", &self.name)
            .field("user", &self.user)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("ssl", &self.ssl)
            .finish_non_exhaustive()
    }
}

/// Locations of the schema reset and ranking scripts.
#[derive(Debug, Clone)]
pub struct SqlScripts {
    pub drop_tables: PathBuf,
    pub create_tables: PathBuf,
    pub ranking: PathBuf,
}

impl SqlScripts {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            drop_tables: dir.join("drop_existing_tables.sql"),
            create_tables: dir.join("ddl.sql"),
            ranking: dir.join("ranking_pipeline.sql"),
        }
    }

    /// Scripts under `SQL_DIR`, or `./sql` when unset.
    pub fn from_env() -> Self {
        Self::in_dir(env::var("SQL_DIR").unwrap_or_else(|_| DEFAULT_SQL_DIR.to_string()))
    }
}
