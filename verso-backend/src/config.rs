use std::env;
use std::path::PathBuf;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const DATABASE_PATH: &str = ".db/verso.db";
}

/// Returns the absolute path to the verso-backend directory.
/// Uses CARGO_MANIFEST_DIR at compile time, so it always resolves
/// to verso-backend/ regardless of the working directory at runtime.
pub fn backend_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Default database path, anchored at the backend directory so the file
/// lands in the same place regardless of the working directory at runtime
pub fn default_database_url() -> String {
    backend_dir()
        .join(defaults::DATABASE_PATH)
        .to_string_lossy()
        .to_string()
}

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var(env_vars::PORT)
                .unwrap_or_else(|_| defaults::PORT.to_string())
                .parse()
                .expect("PORT must be a valid number"),
            database_url: env::var(env_vars::DATABASE_URL)
                .unwrap_or_else(|_| default_database_url()),
        }
    }
}
