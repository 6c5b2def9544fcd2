use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub data_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub log_dir: PathBuf,

    // Rate limiting
    pub rate_per_min: u32,
    pub max_upload_bytes: usize,

    pub api_prefix: String,
}

fn var_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));
        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("uploads"));

        Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            upload_dir,
            data_dir,
            log_dir: PathBuf::from(env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string())),

            rate_per_min: var_or("RATE_PER_MIN", 600),
            max_upload_bytes: var_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024), // 10 MiB

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }
}
