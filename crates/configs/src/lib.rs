use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

pub const DEFAULT_SEED_PATH: &str = "data/users.json";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// Location of the static dataset the user store is seeded from.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DataConfig {
    #[serde(default)]
    pub seed_path: String,
}

/// `CONFIG_PATH` if set, otherwise `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        Self::load_and_validate_from(&config_path())
    }

    pub fn load_and_validate_from(path: &str) -> Result<Self> {
        let mut cfg = load_from_file(path)?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        // 未配置种子文件时从环境变量或默认路径补齐
        self.data.normalize_from_env();
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl DataConfig {
    pub fn normalize_from_env(&mut self) {
        if self.seed_path.trim().is_empty() {
            self.seed_path = seed_path_from_env();
        }
    }
}

/// `USERS_SEED_PATH` if set, otherwise the bundled dataset.
pub fn seed_path_from_env() -> String {
    std::env::var("USERS_SEED_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SEED_PATH.to_string())
}
