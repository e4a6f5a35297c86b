use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_parse, server::ServerConfig};
use core_upstream::UpstreamConfig;
use domain_ocr::VisionConfig;
use domain_wines::{DEFAULT_TOP_K, IndexConfig, ProfileShape};

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application configuration, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Deployed index for the 55-dimension comprehensive profile
    pub index: IndexConfig,
    /// Deployed index for the 6-dimension legacy profile
    pub legacy_index: IndexConfig,
    pub vision: VisionConfig,
    pub upstream: UpstreamConfig,
    /// Neighbors requested per recommendation (DEFAULT_NEIGHBOR_COUNT)
    pub neighbor_count: usize,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let index = IndexConfig::from_env(ProfileShape::Comprehensive)?;
        let legacy_index = IndexConfig::from_env(ProfileShape::Legacy)?;
        let vision = VisionConfig::from_env()?;
        let upstream = UpstreamConfig::from_env()?;

        let neighbor_count: usize = env_parse("DEFAULT_NEIGHBOR_COUNT", DEFAULT_TOP_K)?;
        if neighbor_count == 0 {
            return Err(ConfigError::ParseError {
                key: "DEFAULT_NEIGHBOR_COUNT".to_string(),
                details: "must be at least 1".to_string(),
            }
            .into());
        }

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            index,
            legacy_index,
            vision,
            upstream,
            neighbor_count,
        })
    }
}
