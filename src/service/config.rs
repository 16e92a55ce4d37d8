use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{AppError, AppResult};

/// Prefix of environment variables overriding file values,
/// e.g. `GAME_COORDINATOR__NETWORK__PORT=4800`.
const ENV_PREFIX: &str = "GAME_COORDINATOR";

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GeneralConfig {
    /// 0 means one worker thread per cpu
    pub worker_threads: usize,
}

impl GeneralConfig {
    pub fn worker_threads(&self) -> usize {
        if self.worker_threads == 0 {
            num_cpus::get()
        } else {
            self.worker_threads
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct NetworkConfig {
    pub ip: String,
    pub port: u16,
    pub max_connection: usize,
    /// largest payload a single frame may declare
    pub max_frame_size: usize,
    pub conn_read_buffer_size: usize,
    pub read_timeout_ms: u64,
    pub write_timeout_ms: u64,
    /// answer handler failures with an error object instead of closing
    pub error_responses: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            ip: "0.0.0.0".to_string(),
            port: 4700,
            max_connection: 1024,
            max_frame_size: 1024 * 1024,
            conn_read_buffer_size: 4 * 1024,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            error_responses: false,
        }
    }
}

impl NetworkConfig {
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_ms > 0).then(|| Duration::from_millis(self.read_timeout_ms))
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        (self.write_timeout_ms > 0).then(|| Duration::from_millis(self.write_timeout_ms))
    }
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    pub general: GeneralConfig,
    pub network: NetworkConfig,
}

impl CoordinatorConfig {
    pub fn set_up_config<P: AsRef<Path>>(path: P) -> AppResult<CoordinatorConfig> {
        let path_str = path
            .as_ref()
            .to_str()
            .ok_or(AppError::InvalidValue(format!(
                "config file path: {}",
                path.as_ref().to_string_lossy()
            )))?;
        let config = ::config::Config::builder()
            .add_source(::config::File::with_name(path_str))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let coordinator_config: CoordinatorConfig = config.try_deserialize()?;
        coordinator_config.validate()?;
        Ok(coordinator_config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.network.max_frame_size == 0 {
            return Err(AppError::InvalidValue(
                "network.max_frame_size must be positive".to_string(),
            ));
        }
        if self.network.max_connection == 0 {
            return Err(AppError::InvalidValue(
                "network.max_connection must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_conf(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_listen_on_4700() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.network.port, 4700);
        assert_eq!(config.network.listen_address(), "0.0.0.0:4700");
        assert!(!config.network.error_responses);
        assert!(config.network.read_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = write_conf(
            r#"
            [network]
            port = 4800
            read_timeout_ms = 250
            "#,
        );
        let config = CoordinatorConfig::set_up_config(file.path()).unwrap();
        assert_eq!(config.network.port, 4800);
        assert_eq!(config.network.read_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(config.network.max_frame_size, 1024 * 1024);
    }

    #[test]
    fn environment_overrides_file() {
        let file = write_conf(
            r#"
            [network]
            port = 4701
            "#,
        );
        // same port as partial_file_keeps_defaults, which may run concurrently
        std::env::set_var("GAME_COORDINATOR__NETWORK__PORT", "4800");
        let result = CoordinatorConfig::set_up_config(file.path());
        std::env::remove_var("GAME_COORDINATOR__NETWORK__PORT");
        let config = result.unwrap();
        assert_eq!(config.network.port, 4800);
        assert_eq!(config.network.listen_address(), "0.0.0.0:4800");
    }

    #[test]
    fn zero_frame_size_is_rejected() {
        let file = write_conf(
            r#"
            [network]
            max_frame_size = 0
            "#,
        );
        assert!(matches!(
            CoordinatorConfig::set_up_config(file.path()),
            Err(AppError::InvalidValue(_))
        ));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let result = CoordinatorConfig::set_up_config("/nonexistent/coordinator.toml");
        assert!(matches!(result, Err(AppError::ConfigFileError(_))));
    }
}
