use config::{Config, ConfigError, Environment, File};
use std::path::Path;
use stockview_core::config::AppConfig;

/// 环境变量前缀，例如 `STOCKVIEW_BACKEND__BASE_URL`
pub const ENV_PREFIX: &str = "STOCKVIEW";

/// # Summary
/// 加载应用配置。
///
/// # Logic
/// 1. 以 `AppConfig::default()` 作为最底层来源。
/// 2. 若指定了配置文件则叠加（格式由扩展名决定，文件必须存在）。
/// 3. 叠加 `STOCKVIEW_` 前缀的环境变量，层级以 `__` 分隔。
///
/// # Arguments
/// * `file`: 可选的配置文件路径。
///
/// # Returns
/// 合并后的配置。
pub fn load(file: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_with_env(file, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

fn load_with_env(file: Option<&Path>, env: Environment) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);
    if let Some(path) = file {
        builder = builder.add_source(File::from(path).required(true));
    }
    builder.add_source(env).build()?.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = load_with_env(None, env(&[])).unwrap();
        assert_eq!(config.backend.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.fields.close, "Close");
    }

    #[test]
    fn test_file_then_env_override() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[backend]\nbase_url = \"http://stocks.local:8000\"\n\n[fields]\nclose = \"close_price\""
        )
        .unwrap();

        let config = load_with_env(
            Some(file.path()),
            env(&[("STOCKVIEW_BACKEND__TIMEOUT_SECS", "3")]),
        )
        .unwrap();

        assert_eq!(config.backend.base_url, "http://stocks.local:8000");
        assert_eq!(config.backend.timeout_secs, 3);
        assert_eq!(config.fields.close, "close_price");
        assert_eq!(config.fields.open, "Open");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_with_env(Some(Path::new("/nonexistent/stockview.toml")), env(&[]));
        assert!(result.is_err());
    }
}
