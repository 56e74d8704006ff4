use config::{Config, ConfigError, Environment, File};
use sipreel_core::config::AppConfig;
use std::path::Path;

/// 环境变量前缀，例如 `SIPREEL__REEL__FPS=24`
const ENV_PREFIX: &str = "SIPREEL";

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("selection.candidates")
        .try_parsing(true)
}

/// # Summary
/// 分层加载应用配置。
///
/// # Logic
/// 1. 以 `AppConfig::default()` 作为最底层。
/// 2. 若给出路径，叠加 TOML 配置文件（文件必须存在）。
/// 3. 叠加 `SIPREEL__SECTION__KEY` 形式的环境变量。
///
/// 命令行参数在此之后由调用方覆盖。
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    build_config(path, environment())
}

fn build_config(path: Option<&Path>, env: Environment) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }
    builder.add_source(env).build()?.try_deserialize()
}
