// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./raad.toml` > `~/.config/raad/raad.toml` > `/etc/raad/raad.toml`
//! with environment variable overrides via `RAAD_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::RaadConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/raad/raad.toml";

/// Configuration file in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "raad.toml";

/// Per-user configuration file under the XDG config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("raad").join("raad.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/raad/raad.toml` (system-wide)
/// 3. `~/.config/raad/raad.toml` (user XDG config)
/// 4. `./raad.toml` (local directory)
/// 5. `RAAD_*` environment variables
pub fn load_config() -> Result<RaadConfig, figment::Error> {
    let candidates = [
        Some(PathBuf::from(SYSTEM_CONFIG_PATH)),
        user_config_path(),
        Some(PathBuf::from(LOCAL_CONFIG_PATH)),
    ];
    for path in candidates
        .into_iter()
        .flatten()
        .filter(|p| p.is_file())
    {
        tracing::debug!(path = %path.display(), "config file found");
    }
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<RaadConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RaadConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RaadConfig, figment::Error> {
    tracing::debug!(path = %path.display(), "loading config from explicit path");
    Figment::new()
        .merge(Serialized::defaults(RaadConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RaadConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Environment provider mapping `RAAD_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that underscore-containing
/// keys stay intact: `RAAD_ENGINE_API_KEY_ENV` maps to `engine.api_key_env`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("RAAD_").map(|key| {
        let key_str = key.as_str();
        for section in ["app", "data", "engine", "session", "gateway"] {
            if let Some(rest) = key_str
                .strip_prefix(section)
                .and_then(|r| r.strip_prefix('_'))
            {
                return format!("{section}.{rest}").into();
            }
        }
        key_str.to_string().into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("RAAD_ENGINE_MODEL", "openrouter/test-model");
            jail.set_env("RAAD_ENGINE_API_KEY_ENV", "MY_KEY");
            jail.set_env("RAAD_DATA_DATA_DIR", "/srv/raad/data");
            jail.set_env("RAAD_GATEWAY_PORT", "9090");

            let config: RaadConfig = Figment::new()
                .merge(Serialized::defaults(RaadConfig::default()))
                .merge(env_provider())
                .extract()?;

            assert_eq!(config.engine.model, "openrouter/test-model");
            assert_eq!(config.engine.api_key_env, "MY_KEY");
            assert_eq!(config.data.data_dir, PathBuf::from("/srv/raad/data"));
            assert_eq!(config.gateway.port, 9090);
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG_PATH,
                r#"
                [session]
                max_question_len = 500
                "#,
            )?;
            let config = load_config()?;
            assert_eq!(config.session.max_question_len, 500);
            Ok(())
        });
    }
}
