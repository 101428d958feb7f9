//! Service configuration.
//!
//! The working tree path always comes from the CLI; everything else is
//! optional and read from a small TOML file. Push credentials follow the
//! env-indirection pattern: the file names an environment variable, the
//! token itself lives only in the environment of the running service and
//! is read at push time.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Remote used for fetch/pull/push and the unpulled count.
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Metadata directory override. Defaults to `<work_tree>/.git`.
    #[serde(default)]
    pub git_dir: Option<PathBuf>,

    /// HTTPS push credential. Absent means pushes rely on whatever the
    /// ambient git configuration provides.
    #[serde(default)]
    pub auth: Option<AuthConfig>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            git_dir: None,
            auth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Username paired with the token in the Basic credential.
    pub username: String,

    /// Name of the environment variable holding the token. The token is
    /// never written to this file and never logged.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_token_env() -> String {
    "GIT_BRIDGE_TOKEN".to_string()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<BridgeConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let config: BridgeConfig = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: BridgeConfig = toml::from_str("").unwrap();
        assert_eq!(config.remote, "origin");
        assert!(config.git_dir.is_none());
        assert!(config.auth.is_none());
    }

    #[test]
    fn full_file_parses() {
        let config: BridgeConfig = toml::from_str(
            r#"
            remote = "upstream"
            git_dir = "/srv/site/.git"

            [auth]
            username = "deploy"
            token_env = "SITE_PUSH_TOKEN"
            "#,
        )
        .unwrap();
        assert_eq!(config.remote, "upstream");
        assert_eq!(config.git_dir.as_deref(), Some(Path::new("/srv/site/.git")));
        let auth = config.auth.unwrap();
        assert_eq!(auth.username, "deploy");
        assert_eq!(auth.token_env, "SITE_PUSH_TOKEN");
    }

    #[test]
    fn token_env_defaults_when_omitted() {
        let config: BridgeConfig = toml::from_str("[auth]\nusername = \"deploy\"\n").unwrap();
        assert_eq!(config.auth.unwrap().token_env, "GIT_BRIDGE_TOKEN");
    }
}
