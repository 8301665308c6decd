use std::path::Path;

use anyhow::Context;

use crate::api::HostConfig;

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server the gateway talks to, if any was picked in the preferences
    pub host: Option<HostConfig>,

    /// Whether successful mutations get folded into cached lists. When off,
    /// results are still normalized, but lists only change on refetch.
    pub reconcile: bool,
}

impl Default for ClientConfig {
    fn default() -> ClientConfig {
        ClientConfig {
            host: None,
            reconcile: true,
        }
    }
}

impl ClientConfig {
    pub fn from_json(data: &str) -> anyhow::Result<ClientConfig> {
        let cfg: ClientConfig = serde_json::from_str(data).context("parsing client config")?;
        if let Some(h) = &cfg.host {
            h.validate().context("validating configured host")?;
        }
        Ok(cfg)
    }

    pub fn load(path: &Path) -> anyhow::Result<ClientConfig> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading client config {}", path.display()))?;
        Self::from_json(&data).with_context(|| format!("loading {}", path.display()))
    }
}
