use std::path::Path;

use anyhow::Context;

use crate::{validate_string, Error};

/// A review server the desktop app knows how to reach
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct HostConfig {
    pub title: String,
    pub host: String,
    #[serde(rename = "webURL")]
    pub web_url: String,
    #[serde(rename = "apiURL")]
    pub api_url: String,
}

impl HostConfig {
    pub fn validate(&self) -> Result<(), Error> {
        validate_string(&self.title)?;
        validate_string(&self.host)?;
        validate_string(&self.web_url)?;
        validate_string(&self.api_url)?;
        if self.title.trim().is_empty() {
            return Err(Error::EmptyHostTitle);
        }
        Ok(())
    }

    /// Read the list of configured hosts, an absent file meaning no host
    pub fn load_all(path: &Path) -> anyhow::Result<Vec<HostConfig>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read(path)
            .with_context(|| format!("reading host configs from {}", path.display()))?;
        let hosts: Vec<HostConfig> = serde_json::from_slice(&data)
            .with_context(|| format!("parsing host configs from {}", path.display()))?;
        for h in hosts.iter() {
            h.validate()
                .with_context(|| format!("validating host config {:?}", h.title))?;
        }
        Ok(hosts)
    }

    pub fn save_all(path: &Path, hosts: &[HostConfig]) -> anyhow::Result<()> {
        let data = serde_json::to_vec_pretty(hosts).context("serializing host configs")?;
        std::fs::write(path, data)
            .with_context(|| format!("writing host configs to {}", path.display()))
    }
}
