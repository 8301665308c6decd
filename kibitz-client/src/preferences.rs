//! Host list of the desktop preferences panel
//!
//! The host application owns the actual list and knows how to reach and open a
//! host. This module only forwards to it.

use anyhow::Context;
use async_trait::async_trait;

use crate::api::HostConfig;

#[async_trait]
pub trait HostBridge {
    async fn list_hosts(&self) -> anyhow::Result<Vec<HostConfig>>;
    async fn add_host_config(&self, cfg: HostConfig) -> anyhow::Result<()>;
    async fn is_host_up(&self, cfg: &HostConfig) -> anyhow::Result<bool>;
    async fn open_host(&self, cfg: &HostConfig) -> anyhow::Result<()>;
    async fn delete_host_config(&self, cfg: &HostConfig) -> anyhow::Result<()>;
}

pub struct Preferences<B> {
    bridge: B,
}

impl<B: HostBridge> Preferences<B> {
    pub fn new(bridge: B) -> Preferences<B> {
        Preferences { bridge }
    }

    pub async fn list_hosts(&self) -> anyhow::Result<Vec<HostConfig>> {
        self.bridge.list_hosts().await.context("listing hosts")
    }

    pub async fn add_host(&self, cfg: HostConfig) -> anyhow::Result<()> {
        let title = cfg.title.clone();
        self.bridge
            .add_host_config(cfg)
            .await
            .with_context(|| format!("adding host {title:?}"))
    }

    pub async fn is_host_up(&self, cfg: &HostConfig) -> anyhow::Result<bool> {
        self.bridge
            .is_host_up(cfg)
            .await
            .with_context(|| format!("checking whether host {:?} is up", cfg.title))
    }

    pub async fn open_host(&self, cfg: &HostConfig) -> anyhow::Result<()> {
        self.bridge
            .open_host(cfg)
            .await
            .with_context(|| format!("opening host {:?}", cfg.title))
    }

    pub async fn delete_host(&self, cfg: &HostConfig) -> anyhow::Result<()> {
        self.bridge
            .delete_host_config(cfg)
            .await
            .with_context(|| format!("deleting host {:?}", cfg.title))
    }
}
