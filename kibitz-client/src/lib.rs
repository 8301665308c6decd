mod cache;
pub use cache::{Cache, CommentsData, EntityKey, EntityRef, NormalizedCache, Record};

mod client;
pub use client::Client;

mod config;
pub use config::ClientConfig;

mod gateway;
pub use gateway::Gateway;

pub mod mutation;
pub mod normalize;
pub mod preferences;
pub mod reconcile;

pub mod api {
    pub use kibitz_api::*;
}
