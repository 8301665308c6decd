use async_trait::async_trait;

use crate::api::Error;

/// Executes named operations against the review API
///
/// `variables` and the returned value are the JSON shapes of the operation's
/// input and result. Failures are returned as-is and never retried.
#[async_trait]
pub trait Gateway {
    async fn execute(
        &mut self,
        operation: &str,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, Error>;
}
