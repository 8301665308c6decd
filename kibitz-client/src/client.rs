use crate::{
    api::{
        CommentFields, CommentId, CommentsPage, CommentsQuery, CreateCommentInput, CreatedComment,
        Error, LandWorkspaceChangeInput, Workspace, WorkspaceId,
    },
    mutation::{CreateComment, LandWorkspaceChange, Mutation},
    normalize, ClientConfig, Gateway, NormalizedCache,
};

/// A review session: one gateway, one cache
///
/// Every operation runs to completion before the next one can start, as all of
/// them borrow the client mutably.
pub struct Client<G, C = NormalizedCache> {
    gateway: G,
    cache: C,
    config: ClientConfig,
}

impl<G: Gateway> Client<G, NormalizedCache> {
    pub fn new(gateway: G) -> Client<G, NormalizedCache> {
        Client::with_cache(gateway, NormalizedCache::new(), ClientConfig::default())
    }
}

fn malformed(operation: &str, err: serde_json::Error) -> Error {
    Error::Unknown(format!("malformed answer to {operation}: {err}"))
}

impl<G: Gateway, C: crate::Cache> Client<G, C> {
    pub fn with_cache(gateway: G, cache: C, config: ClientConfig) -> Client<G, C> {
        if let Some(h) = &config.host {
            tracing::info!(host = %h.host, title = %h.title, "starting review session");
        }
        Client {
            gateway,
            cache,
            config,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn execute(
        &mut self,
        operation: &str,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, Error> {
        match self.gateway.execute(operation, variables).await {
            Ok(res) => Ok(res),
            Err(err) => {
                tracing::error!(operation, %err, "remote operation failed");
                Err(err)
            }
        }
    }

    /// Runs `M` remotely, then normalizes and reconciles its result
    ///
    /// The cache is only touched once the gateway reported success.
    pub async fn mutate<M: Mutation>(&mut self, input: M::Input) -> Result<M::Output, Error> {
        let variables = serde_json::to_value(&input)
            .map_err(|e| Error::Unknown(format!("serializing {} input: {e}", M::OPERATION)))?;
        let variables = serde_json::json!({ "input": variables });
        let res = self.execute(M::OPERATION, variables).await?;
        let output: M::Output =
            serde_json::from_value(res).map_err(|e| malformed(M::OPERATION, e))?;
        M::normalize(&mut self.cache, &output);
        if self.config.reconcile {
            M::reconcile(&mut self.cache, &output, &input);
        }
        tracing::info!(operation = M::OPERATION, "mutation applied");
        Ok(output)
    }

    pub async fn create_comment(
        &mut self,
        input: CreateCommentInput,
    ) -> Result<CreatedComment, Error> {
        let created = self.mutate::<CreateComment>(input).await?;
        tracing::debug!(comment = %created.id(), top = created.is_top(), "created comment");
        Ok(created)
    }

    pub async fn land_workspace_change(
        &mut self,
        input: LandWorkspaceChangeInput,
    ) -> Result<Workspace, Error> {
        self.mutate::<LandWorkspaceChange>(input).await
    }

    /// Fetches a comments list and replaces its cached copy
    pub async fn fetch_comments(&mut self, query: CommentsQuery) -> Result<CommentsPage, Error> {
        let res = self.execute(query.operation(), query.variables()).await?;
        let page: CommentsPage =
            serde_json::from_value(res).map_err(|e| malformed(query.operation(), e))?;
        normalize::write_comments_page(&mut self.cache, &query, &page);
        tracing::debug!(?query, num_comments = page.comments.len(), "cached comments");
        Ok(page)
    }

    pub fn cached_comments(&self, query: &CommentsQuery) -> Option<Vec<CommentFields>> {
        normalize::read_comments(&self.cache, query)
    }

    pub fn cached_replies(&self, parent: &CommentId) -> Option<Vec<CommentFields>> {
        normalize::read_replies(&self.cache, parent)
    }

    pub fn cached_workspace(&self, id: &WorkspaceId) -> Option<Workspace> {
        normalize::read_workspace(&self.cache, id.as_str())
    }
}
