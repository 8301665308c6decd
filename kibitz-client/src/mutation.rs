use crate::{
    api::{op, CreateCommentInput, CreatedComment, LandWorkspaceChangeInput, Workspace},
    normalize, reconcile, Cache,
};

/// A mutation the client knows how to run and fold into its cache
pub trait Mutation {
    const OPERATION: &'static str;
    type Input: serde::Serialize;
    type Output: serde::de::DeserializeOwned;

    /// Writes the entities of `output` under their own keys
    fn normalize<C: Cache>(cache: &mut C, output: &Self::Output);

    /// Updates the cached lists that `output` now belongs to
    fn reconcile<C: Cache>(cache: &mut C, output: &Self::Output, input: &Self::Input);
}

pub struct CreateComment;

impl Mutation for CreateComment {
    const OPERATION: &'static str = op::CREATE_COMMENT;
    type Input = CreateCommentInput;
    type Output = CreatedComment;

    fn normalize<C: Cache>(cache: &mut C, output: &CreatedComment) {
        normalize::write_created_comment(cache, output)
    }

    fn reconcile<C: Cache>(cache: &mut C, output: &CreatedComment, input: &CreateCommentInput) {
        reconcile::create_comment(cache, output, input)
    }
}

pub struct LandWorkspaceChange;

impl Mutation for LandWorkspaceChange {
    const OPERATION: &'static str = op::LAND_WORKSPACE_CHANGE;
    type Input = LandWorkspaceChangeInput;
    type Output = Workspace;

    fn normalize<C: Cache>(cache: &mut C, output: &Workspace) {
        normalize::write_workspace(cache, output)
    }

    fn reconcile<C: Cache>(cache: &mut C, output: &Workspace, input: &LandWorkspaceChangeInput) {
        reconcile::land_workspace_change(cache, output, input)
    }
}
