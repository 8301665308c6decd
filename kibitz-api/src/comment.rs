use crate::{typename, validate_string, ChangeId, Error, Time, User, WorkspaceId};

string_id!(CommentId);

/// Where in the diff a comment was left
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeContext {
    pub path: String,
    pub line_start: i32,
    pub line_end: i32,
    pub line_is_new: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentFields {
    pub id: CommentId,
    pub message: String,
    pub created_at: Time,
    pub author: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_context: Option<CodeContext>,
}

/// A comment as returned by the `createComment` mutation
///
/// The server classifies the comment: a root-level comment lives in the
/// `comments` list of a workspace or change, a reply lives in the `replies`
/// list of its top comment.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "__typename")]
pub enum CreatedComment {
    #[serde(rename = "TopComment")]
    Top(CommentFields),

    #[serde(rename = "ReplyComment")]
    Reply(CommentFields),
}

impl CreatedComment {
    pub fn fields(&self) -> &CommentFields {
        match self {
            CreatedComment::Top(c) | CreatedComment::Reply(c) => c,
        }
    }

    pub fn id(&self) -> &CommentId {
        &self.fields().id
    }

    pub fn typename(&self) -> &'static str {
        match self {
            CreatedComment::Top(_) => typename::TOP_COMMENT,
            CreatedComment::Reply(_) => typename::REPLY_COMMENT,
        }
    }

    pub fn is_top(&self) -> bool {
        matches!(self, CreatedComment::Top(_))
    }
}

/// One place a newly-created comment attaches to
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CommentTarget {
    Workspace(WorkspaceId),
    Change(ChangeId),
    Reply(CommentId),
}

/// Input of the `createComment` mutation
///
/// The wire format has three independently optional targets. Use
/// `on_workspace`, `on_change` or `reply_to` to build an input naming exactly
/// one of them; inputs naming several are still accepted, see `targets`.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    pub message: String,

    #[serde(rename = "workspaceID", default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<WorkspaceId>,

    #[serde(rename = "changeID", default, skip_serializing_if = "Option::is_none")]
    pub change_id: Option<ChangeId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<CommentId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_context: Option<CodeContext>,
}

impl CreateCommentInput {
    fn message_only(message: String) -> CreateCommentInput {
        CreateCommentInput {
            message,
            workspace_id: None,
            change_id: None,
            in_reply_to: None,
            code_context: None,
        }
    }

    pub fn on_workspace(message: impl Into<String>, workspace: WorkspaceId) -> CreateCommentInput {
        CreateCommentInput {
            workspace_id: Some(workspace),
            ..Self::message_only(message.into())
        }
    }

    pub fn on_change(message: impl Into<String>, change: ChangeId) -> CreateCommentInput {
        CreateCommentInput {
            change_id: Some(change),
            ..Self::message_only(message.into())
        }
    }

    pub fn reply_to(message: impl Into<String>, parent: CommentId) -> CreateCommentInput {
        CreateCommentInput {
            in_reply_to: Some(parent),
            ..Self::message_only(message.into())
        }
    }

    pub fn with_code_context(mut self, ctx: CodeContext) -> CreateCommentInput {
        self.code_context = Some(ctx);
        self
    }

    /// Every target named by this input, in workspace, change, reply order
    ///
    /// No precedence is applied between them: callers handle each one.
    pub fn targets(&self) -> Vec<CommentTarget> {
        let mut res = Vec::with_capacity(1);
        if let Some(w) = &self.workspace_id {
            res.push(CommentTarget::Workspace(w.clone()));
        }
        if let Some(c) = &self.change_id {
            res.push(CommentTarget::Change(c.clone()));
        }
        if let Some(p) = &self.in_reply_to {
            res.push(CommentTarget::Reply(p.clone()));
        }
        res
    }

    pub fn validate(&self) -> Result<(), Error> {
        validate_string(&self.message)?;
        if self.message.trim().is_empty() {
            return Err(Error::EmptyMessage);
        }
        for t in self.targets() {
            match t {
                CommentTarget::Workspace(WorkspaceId(id))
                | CommentTarget::Change(ChangeId(id))
                | CommentTarget::Reply(CommentId(id)) => validate_string(&id)?,
            }
        }
        if let Some(ctx) = &self.code_context {
            validate_string(&ctx.path)?;
        }
        match self.targets().is_empty() {
            true => Err(Error::NoCommentTarget),
            false => Ok(()),
        }
    }
}
