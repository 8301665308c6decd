use crate::{op, typename, ChangeId, CommentFields, WorkspaceId};

/// A cached list of top-level comments, identified by its container
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum CommentsQuery {
    Workspace(WorkspaceId),
    Change(ChangeId),
}

impl CommentsQuery {
    pub fn operation(&self) -> &'static str {
        match self {
            CommentsQuery::Workspace(_) => op::WORKSPACE_COMMENTS,
            CommentsQuery::Change(_) => op::CHANGE_COMMENTS,
        }
    }

    pub fn variables(&self) -> serde_json::Value {
        match self {
            CommentsQuery::Workspace(id) => serde_json::json!({ "workspaceID": id }),
            CommentsQuery::Change(id) => serde_json::json!({ "changeID": id }),
        }
    }

    /// Typename of the entity owning the `comments` list
    pub fn container_typename(&self) -> &'static str {
        match self {
            CommentsQuery::Workspace(_) => typename::WORKSPACE,
            CommentsQuery::Change(_) => typename::CHANGE,
        }
    }

    pub fn container_id(&self) -> &str {
        match self {
            CommentsQuery::Workspace(id) => id.as_str(),
            CommentsQuery::Change(id) => id.as_str(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct TopCommentData {
    #[serde(flatten)]
    pub comment: CommentFields,

    /// Replies in chronological order
    pub replies: Vec<CommentFields>,
}

/// Answer to `workspaceComments` and `changeComments`
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentsPage {
    /// Id of the workspace or change
    pub id: String,
    pub comments: Vec<TopCommentData>,
}
