use anyhow::{anyhow, Context};
use serde_json::json;

use crate::CommentId;

/// Failure of a remote operation, as reported by the review API
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("No {kind} with id {id}")]
    NotFound { kind: String, id: String },

    #[error("Comment message is empty")]
    EmptyMessage,

    #[error("Comment is attached to neither a workspace, a change nor a comment")]
    NoCommentTarget,

    #[error("Null byte in string is not allowed {0:?}")]
    NullByteInString(String),

    #[error("Comment {0} is a reply and cannot be replied to")]
    NotATopComment(CommentId),

    #[error("Host title is empty")]
    EmptyHostTitle,
}

impl Error {
    pub fn not_found(kind: &str, id: impl ToString) -> Error {
        Error::NotFound {
            kind: String::from(kind),
            id: id.to_string(),
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        serde_json::to_vec(&match self {
            Error::Unknown(msg) => json!({
                "message": msg,
                "type": "unknown",
            }),
            Error::PermissionDenied => json!({
                "message": "permission denied",
                "type": "permission-denied",
            }),
            Error::NotFound { kind, id } => json!({
                "message": "not found",
                "type": "not-found",
                "kind": kind,
                "id": id,
            }),
            Error::EmptyMessage => json!({
                "message": "comment message is empty",
                "type": "empty-message",
            }),
            Error::NoCommentTarget => json!({
                "message": "comment has no target",
                "type": "no-comment-target",
            }),
            Error::NullByteInString(s) => json!({
                "message": "there was a null byte in argument string",
                "type": "null-byte",
                "string": s,
            }),
            Error::NotATopComment(c) => json!({
                "message": "cannot reply to a reply",
                "type": "not-a-top-comment",
                "comment": c,
            }),
            Error::EmptyHostTitle => json!({
                "message": "host title is empty",
                "type": "empty-host-title",
            }),
        })
        .expect("serializing error contents")
    }

    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        let field = |name: &str| -> anyhow::Result<String> {
            data.get(name)
                .and_then(|v| v.as_str())
                .map(String::from)
                .ok_or_else(|| anyhow!("error contents is missing string field {name:?}"))
        };
        Ok(
            match data
                .get("type")
                .and_then(|t| t.as_str())
                .ok_or_else(|| anyhow!("error type is not a string"))?
            {
                "unknown" => Error::Unknown(field("message").unwrap_or_default()),
                "permission-denied" => Error::PermissionDenied,
                "not-found" => Error::NotFound {
                    kind: field("kind")?,
                    id: field("id")?,
                },
                "empty-message" => Error::EmptyMessage,
                "no-comment-target" => Error::NoCommentTarget,
                "null-byte" => Error::NullByteInString(field("string")?),
                "not-a-top-comment" => Error::NotATopComment(CommentId(field("comment")?)),
                "empty-host-title" => Error::EmptyHostTitle,
                _ => return Err(anyhow!("error contents has unknown type")),
            },
        )
    }
}
