macro_rules! string_id {
    ($name:ident) => {
        #[derive(
            Clone,
            Debug,
            Eq,
            Hash,
            Ord,
            PartialEq,
            PartialOrd,
            serde::Deserialize,
            serde::Serialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> $name {
                $name(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

mod comment;
pub use comment::{
    CodeContext, CommentFields, CommentId, CommentTarget, CreateCommentInput, CreatedComment,
};

mod error;
pub use error::Error;

mod host;
pub use host::HostConfig;

mod query;
pub use query::{CommentsPage, CommentsQuery, TopCommentData};

mod user;
pub use user::{User, UserId};

mod workspace;
pub use workspace::{Change, ChangeId, LandWorkspaceChangeInput, Workspace, WorkspaceId};

pub type Time = chrono::DateTime<chrono::Utc>;

/// Names of the operations the review API exposes through the gateway
pub mod op {
    pub const CREATE_COMMENT: &str = "createComment";
    pub const LAND_WORKSPACE_CHANGE: &str = "landWorkspaceChange";
    pub const WORKSPACE_COMMENTS: &str = "workspaceComments";
    pub const CHANGE_COMMENTS: &str = "changeComments";
}

/// Typenames under which entities get normalized
pub mod typename {
    pub const USER: &str = "User";
    pub const WORKSPACE: &str = "Workspace";
    pub const CHANGE: &str = "Change";
    pub const TOP_COMMENT: &str = "TopComment";
    pub const REPLY_COMMENT: &str = "ReplyComment";
}

// Strings end up in the server's database, which refuses null bytes. Reject
// them here so both the client and the mock server agree on what is valid.
pub fn validate_string(s: &str) -> Result<(), Error> {
    match s.contains('\0') {
        true => Err(Error::NullByteInString(String::from(s))),
        false => Ok(()),
    }
}
