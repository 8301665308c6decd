use std::collections::{btree_map, BTreeMap};

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use kibitz_client::{
    api::{
        op, Change, ChangeId, CommentFields, CommentId, CommentTarget, CommentsPage,
        CreateCommentInput, CreatedComment, Error, LandWorkspaceChangeInput, TopCommentData, User,
        UserId, Workspace, WorkspaceId,
    },
    Gateway,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// In-memory review server
pub struct MockServer {
    users: BTreeMap<UserId, User>,
    current_user: Option<UserId>,
    workspaces: BTreeMap<WorkspaceId, DbWorkspace>,
    changes: BTreeMap<ChangeId, DbChange>,
    comments: BTreeMap<CommentId, DbComment>,
}

#[derive(Debug)]
struct DbWorkspace {
    workspace: Workspace,
    comments: Vec<CommentId>,
}

#[derive(Debug)]
struct DbChange {
    change: Change,
    comments: Vec<CommentId>,
}

#[derive(Debug)]
struct DbComment {
    fields: CommentFields,
    is_reply: bool,
    replies: Vec<CommentId>,
}

/// Initial contents of a mock server
#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct Seed {
    pub users: Vec<User>,
    pub workspaces: Vec<Workspace>,
    pub changes: Vec<Change>,
    pub comments: Vec<SeedComment>,
}

/// A comment to create while seeding, with ids referring to earlier entries
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct SeedComment {
    /// Id to create the comment under, so that later replies can refer to it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CommentId>,
    pub author: UserId,
    pub input: CreateCommentInput,
}

#[derive(serde::Deserialize)]
struct InputVariables<T> {
    input: T,
}

#[derive(serde::Deserialize)]
struct WorkspaceVariables {
    #[serde(rename = "workspaceID")]
    workspace_id: WorkspaceId,
}

#[derive(serde::Deserialize)]
struct ChangeVariables {
    #[serde(rename = "changeID")]
    change_id: ChangeId,
}

fn parse_variables<T: DeserializeOwned>(
    operation: &str,
    variables: serde_json::Value,
) -> Result<T, Error> {
    serde_json::from_value(variables)
        .map_err(|e| Error::Unknown(format!("invalid variables for {operation}: {e}")))
}

fn answer<T: serde::Serialize>(res: Result<T, Error>) -> Result<serde_json::Value, Error> {
    res.and_then(|v| {
        serde_json::to_value(v).map_err(|e| Error::Unknown(format!("serializing answer: {e}")))
    })
}

// Errors travel as JSON bodies in production, make sure they survive that trip
fn over_the_wire(err: Error) -> Error {
    Error::parse(&err.contents()).unwrap_or_else(|e| Error::Unknown(format!("{e:#}")))
}

impl Default for MockServer {
    fn default() -> MockServer {
        MockServer::new()
    }
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer {
            users: BTreeMap::new(),
            current_user: None,
            workspaces: BTreeMap::new(),
            changes: BTreeMap::new(),
            comments: BTreeMap::new(),
        }
    }

    /// Builds a server from a seed, replaying its comments in order
    ///
    /// Comments are authored by their seed author; no user is logged in
    /// afterwards.
    pub fn from_seed(seed: Seed) -> anyhow::Result<MockServer> {
        let mut s = MockServer::new();
        for u in seed.users {
            let name = u.name.clone();
            s.admin_create_user(u)
                .with_context(|| format!("creating user {name:?}"))?;
        }
        for w in seed.workspaces {
            let id = w.id.clone();
            s.admin_create_workspace(w)
                .with_context(|| format!("creating workspace {id}"))?;
        }
        for c in seed.changes {
            let id = c.id.clone();
            s.admin_create_change(c)
                .with_context(|| format!("creating change {id}"))?;
        }
        for (i, c) in seed.comments.into_iter().enumerate() {
            s.login(c.author)
                .with_context(|| format!("logging in author of seed comment {i}"))?;
            let id = c.id.unwrap_or_else(|| CommentId(Uuid::new_v4().to_string()));
            s.insert_comment(id, c.input)
                .with_context(|| format!("creating seed comment {i}"))?;
        }
        s.current_user = None;
        Ok(s)
    }

    pub fn from_json(data: &str) -> anyhow::Result<MockServer> {
        let seed: Seed = serde_json::from_str(data).context("parsing mock server seed")?;
        MockServer::from_seed(seed)
    }

    pub fn admin_create_user(&mut self, u: User) -> Result<(), Error> {
        u.validate()?;
        match self.users.entry(u.id.clone()) {
            btree_map::Entry::Occupied(_) => Err(Error::Unknown(format!(
                "user id {} is already used",
                u.id
            ))),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(u);
                Ok(())
            }
        }
    }

    pub fn admin_create_workspace(&mut self, w: Workspace) -> Result<(), Error> {
        kibitz_client::api::validate_string(w.id.as_str())?;
        kibitz_client::api::validate_string(&w.draft_description)?;
        match self.workspaces.entry(w.id.clone()) {
            btree_map::Entry::Occupied(_) => Err(Error::Unknown(format!(
                "workspace id {} is already used",
                w.id
            ))),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(DbWorkspace {
                    workspace: w,
                    comments: Vec::new(),
                });
                Ok(())
            }
        }
    }

    pub fn admin_create_change(&mut self, c: Change) -> Result<(), Error> {
        kibitz_client::api::validate_string(c.id.as_str())?;
        kibitz_client::api::validate_string(&c.description)?;
        match self.changes.entry(c.id.clone()) {
            btree_map::Entry::Occupied(_) => Err(Error::Unknown(format!(
                "change id {} is already used",
                c.id
            ))),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(DbChange {
                    change: c,
                    comments: Vec::new(),
                });
                Ok(())
            }
        }
    }

    pub fn login(&mut self, user: UserId) -> Result<(), Error> {
        if !self.users.contains_key(&user) {
            return Err(Error::PermissionDenied);
        }
        self.current_user = Some(user);
        Ok(())
    }

    pub fn logout(&mut self) {
        self.current_user = None;
    }

    fn whoami(&self) -> Result<&User, Error> {
        self.current_user
            .as_ref()
            .and_then(|u| self.users.get(u))
            .ok_or(Error::PermissionDenied)
    }

    /// Return the current number of comments, replies included
    pub fn test_num_comments(&self) -> usize {
        self.comments.len()
    }

    pub fn test_change_ids(&self) -> Vec<ChangeId> {
        self.changes.keys().cloned().collect()
    }

    pub fn create_comment(&mut self, input: CreateCommentInput) -> Result<CreatedComment, Error> {
        self.insert_comment(CommentId(Uuid::new_v4().to_string()), input)
    }

    fn insert_comment(
        &mut self,
        id: CommentId,
        input: CreateCommentInput,
    ) -> Result<CreatedComment, Error> {
        input.validate()?;
        kibitz_client::api::validate_string(id.as_str())?;
        if self.comments.contains_key(&id) {
            return Err(Error::Unknown(format!("comment id {id} is already used")));
        }
        let author = self.whoami()?.clone();

        let targets = input.targets();
        for t in targets.iter() {
            match t {
                CommentTarget::Workspace(w) if !self.workspaces.contains_key(w) => {
                    return Err(Error::not_found("workspace", w))
                }
                CommentTarget::Change(c) if !self.changes.contains_key(c) => {
                    return Err(Error::not_found("change", c))
                }
                CommentTarget::Reply(p) => match self.comments.get(p) {
                    None => return Err(Error::not_found("comment", p)),
                    Some(parent) if parent.is_reply => {
                        return Err(Error::NotATopComment(p.clone()))
                    }
                    Some(_) => (),
                },
                _ => (),
            }
        }

        let fields = CommentFields {
            id,
            message: input.message,
            created_at: Utc::now(),
            author,
            code_context: input.code_context,
        };
        let id = fields.id.clone();
        let is_reply = input.in_reply_to.is_some();
        for t in targets {
            match t {
                // replies only live under their parent
                CommentTarget::Workspace(_) | CommentTarget::Change(_) if is_reply => (),
                CommentTarget::Workspace(w) => {
                    if let Some(w) = self.workspaces.get_mut(&w) {
                        w.comments.push(id.clone());
                    }
                }
                CommentTarget::Change(c) => {
                    if let Some(c) = self.changes.get_mut(&c) {
                        c.comments.push(id.clone());
                    }
                }
                CommentTarget::Reply(p) => {
                    if let Some(p) = self.comments.get_mut(&p) {
                        p.replies.push(id.clone());
                    }
                }
            }
        }
        self.comments.insert(
            id,
            DbComment {
                fields: fields.clone(),
                is_reply,
                replies: Vec::new(),
            },
        );
        Ok(match is_reply {
            true => CreatedComment::Reply(fields),
            false => CreatedComment::Top(fields),
        })
    }

    /// Lands the workspace's draft as a new change
    ///
    /// The workspace's comments move over to the change, and the workspace
    /// starts afresh from the new trunk.
    pub fn land_workspace_change(
        &mut self,
        input: LandWorkspaceChangeInput,
    ) -> Result<Workspace, Error> {
        input.validate()?;
        self.whoami()?;
        let ws = self
            .workspaces
            .get_mut(&input.workspace_id)
            .ok_or_else(|| Error::not_found("workspace", &input.workspace_id))?;

        let change_id = ChangeId(Uuid::new_v4().to_string());
        let comments = std::mem::take(&mut ws.comments);
        let description = std::mem::take(&mut ws.workspace.draft_description);
        ws.workspace.up_to_date_with_trunk = true;
        let res = ws.workspace.clone();
        tracing::debug!(
            workspace = %input.workspace_id,
            change = %change_id,
            num_patches = input.patch_ids.len(),
            num_comments = comments.len(),
            "landed workspace change"
        );
        self.changes.insert(
            change_id.clone(),
            DbChange {
                change: Change {
                    id: change_id,
                    description,
                },
                comments,
            },
        );
        Ok(res)
    }

    fn top_comments(&self, ids: &[CommentId]) -> Vec<TopCommentData> {
        ids.iter()
            .filter_map(|id| self.comments.get(id))
            .map(|c| TopCommentData {
                comment: c.fields.clone(),
                replies: c
                    .replies
                    .iter()
                    .filter_map(|r| self.comments.get(r))
                    .map(|r| r.fields.clone())
                    .collect(),
            })
            .collect()
    }

    pub fn workspace_comments(&self, id: &WorkspaceId) -> Result<CommentsPage, Error> {
        self.whoami()?;
        let ws = self
            .workspaces
            .get(id)
            .ok_or_else(|| Error::not_found("workspace", id))?;
        Ok(CommentsPage {
            id: ws.workspace.id.0.clone(),
            comments: self.top_comments(&ws.comments),
        })
    }

    pub fn change_comments(&self, id: &ChangeId) -> Result<CommentsPage, Error> {
        self.whoami()?;
        let c = self
            .changes
            .get(id)
            .ok_or_else(|| Error::not_found("change", id))?;
        Ok(CommentsPage {
            id: c.change.id.0.clone(),
            comments: self.top_comments(&c.comments),
        })
    }
}

#[async_trait]
impl Gateway for MockServer {
    async fn execute(
        &mut self,
        operation: &str,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, Error> {
        let res = match operation {
            op::CREATE_COMMENT => parse_variables::<InputVariables<CreateCommentInput>>(
                operation, variables,
            )
            .and_then(|v| answer(self.create_comment(v.input))),
            op::LAND_WORKSPACE_CHANGE => parse_variables::<
                InputVariables<LandWorkspaceChangeInput>,
            >(operation, variables)
            .and_then(|v| answer(self.land_workspace_change(v.input))),
            op::WORKSPACE_COMMENTS => parse_variables::<WorkspaceVariables>(operation, variables)
                .and_then(|v| answer(self.workspace_comments(&v.workspace_id))),
            op::CHANGE_COMMENTS => parse_variables::<ChangeVariables>(operation, variables)
                .and_then(|v| answer(self.change_comments(&v.change_id))),
            _ => Err(Error::Unknown(format!("unknown operation {operation}"))),
        };
        res.map_err(over_the_wire)
    }
}
