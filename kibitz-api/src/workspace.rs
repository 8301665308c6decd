use crate::{validate_string, Error};

string_id!(WorkspaceId);
string_id!(ChangeId);

/// The fields of a workspace that the review client keeps around
///
/// This is also the result of landing a workspace change: the server answers
/// with the same entity, updated in place.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: WorkspaceId,
    pub up_to_date_with_trunk: bool,
    pub draft_description: String,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Change {
    pub id: ChangeId,
    pub description: String,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct LandWorkspaceChangeInput {
    #[serde(rename = "workspaceID")]
    pub workspace_id: WorkspaceId,

    /// Hunks of the workspace's diff that should be part of the landed change
    #[serde(rename = "patchIDs")]
    pub patch_ids: Vec<String>,
}

impl LandWorkspaceChangeInput {
    pub fn validate(&self) -> Result<(), Error> {
        validate_string(&self.workspace_id.0)?;
        for p in self.patch_ids.iter() {
            validate_string(p)?;
        }
        Ok(())
    }
}
