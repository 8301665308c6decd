use crate::{validate_string, Error};

string_id!(UserId);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn validate(&self) -> Result<(), Error> {
        validate_string(&self.id.0)?;
        validate_string(&self.name)?;
        validate_string(&self.email)
    }
}
