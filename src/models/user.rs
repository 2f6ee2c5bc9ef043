use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub profile: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub birthday: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdmin {
    #[serde(flatten)]
    pub user: NewUser,
    pub role_id: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub birthday: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfilePatch {
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    #[serde(alias = "password")]
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRole {
    pub name: String,
}

/// Login by user name or email.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    #[serde(alias = "userName", alias = "email")]
    pub login: String,
    pub password: String,
}
