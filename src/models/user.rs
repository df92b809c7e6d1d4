use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Recruiter,
    Viewer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub avatar_url: String,
}

impl User {
    pub fn demo_admin() -> Self {
        Self {
            id: "u-1".to_string(),
            name: "Admin".to_string(),
            email: "admin@recruithub.com".to_string(),
            role: Role::Admin,
            avatar_url: String::new(),
        }
    }
}
