use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    pub token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(rename = "firstName", default)]
    pub first_name: Option<String>,

    #[serde(rename = "lastName", default)]
    pub last_name: Option<String>,
}
