use serde::{Deserialize, Serialize};

use super::{Credential, UserProfile};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Exchange of an external (third-party) credential for a session
#[derive(Debug, Clone, Serialize)]
pub struct ThirdPartyRequest {
    pub token: String,
}

/// Body returned by a successful login or third-party exchange
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSuccess {
    pub user: UserProfile,
    #[serde(rename = "accessToken")]
    pub access_token: Credential,
}
