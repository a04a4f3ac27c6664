use serde::Serialize;
use crate::model::account::{Account, PublicProfile};

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub message: String,
    pub user: PublicProfile,
}

/// Shape the authenticated account for the profile endpoint. Credentials and
/// lockout state never leave the service.
pub fn current_profile(account: &Account) -> ProfileResponse {
    ProfileResponse {
        success: true,
        message: "User fetched successfully".to_string(),
        user: PublicProfile::from(account),
    }
}
