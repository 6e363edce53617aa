use serde::{Deserialize, Serialize};

use crate::model::ids::UserId;

/// Role a signed-in user acts under; decides which screens they see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Patient,
    #[serde(alias = "organizer")]
    Crc,
    Doctor,
}

impl UserRole {
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            UserRole::Patient => "Patient",
            UserRole::Crc => "Clinical Research Coordinator",
            UserRole::Doctor => "Doctor",
        }
    }
}

/// The user object returned by the sign-in endpoint and kept on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Patient id for patients, coordinator id for CRCs.
    pub main_id: UserId,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default = "default_role")]
    pub user_type: UserRole,
}

fn default_role() -> UserRole {
    UserRole::Patient
}

impl User {
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_owned()
        }
    }

    #[must_use]
    pub fn is_patient(&self) -> bool {
        self.user_type == UserRole::Patient
    }
}
