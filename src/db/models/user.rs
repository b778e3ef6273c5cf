use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row of the `users` table. Credentials live elsewhere; this table only
/// anchors identities that tokens may refer to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserAccount {
    pub id: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}
