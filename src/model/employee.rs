use std::fmt;

use sqlx::FromRow;

/// Employee record as the gateway sees it.
///
/// `bim_password` holds the credential exactly as stored: plaintext under the
/// default scheme, an argon2 PHC string under the hashed one.
#[derive(Clone, PartialEq, Eq, FromRow)]
pub struct Employee {
    pub id: u64,
    pub name: String,
    pub bim_user: Option<String>,
    pub bim_password: Option<String>,
    pub company_id: Option<u64>,
}

// Keeps credentials out of logs.
impl fmt::Debug for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Employee")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("bim_user", &self.bim_user)
            .field("bim_password", &self.bim_password.as_ref().map(|_| "<redacted>"))
            .field("company_id", &self.company_id)
            .finish()
    }
}
