use std::str::FromStr;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// How `bim_password` is stored and compared.
///
/// `Plaintext` keeps parity with the mobile contract as deployed: credentials
/// are stored verbatim and compared by exact equality. `Argon2` stores PHC
/// hashes; switching an existing deployment requires re-sealing the stored
/// credentials first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CredentialScheme {
    #[default]
    Plaintext,
    Argon2,
}

impl FromStr for CredentialScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plaintext" | "plain" => Ok(Self::Plaintext),
            "argon2" => Ok(Self::Argon2),
            other => Err(format!("unknown credential scheme {other:?}")),
        }
    }
}

impl CredentialScheme {
    /// Whether `supplied` matches the stored credential. An unparseable stored
    /// hash counts as a mismatch.
    pub fn matches(self, supplied: &str, stored: &str) -> bool {
        match self {
            Self::Plaintext => supplied == stored,
            Self::Argon2 => verify_password(supplied, stored).is_ok(),
        }
    }

    /// Value to persist for a new credential.
    pub fn seal(self, credential: &str) -> Result<String, argon2::password_hash::Error> {
        match self {
            Self::Plaintext => Ok(credential.to_owned()),
            Self::Argon2 => hash_password(credential),
        }
    }
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    Ok(argon2.hash_password(password.as_bytes(), &salt)?.to_string())
}

pub fn verify_password(password: &str, hashed: &str) -> Result<(), argon2::password_hash::Error> {
    let argon2 = Argon2::default();
    let parsed = PasswordHash::new(hashed)?;

    argon2.verify_password(password.as_bytes(), &parsed)
}
