//! Credential storage primitives: bcrypt hashing and login verification.

use bcrypt::{DEFAULT_COST, hash, verify};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use tracing::{debug, instrument};

use crate::entities::{prelude::Utente, utente};

impl utente::Model {
    /// Verify a candidate password against the stored bcrypt digest.
    ///
    /// Any verification error (malformed digest included) counts as a
    /// mismatch.
    pub fn verify_password(&self, candidate: &str) -> bool {
        verify(candidate, &self.password_hash).unwrap_or(false)
    }
}

/// Hash a password using bcrypt with default cost.
///
/// Bcrypt digests embed their own salt, so the `salt` column next to the
/// hash stays empty.
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Look up `username` and check `password` against its stored digest.
///
/// Returns the full record on success. `None` covers both "no such user" and
/// "wrong password" so callers cannot tell the two apart.
#[instrument(skip(db, password))]
pub async fn verify_login(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<Option<utente::Model>, DbErr> {
    let found = Utente::find()
        .filter(utente::Column::Username.eq(username))
        .one(db)
        .await?;

    match found {
        Some(user) if user.verify_password(password) => {
            debug!("Credentials accepted for user id {}", user.id);
            Ok(Some(user))
        }
        Some(_) => {
            debug!("Password mismatch for username '{}'", username);
            Ok(None)
        }
        None => {
            debug!("Unknown username '{}'", username);
            Ok(None)
        }
    }
}
