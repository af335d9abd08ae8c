//! Sign-up, sign-in and sign-out flows.

use crate::auth::identity::{IdentityProvider, ProfileStore, UserProfile};
use crate::auth::session::{Session, SessionStore};
use crate::auth::validate;
use anyhow::Result;
use chrono::Utc;
use tracing::info;

/// Orchestrates credential checks, the identity service and the local
/// session file. Validation failures never reach the network.
pub struct AuthService {
    identity: Box<dyn IdentityProvider>,
    profiles: Box<dyn ProfileStore>,
    sessions: SessionStore,
}

impl AuthService {
    pub fn new(
        identity: Box<dyn IdentityProvider>,
        profiles: Box<dyn ProfileStore>,
        sessions: SessionStore,
    ) -> Self {
        AuthService {
            identity,
            profiles,
            sessions,
        }
    }

    /// Creates a remote account and writes its profile record. Does not
    /// sign the user in; they log in afterwards, as on the original form.
    pub async fn sign_up(&self, user_name: &str, email: &str, password: &str) -> Result<()> {
        validate::validate_user_name(user_name)?;
        validate::validate_email(email)?;
        validate::validate_password(password)?;

        let account = self.identity.sign_up(email, password).await?;
        let profile = UserProfile {
            user_name: user_name.to_string(),
            email: email.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        self.profiles.write_profile(&account.uid, &profile).await?;
        info!("Account created for {email}");
        Ok(())
    }

    /// Authenticates and persists the session locally.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        validate::validate_email(email)?;
        validate::validate_password(password)?;

        let account = self.identity.sign_in(email, password).await?;
        let session = Session {
            uid: account.uid,
            email: account.email,
            id_token: account.id_token,
            signed_in_at: Utc::now(),
        };
        self.sessions.save(&session)?;
        info!("Signed in as {}", session.email);
        Ok(session)
    }

    /// Removes the local session. The remote service keeps no CLI state.
    pub fn sign_out(&self) -> Result<()> {
        self.sessions.clear()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.sessions.load()
    }
}
