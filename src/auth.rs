// src/auth.rs

use crate::watch::{Subscription, Watchers};
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The currently authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub display_name: String,
    pub email: Option<String>,
    pub signed_in_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("The popup has been closed by the user before finalizing the operation.")]
    PopupClosed,
}

pub type IdentityFeed = Subscription<Option<Identity>>;

/// Operations the catalog consumes from its auth service.
pub trait AuthProvider: Send + Sync {
    /// Interactive sign-in. Resolves once the user completes or abandons it.
    fn sign_in_with_popup(&self) -> Result<Identity, AuthError>;

    fn sign_out(&self) -> Result<(), AuthError>;

    /// Current identity now, then on every sign-in/sign-out.
    fn watch_identity(&self) -> IdentityFeed;
}

/// An account the local provider will sign in when asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAccount {
    pub uid: String,
    pub display_name: String,
    pub email: Option<String>,
}

/// Auth provider backed by a preconfigured account. Without an account every
/// sign-in behaves like a popup the user closed.
pub struct LocalAuthProvider {
    account: Option<LocalAccount>,
    current: Mutex<Option<Identity>>,
    watchers: Arc<Watchers<(), Option<Identity>>>,
}

impl LocalAuthProvider {
    pub fn new(account: Option<LocalAccount>) -> Self {
        LocalAuthProvider {
            account,
            current: Mutex::new(None),
            watchers: Watchers::new(),
        }
    }

    fn current(&self) -> MutexGuard<'_, Option<Identity>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_current(&self, identity: Option<Identity>) {
        *self.current() = identity.clone();
        self.watchers.notify(|_| true, |_| identity.clone());
    }
}

impl AuthProvider for LocalAuthProvider {
    fn sign_in_with_popup(&self) -> Result<Identity, AuthError> {
        let account = self.account.as_ref().ok_or(AuthError::PopupClosed)?;
        let identity = Identity {
            uid: account.uid.clone(),
            display_name: account.display_name.clone(),
            email: account.email.clone(),
            signed_in_at: Utc::now(),
        };
        debug!("Signed in {} ({})", identity.display_name, identity.uid);
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        self.set_current(None);
        Ok(())
    }

    fn watch_identity(&self) -> IdentityFeed {
        let current = self.current().clone();
        self.watchers.watch((), current)
    }
}

/// Process-wide session state: the identity most recently reported by the
/// provider. Created by `init` at start-up and released by `shutdown`.
pub struct SessionContext {
    feed: Option<IdentityFeed>,
    identity: Option<Identity>,
}

impl SessionContext {
    pub fn init(provider: &dyn AuthProvider) -> Self {
        let mut session = SessionContext {
            feed: Some(provider.watch_identity()),
            identity: None,
        };
        session.pump();
        session
    }

    /// Applies pending identity changes. Returns true when the identity changed.
    pub fn pump(&mut self) -> bool {
        let Some(next) = self.feed.as_ref().and_then(|feed| feed.latest()) else {
            return false;
        };
        if next == self.identity {
            return false;
        }
        match &next {
            Some(user) => info!(
                "Session: signed in as {} at {}",
                user.display_name,
                user.signed_in_at.to_rfc3339()
            ),
            None => info!("Session: signed out"),
        }
        self.identity = next;
        true
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    /// Stops listening to the provider. The last identity is forgotten.
    pub fn shutdown(&mut self) {
        self.feed = None;
        self.identity = None;
    }
}
