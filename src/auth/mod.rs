//! Identity collaborator: who is signed in, and change notifications.
//!
//! Authentication itself (passwords, OAuth popups) lives outside this crate;
//! the ledger only needs the current user identity and a signal when it
//! changes. Operations take the user explicitly rather than reading a
//! process-wide global.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Opaque identity of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Authentication state change delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(UserId),
    SignedOut,
}

/// Source of the current authenticated user plus change notifications.
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<UserId>;

    /// Registers a subscriber receiving every subsequent auth change.
    fn subscribe(&self) -> Receiver<AuthEvent>;
}

/// In-process identity provider with explicit sign-in/sign-out.
pub struct SessionIdentity {
    current: Mutex<Option<UserId>>,
    subscribers: Mutex<Vec<Sender<AuthEvent>>>,
}

impl SessionIdentity {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Provider that starts out already signed in as `user`.
    pub fn signed_in(user: UserId) -> Self {
        Self {
            current: Mutex::new(Some(user)),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn sign_in(&self, user: UserId) {
        *self.current.lock().expect("session state poisoned") = Some(user.clone());
        self.broadcast(AuthEvent::SignedIn(user));
    }

    pub fn sign_out(&self) {
        *self.current.lock().expect("session state poisoned") = None;
        self.broadcast(AuthEvent::SignedOut);
    }

    fn broadcast(&self, event: AuthEvent) {
        let mut subscribers = self.subscribers.lock().expect("subscriber registry poisoned");
        subscribers.retain(|sender| sender.send(event.clone()).is_ok());
    }
}

impl Default for SessionIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_user(&self) -> Option<UserId> {
        self.current.lock().expect("session state poisoned").clone()
    }

    fn subscribe(&self) -> Receiver<AuthEvent> {
        let (sender, receiver) = mpsc::channel();
        self.subscribers
            .lock()
            .expect("subscriber registry poisoned")
            .push(sender);
        receiver
    }
}
