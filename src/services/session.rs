//! Session value object.
//!
//! A session is either signed out or holds one fully populated user.
//! Every transition hands back the matching [`AuthStateChanged`] so the
//! caller decides how to publish it.

use uuid::Uuid;

use crate::shared::event::AuthStateChanged;
use crate::shared::user::UserData;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    SignedOut,
    SignedIn(UserData),
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `user`, replacing any previous one
    pub fn establish(&mut self, user: UserData) -> AuthStateChanged {
        *self = Self::SignedIn(user.clone());
        AuthStateChanged::signed_in(user)
    }

    /// Drop the current user, whatever the prior state
    pub fn clear(&mut self) -> AuthStateChanged {
        *self = Self::SignedOut;
        AuthStateChanged::signed_out()
    }

    /// Replace the stored record with a newer copy of the same user.
    ///
    /// Returns `None` (and changes nothing) when signed out or when the
    /// ids differ.
    pub fn update(&mut self, user: UserData) -> Option<AuthStateChanged> {
        if self.user_id() != Some(user.id) {
            return None;
        }
        Some(self.establish(user))
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }

    pub fn current_user(&self) -> Option<&UserData> {
        match self {
            Self::SignedIn(user) => Some(user),
            Self::SignedOut => None,
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.current_user().map(|user| user.id)
    }

    pub fn username(&self) -> Option<&str> {
        self.current_user().map(|user| user.username.as_str())
    }

    pub fn email(&self) -> Option<&str> {
        self.current_user().map(|user| user.email.as_str())
    }

    pub fn full_name(&self) -> Option<&str> {
        self.current_user().and_then(|user| user.full_name.as_deref())
    }
}
