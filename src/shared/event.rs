/**
 * Authentication State Events
 *
 * Notifications emitted whenever the session is established, refreshed,
 * updated or cleared. They are delivered over a `tokio::sync::broadcast`
 * channel so any number of views can follow the session without holding
 * a reference to the service.
 */
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::shared::user::UserData;

/// Channel capacity for state notifications
pub const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Session state notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStateChanged {
    pub is_authenticated: bool,
    pub user: Option<UserData>,
}

impl AuthStateChanged {
    /// A session was established or refreshed for `user`
    pub fn signed_in(user: UserData) -> Self {
        Self {
            is_authenticated: true,
            user: Some(user),
        }
    }

    /// The session was cleared
    pub fn signed_out() -> Self {
        Self {
            is_authenticated: false,
            user: None,
        }
    }
}

/// Sender half shared by everything that publishes state changes
pub type AuthEventBroadcast = broadcast::Sender<AuthStateChanged>;

/// Create a new state-change channel
pub fn channel() -> AuthEventBroadcast {
    let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
    tx
}

/// Broadcast a state change to all subscribers.
///
/// Returns the number of subscribers that received the event (0 if none).
pub fn broadcast_event(broadcast_tx: &AuthEventBroadcast, event: AuthStateChanged) -> usize {
    match broadcast_tx.send(event) {
        Ok(subscriber_count) => {
            tracing::debug!("[Auth] State change delivered to {} subscribers", subscriber_count);
            subscriber_count
        }
        Err(_) => {
            tracing::trace!("[Auth] No subscribers for state change");
            0
        }
    }
}
