use crate::error::AppResult;
use crate::storage::{KeyValueStorage, SESSION_KEY};
use leptos::logging::warn;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Premium,
    Enterprise,
}

impl SubscriptionTier {
    pub fn is_paid(self) -> bool {
        matches!(self, SubscriptionTier::Premium | SubscriptionTier::Enterprise)
    }

    pub fn label(self) -> &'static str {
        match self {
            SubscriptionTier::Free => "Free",
            SubscriptionTier::Premium => "Premium",
            SubscriptionTier::Enterprise => "Enterprise",
        }
    }
}

/// The signed-in viewer. Mutations take it as an explicit argument.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub tier: SubscriptionTier,
}

/// Reads the cached session blob. A blob that no longer parses counts as
/// signed out.
pub fn load_session<S: KeyValueStorage>(storage: &S) -> AppResult<Option<Session>> {
    let Some(raw) = storage.get(SESSION_KEY)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(session) => Ok(Some(session)),
        Err(err) => {
            warn!("[SESSION] Ignoring unreadable session blob: {}", err);
            Ok(None)
        }
    }
}

pub fn save_session<S: KeyValueStorage>(storage: &S, session: &Session) -> AppResult<()> {
    let raw = serde_json::to_string(session)?;
    storage.set(SESSION_KEY, &raw)?;
    Ok(())
}

pub fn clear_session<S: KeyValueStorage>(storage: &S) -> AppResult<()> {
    storage.remove(SESSION_KEY)?;
    Ok(())
}
