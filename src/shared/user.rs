/**
 * User Types
 *
 * Defines the signed-in user record and the wire shape of the login
 * remote procedure's response.
 */

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// User information held by the current session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
}

impl UserData {
    /// Full name when present and not blank, otherwise the username
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.username,
        }
    }

    /// Two-letter avatar initials derived from the display name
    pub fn initials(&self) -> String {
        let parts: Vec<&str> = self.display_name().split_whitespace().collect();
        match parts.as_slice() {
            [] => String::new(),
            [single] => single.chars().take(2).collect::<String>().to_uppercase(),
            [first, .., last] => first
                .chars()
                .take(1)
                .chain(last.chars().take(1))
                .collect::<String>()
                .to_uppercase(),
        }
    }
}

/// Single row of the `fn_user_login` response.
///
/// Field names are matched ignoring case and underscores, so `LoginStatus`,
/// `login_status`, `loginstatus` and `LOGINSTATUS` all land in
/// `login_status`. Unknown fields are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoginResult {
    pub id: Option<Uuid>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub login_status: i32,
}

/// Lower-cased key with underscores removed
fn normalize_field_name(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn field_value<T, E>(key: &str, value: Value) -> Result<T, E>
where
    T: DeserializeOwned,
    E: de::Error,
{
    serde_json::from_value(value).map_err(|e| E::custom(format!("field `{}`: {}", key, e)))
}

impl<'de> Deserialize<'de> for LoginResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = Map::<String, Value>::deserialize(deserializer)?;

        let mut row = LoginResult::default();
        for (key, value) in fields {
            match normalize_field_name(&key).as_str() {
                "id" => row.id = field_value(&key, value)?,
                "username" => row.username = field_value(&key, value)?,
                "email" => row.email = field_value(&key, value)?,
                "fullname" => row.full_name = field_value(&key, value)?,
                "loginstatus" => row.login_status = field_value(&key, value)?,
                _ => {}
            }
        }
        Ok(row)
    }
}

impl LoginResult {
    /// Status `0` with an id present
    pub fn is_success(&self) -> bool {
        self.login_status == 0 && self.id.is_some()
    }

    /// Convert a successful row into the session record.
    ///
    /// `requested_username` fills in a username the backend omitted.
    pub fn into_user(self, requested_username: &str) -> Option<UserData> {
        if !self.is_success() {
            return None;
        }
        let id = self.id?;
        Some(UserData {
            id,
            username: self
                .username
                .unwrap_or_else(|| requested_username.to_string()),
            email: self.email.unwrap_or_default(),
            full_name: self.full_name,
        })
    }
}
