use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, info, warn};

use worknest_types::Role;
use worknest_types::api::AuthResponse;

use crate::error::ClientError;
use crate::host::{ADMIN_PATH, LOGIN_PATH, PageHost, USER_PATH};
use crate::storage::Storage;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

const MISSING_TOKEN: &str = "undefined";

/// The profile as it sits in storage. Every field is optional: `{}` and
/// malformed JSON both read as an empty profile.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StoredProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Reads and writes the session token and profile, and gates pages by role.
///
/// Nothing here talks to the server: a stored token is trusted until a
/// request comes back 401.
pub struct SessionManager<S> {
    storage: S,
}

impl<S: Storage> SessionManager<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Whether any profile is stored, even an empty one.
    pub fn has_profile(&self) -> bool {
        self.storage.get(USER_KEY).is_some()
    }

    pub fn current_user(&self) -> StoredProfile {
        let Some(raw) = self.storage.get(USER_KEY) else {
            return StoredProfile::default();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Stored profile is not valid JSON: {}", e);
            StoredProfile::default()
        })
    }

    /// JSON content type plus `Authorization: Bearer <token>`.
    ///
    /// With no token stored the header reads `Bearer undefined`.
    pub fn auth_headers(&self) -> HeaderMap {
        let token = self.token().unwrap_or_else(|| MISSING_TOKEN.to_string());

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token)).unwrap_or_else(|_| {
            warn!("Stored token is not a valid header value");
            HeaderValue::from_static("Bearer undefined")
        });
        headers.insert(AUTHORIZATION, bearer);
        headers
    }

    /// Admin pages require `role == admin`. Anything else is sent to `/login`.
    pub fn check_admin_auth(&self, host: &mut impl PageHost) -> bool {
        if self.current_user().role == Some(Role::Admin) {
            return true;
        }
        debug!("Admin check failed, redirecting to {}", LOGIN_PATH);
        host.redirect(LOGIN_PATH);
        false
    }

    /// User pages only require a stored profile id; admins pass too.
    pub fn check_user_auth(&self, host: &mut impl PageHost) -> bool {
        if self.current_user().id.is_some() {
            return true;
        }
        debug!("User check failed, redirecting to {}", LOGIN_PATH);
        host.redirect(LOGIN_PATH);
        false
    }

    /// Persist the token and profile returned by login or registration.
    pub fn store(&mut self, auth: &AuthResponse) -> Result<(), ClientError> {
        self.storage.set(TOKEN_KEY, &auth.token)?;
        self.storage.set(USER_KEY, &serde_json::to_string(&auth.user)?)?;
        info!("Session stored for {} ({})", auth.user.email, auth.user.role);
        Ok(())
    }

    /// Clears both keys and goes to `/login`.
    ///
    /// The token is not revoked server-side; it stays valid until it expires.
    pub fn logout(&mut self, host: &mut impl PageHost) -> Result<(), ClientError> {
        self.clear()?;
        host.redirect(LOGIN_PATH);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), ClientError> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)?;
        Ok(())
    }
}

/// Landing page for a role.
pub fn home_path(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Admin) => ADMIN_PATH,
        _ => USER_PATH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[derive(Default)]
    struct RecordingHost {
        redirects: Vec<String>,
    }

    impl PageHost for RecordingHost {
        fn redirect(&mut self, path: &str) {
            self.redirects.push(path.to_string());
        }
        fn confirm(&mut self, _message: &str) -> bool {
            true
        }
        fn alert(&mut self, _message: &str) {}
    }

    fn session_with_user(user_json: Option<&str>) -> SessionManager<MemoryStorage> {
        let mut storage = MemoryStorage::new();
        if let Some(json) = user_json {
            storage.set(USER_KEY, json).unwrap();
        }
        SessionManager::new(storage)
    }

    #[test]
    fn auth_headers_always_carry_bearer_prefix() {
        let session = session_with_user(None);
        let headers = session.auth_headers();
        assert_eq!(headers[AUTHORIZATION], "Bearer undefined");
        assert_eq!(headers[CONTENT_TYPE], "application/json");

        let mut storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "tok-123").unwrap();
        let session = SessionManager::new(storage);
        assert_eq!(session.auth_headers()[AUTHORIZATION], "Bearer tok-123");
    }

    #[test]
    fn admin_check_rejects_empty_and_user_profiles() {
        for json in [None, Some("{}"), Some(r#"{"id":3,"role":"user"}"#), Some("garbage")] {
            let session = session_with_user(json);
            let mut host = RecordingHost::default();
            assert!(!session.check_admin_auth(&mut host), "{:?}", json);
            assert_eq!(host.redirects, vec![LOGIN_PATH]);
        }
    }

    #[test]
    fn admin_check_accepts_admin() {
        let session = session_with_user(Some(r#"{"id":1,"name":"Ada","role":"admin"}"#));
        let mut host = RecordingHost::default();
        assert!(session.check_admin_auth(&mut host));
        assert!(host.redirects.is_empty());
    }

    #[test]
    fn user_check_only_needs_an_id() {
        let mut host = RecordingHost::default();
        assert!(session_with_user(Some(r#"{"id":1,"role":"admin"}"#)).check_user_auth(&mut host));
        assert!(session_with_user(Some(r#"{"id":9}"#)).check_user_auth(&mut host));
        assert!(host.redirects.is_empty());

        assert!(!session_with_user(Some("{}")).check_user_auth(&mut host));
        assert_eq!(host.redirects, vec![LOGIN_PATH]);
    }

    #[test]
    fn logout_clears_both_keys() {
        let mut storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "tok").unwrap();
        storage.set(USER_KEY, r#"{"id":1}"#).unwrap();
        let mut session = SessionManager::new(storage);
        let mut host = RecordingHost::default();

        session.logout(&mut host).unwrap();
        assert!(session.token().is_none());
        assert_eq!(session.current_user(), StoredProfile::default());
        assert_eq!(host.redirects, vec![LOGIN_PATH]);
    }

    #[test]
    fn home_path_by_role() {
        assert_eq!(home_path(Some(Role::Admin)), ADMIN_PATH);
        assert_eq!(home_path(Some(Role::User)), USER_PATH);
        assert_eq!(home_path(None), USER_PATH);
    }
}
