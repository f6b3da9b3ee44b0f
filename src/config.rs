//! Client configuration and fixed values shared by the web and terminal front-ends.

/// Origin of the bonus points backend when nothing overrides it.
pub const DEFAULT_BACKEND_URL: &str = "https://bonus-back.vercel.app";

/// Name of the single value the client persists between visits.
#[cfg_attr(not(feature = "web"), allow(dead_code))]
pub const SESSION_STORAGE_KEY: &str = "sessionKey";

/// Reserved credential pair that opens the admin dashboard without contacting the backend.
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin";

/// Minimum length of a new password, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Delay before the registration page hands over to the login page.
#[cfg_attr(not(feature = "web"), allow(dead_code))]
pub const REDIRECT_DELAY_MS: u32 = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    backend_url: String,
}

impl ClientConfig {
    pub fn new(backend_url: impl Into<String>) -> Self {
        let backend_url = backend_url.into();
        let backend_url = backend_url.trim().trim_end_matches('/').to_string();
        ClientConfig { backend_url }
    }

    /// Uses `BONUS_BACKEND_URL` when it was set at compile time.
    pub fn from_build_env() -> Self {
        match option_env!("BONUS_BACKEND_URL") {
            Some(url) if !url.trim().is_empty() => ClientConfig::new(url),
            _ => ClientConfig::default(),
        }
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.backend_url, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig::new(DEFAULT_BACKEND_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_dropped() {
        let config = ClientConfig::new("http://localhost:3000/");
        assert_eq!(config.backend_url(), "http://localhost:3000");
        assert_eq!(config.endpoint("/login"), "http://localhost:3000/login");
    }

    #[test]
    fn test_default_points_at_hosted_backend() {
        let config = ClientConfig::default();
        assert_eq!(
            config.endpoint("users/balance"),
            "https://bonus-back.vercel.app/users/balance"
        );
    }
}
