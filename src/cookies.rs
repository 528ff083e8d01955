use tower_cookies::Cookie;
use tower_cookies::cookie::time::Duration;

use crate::config::TokenSettings;

/// Creates a cookie carrying `value` with the attributes from `settings`.
pub fn token_cookie(settings: &TokenSettings, value: String) -> Cookie<'static> {
    Cookie::build((settings.cookie_name.clone(), value))
        .path("/")
        .secure(settings.secure)
        .http_only(settings.http_only)
        .same_site(settings.same_site)
        .max_age(Duration::seconds(settings.max_age_secs))
        .build()
}

/// Creates a cookie that makes the browser drop `name` immediately.
pub fn removal_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::secret::SecretKey;
    use tower_cookies::cookie::SameSite;

    #[test]
    fn token_cookie_carries_the_hardening_attributes() {
        let settings = TokenSettings {
            secret: SecretKey::new([0u8; 32]),
            cookie_name: "session_token".to_string(),
            max_age_secs: 3600,
            secure: true,
            http_only: true,
            same_site: SameSite::Strict,
        };

        let rendered = token_cookie(&settings, "sealed".to_string()).to_string();
        assert!(rendered.starts_with("session_token=sealed"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("SameSite=Strict"));
        assert!(rendered.contains("Max-Age=3600"));
        assert!(rendered.contains("Path=/"));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let rendered = removal_cookie("session_token").to_string();
        assert!(rendered.starts_with("session_token="));
        assert!(rendered.contains("Max-Age=0"));
    }
}
