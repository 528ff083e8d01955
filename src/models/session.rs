use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Represents a persisted user session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque random token, hex-encoded.
    pub token: String,
    /// The ID of the user this session belongs to.
    pub user_id: i64,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is past its lifetime at `now`.
    ///
    /// The upper bound is exclusive: a session whose `created_at + max_age`
    /// equals `now` is already expired. An end past the representable range
    /// never expires.
    pub fn is_expired(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        self.created_at
            .checked_add_signed(max_age)
            .is_some_and(|end| end <= now)
    }
}

/// The validated session attached to a request by the authentication gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub token: String,
    pub user_id: i64,
}

impl From<&Session> for AuthenticatedSession {
    fn from(session: &Session) -> Self {
        Self {
            token: session.token.clone(),
            user_id: session.user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_created_at(created_at: DateTime<Utc>) -> Session {
        Session {
            token: "ab".repeat(32),
            user_id: 1,
            created_at,
        }
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let now = Utc::now();
        let max_age = Duration::seconds(3600);

        let exactly_at_limit = session_created_at(now - max_age);
        assert!(exactly_at_limit.is_expired(max_age, now));

        let one_second_left = session_created_at(now - max_age + Duration::seconds(1));
        assert!(!one_second_left.is_expired(max_age, now));

        let long_gone = session_created_at(now - Duration::days(2));
        assert!(long_gone.is_expired(max_age, now));
    }

    #[test]
    fn huge_lifetime_does_not_overflow() {
        let now = Utc::now();
        let session = session_created_at(now);

        assert!(!session.is_expired(Duration::MAX, now));
        assert!(!session.is_expired(Duration::days(3650), now));
    }
}
