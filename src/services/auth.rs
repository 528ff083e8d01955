use chrono::{Duration, Utc};
use tower_cookies::{Cookie, Cookies};

use crate::{
    cookies::token_cookie,
    crypto::{envelope::SessionCookie, token::generate_session_token},
    error::{AppError, Result},
    models::{
        session::Session,
        user::{BusinessCategory, NewUser, User},
    },
    repositories::store::Store,
    services::cas::CasIdentity,
    state::AppState,
};

/// Why a request carries no usable session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsentReason {
    NoCookie,
    Undecodable,
    EmptyToken,
    NotFound,
    LookupFailed,
    Expired,
}

/// The outcome of inspecting the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Active(Session),
    Absent(AbsentReason),
}

/// A freshly minted session and the cookie that carries it.
#[derive(Debug)]
pub struct IssuedSession {
    pub user: User,
    pub session: Session,
    pub cookie: Cookie<'static>,
}

/// Resolves the session carried by the request cookies, if any.
///
/// Cookie → envelope → token → repository → expiry. Every failure, including a
/// storage error, yields `Absent`; the session row is never modified.
pub async fn check_session<S: Store>(state: &AppState<S>, cookies: &Cookies) -> SessionStatus {
    let Some(cookie) = cookies.get(state.session_codec.name()) else {
        return SessionStatus::Absent(AbsentReason::NoCookie);
    };

    let payload: SessionCookie = match state.session_codec.decode(cookie.value()) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!("❌ Session cookie rejected: {}", e);
            return SessionStatus::Absent(AbsentReason::Undecodable);
        }
    };

    if payload.session_token.is_empty() {
        return SessionStatus::Absent(AbsentReason::EmptyToken);
    }

    let session = match state.store.get_session(&payload.session_token).await {
        Ok(Some(session)) => session,
        Ok(None) => return SessionStatus::Absent(AbsentReason::NotFound),
        Err(e) => {
            tracing::error!("❌ Session lookup failed: {}", e);
            return SessionStatus::Absent(AbsentReason::LookupFailed);
        }
    };

    let max_age = Duration::try_seconds(state.config.session.token.max_age_secs).unwrap_or(Duration::MAX);
    if session.is_expired(max_age, Utc::now()) {
        tracing::debug!("⌛ Session expired for user: {}", session.user_id);
        return SessionStatus::Absent(AbsentReason::Expired);
    }

    SessionStatus::Active(session)
}

/// Maps the provider's identity to the attributes stored for a user.
pub fn new_user_from_identity(identity: CasIdentity) -> NewUser {
    NewUser {
        business_category: BusinessCategory::from_provider(&identity.business_category),
        email: identity.email,
        full_name: identity.full_name,
        department_number: identity.department_number,
    }
}

/// Completes a CAS login from the ticket on the callback.
///
/// Validates the ticket, upserts the user, persists a new session and seals
/// it into a cookie. The steps run strictly in that order; a failure at any
/// step creates no session.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `ticket` - The `ticket` query parameter, possibly empty.
///
/// # Returns
///
/// A `Result` containing the `IssuedSession`.
pub async fn complete_login<S: Store>(state: &AppState<S>, ticket: &str) -> Result<IssuedSession> {
    if ticket.is_empty() {
        return Err(AppError::Validation("Ticket is missing".to_string()));
    }

    let identity = state
        .cas
        .validate(ticket, &state.config.cas_callback_url())
        .await?;
    tracing::info!("🎫 CAS ticket accepted for: {}", identity.user);

    let user = state
        .store
        .upsert_user(new_user_from_identity(identity))
        .await?;

    let token = generate_session_token();
    let session = state.store.create_session(&token, user.id).await?;
    tracing::info!("✅ Session created for user: {}", user.id);

    let sealed = state.session_codec.encode(&SessionCookie {
        session_token: token,
    })?;
    let cookie = token_cookie(&state.config.session.token, sealed);

    Ok(IssuedSession {
        user,
        session,
        cookie,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_identity_attributes() {
        let identity = CasIdentity {
            user: "jdoe".to_string(),
            full_name: "John Doe".to_string(),
            email: "jdoe@example.com".to_string(),
            department_number: "ICM 2A".to_string(),
            business_category: "ELEVE".to_string(),
        };

        let user = new_user_from_identity(identity.clone());
        assert_eq!(user.email, "jdoe@example.com");
        assert_eq!(user.full_name, "John Doe");
        assert_eq!(user.department_number, "ICM 2A");
        assert_eq!(user.business_category, BusinessCategory::Student);

        let staff = new_user_from_identity(CasIdentity {
            business_category: "PROF".to_string(),
            ..identity
        });
        assert_eq!(staff.business_category, BusinessCategory::Teacher);
    }
}
