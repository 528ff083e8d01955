//! CAS 2.0 ticket validation.
//!
//! The client performs one `serviceValidate` call per ticket and turns the
//! provider's XML answer into either an identity or a failure. There is no
//! retry and nothing is cached: tickets are single-use.

use std::time::Duration;

use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use reqwest::{StatusCode, Url, redirect};
use thiserror::Error;

/// The CAS XML namespace.
pub const CAS_NAMESPACE: &[u8] = b"http://www.yale.edu/tp/cas";

/// Largest `serviceValidate` body accepted from the provider.
pub const MAX_RESPONSE_BYTES: usize = 64 * 1024;

/// Identity attributes asserted by the provider on success.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CasIdentity {
    pub user: String,
    /// The `cn` attribute.
    pub full_name: String,
    pub email: String,
    pub department_number: String,
    /// The raw `businessCategory` attribute.
    pub business_category: String,
}

/// A parsed `serviceResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CasResponse {
    Success(CasIdentity),
    Failure { code: String, message: String },
}

/// Why a ticket could not be validated.
#[derive(Error, Debug)]
pub enum CasError {
    #[error("ticket is missing")]
    MissingTicket,

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("got a non 200 status code: {0}")]
    UnexpectedStatus(u16),

    #[error("malformed CAS response: {0}")]
    Malformed(String),

    /// The provider explicitly refused the ticket.
    #[error("authentication failure ({code}): {message}")]
    Rejected { code: String, message: String },

    #[error("invalid CAS URL: {0}")]
    InvalidUrl(String),

    #[error("CAS response exceeds {0} bytes")]
    ResponseTooLarge(usize),
}

/// HTTP client for a CAS identity provider.
#[derive(Clone, Debug)]
pub struct CasClient {
    http: reqwest::Client,
    login_endpoint: Url,
    validate_endpoint: Url,
}

impl CasClient {
    /// Creates a client for the CAS server at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The CAS base URL, without trailing slash.
    /// * `timeout` - Timeout of each validation call.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `CasClient`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CasError> {
        let base_url = base_url.trim_end_matches('/');
        let login_endpoint = Url::parse(&format!("{}/login", base_url))
            .map_err(|e| CasError::InvalidUrl(e.to_string()))?;
        let validate_endpoint = Url::parse(&format!("{}/serviceValidate", base_url))
            .map_err(|e| CasError::InvalidUrl(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            http,
            login_endpoint,
            validate_endpoint,
        })
    }

    /// The provider login URL that redirects back to `service` with a ticket.
    pub fn login_url(&self, service: &str) -> String {
        let mut url = self.login_endpoint.clone();
        url.query_pairs_mut().append_pair("service", service);
        url.into()
    }

    /// Validates `ticket` for `service`.
    ///
    /// `service` must be the exact URL the ticket was issued for.
    pub async fn validate(&self, ticket: &str, service: &str) -> Result<CasIdentity, CasError> {
        if ticket.is_empty() {
            return Err(CasError::MissingTicket);
        }

        let mut url = self.validate_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("service", service)
            .append_pair("ticket", ticket);

        tracing::debug!("🎫 Validating CAS ticket against {}", self.validate_endpoint);

        let response = self.http.get(url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(CasError::UnexpectedStatus(response.status().as_u16()));
        }
        let body = read_capped(response, MAX_RESPONSE_BYTES).await?;

        match parse_service_response(&body)? {
            CasResponse::Success(identity) => {
                tracing::debug!("✅ CAS ticket validated for {}", identity.user);
                Ok(identity)
            }
            CasResponse::Failure { code, message } => Err(CasError::Rejected { code, message }),
        }
    }
}

/// Reads at most `limit` bytes of `response` as UTF-8 text.
async fn read_capped(mut response: reqwest::Response, limit: usize) -> Result<String, CasError> {
    if response
        .content_length()
        .is_some_and(|len| len > limit as u64)
    {
        return Err(CasError::ResponseTooLarge(limit));
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > limit {
            return Err(CasError::ResponseTooLarge(limit));
        }
        body.extend_from_slice(&chunk);
    }

    String::from_utf8(body).map_err(|e| CasError::Malformed(e.to_string()))
}

/// Parses a CAS 2.0 `serviceResponse` document.
///
/// Only elements in the CAS namespace are interpreted. A success without an
/// email is rejected since the email is the identity key.
pub fn parse_service_response(xml: &str) -> Result<CasResponse, CasError> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let malformed = |e: quick_xml::Error| CasError::Malformed(e.to_string());

    // Local names of the open elements; foreign elements are recorded as "".
    let mut path: Vec<String> = Vec::new();
    let mut saw_root = false;
    let mut identity: Option<CasIdentity> = None;
    let mut failure: Option<(String, String)> = None;

    loop {
        let (namespace, event) = reader.read_resolved_event().map_err(malformed)?;
        match event {
            Event::Start(ref element) | Event::Empty(ref element) => {
                let is_empty = matches!(event, Event::Empty(_));
                let local = match namespace {
                    ResolveResult::Bound(ns) if ns.as_ref() == CAS_NAMESPACE => {
                        String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
                    }
                    _ => String::new(),
                };

                if path.is_empty() {
                    if saw_root || local != "serviceResponse" {
                        return Err(CasError::Malformed(
                            "expected a cas:serviceResponse root element".to_string(),
                        ));
                    }
                    saw_root = true;
                }

                if path.len() == 1 {
                    match local.as_str() {
                        "authenticationSuccess" => {
                            identity.get_or_insert_with(CasIdentity::default);
                        }
                        "authenticationFailure" => {
                            let code = element
                                .try_get_attribute("code")
                                .map_err(|e| malformed(e.into()))?
                                .map(|attr| attr.unescape_value().map(|v| v.into_owned()))
                                .transpose()
                                .map_err(malformed)?
                                .unwrap_or_default();
                            failure = Some((code, String::new()));
                        }
                        _ => {}
                    }
                }

                if !is_empty {
                    path.push(local);
                }
            }
            Event::End(_) => {
                path.pop();
            }
            Event::Text(ref text) => {
                let value = text.unescape().map_err(malformed)?;
                record_text(&path, &value, &mut identity, &mut failure);
            }
            Event::CData(ref data) => {
                let value = String::from_utf8_lossy(data).into_owned();
                record_text(&path, &value, &mut identity, &mut failure);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(CasError::Malformed(
            "expected a cas:serviceResponse root element".to_string(),
        ));
    }
    if !path.is_empty() {
        return Err(CasError::Malformed("unexpected end of document".to_string()));
    }

    match (identity, failure) {
        (_, Some((code, message))) => Ok(CasResponse::Failure {
            code,
            message: message.trim().to_string(),
        }),
        (Some(identity), None) => {
            if identity.email.trim().is_empty() {
                return Err(CasError::Malformed("missing email attribute".to_string()));
            }
            Ok(CasResponse::Success(identity))
        }
        (None, None) => Err(CasError::Malformed(
            "neither authenticationSuccess nor authenticationFailure".to_string(),
        )),
    }
}

fn record_text(
    path: &[String],
    value: &str,
    identity: &mut Option<CasIdentity>,
    failure: &mut Option<(String, String)>,
) {
    let names: Vec<&str> = path.iter().map(String::as_str).collect();
    match names.as_slice() {
        ["serviceResponse", "authenticationFailure"] => {
            if let Some((_, message)) = failure.as_mut() {
                message.push_str(value);
            }
        }
        ["serviceResponse", "authenticationSuccess", rest @ ..] => {
            let Some(identity) = identity.as_mut() else {
                return;
            };
            let field = match rest {
                ["user"] => &mut identity.user,
                ["attributes", "cn"] => &mut identity.full_name,
                ["attributes", "email"] => &mut identity.email,
                ["attributes", "departmentNumber"] => &mut identity.department_number,
                ["attributes", "businessCategory"] => &mut identity.business_category,
                _ => return,
            };
            field.push_str(value);
        }
        _ => {}
    }
}
