//! OAuth authentication module for Twitter API integration.
//!
//! This module implements OAuth 1.0a request signing (HMAC-SHA1), which is
//! what the v1.1 search endpoint requires. Every request gets a one-off
//! `Authorization` header computed from the four API credentials, the HTTP
//! method, the base URL, and the full set of query parameters.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::ApiCredentials;

type HmacSha1 = Hmac<Sha1>;

/// Percent-encodes a string per RFC 3986.
///
/// Only the unreserved characters (`A-Z a-z 0-9 - _ . ~`) are left bare;
/// everything else is encoded. This is the encoding OAuth 1.0a mandates for
/// parameter names, parameter values, and the signature base string.
pub(crate) fn percent_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

/// Builds the OAuth signature base string for a request.
///
/// The base string is `METHOD&encode(base_url)&encode(param_string)`, where
/// the parameter string is every request parameter (query and oauth_*),
/// percent-encoded, sorted by encoded name then encoded value, and joined
/// with `=` and `&`.
pub(crate) fn signature_base_string(
    method: &str,
    base_url: &str,
    params: &[(String, String)],
) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(base_url),
        percent_encode(&param_string)
    )
}

/// Computes the base64-encoded HMAC-SHA1 signature for a request.
///
/// The signing key is `encode(consumer_secret)&encode(access_token_secret)`.
pub(crate) fn sign_request(
    credentials: &ApiCredentials,
    method: &str,
    base_url: &str,
    params: &[(String, String)],
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let base_string = signature_base_string(method, base_url, params);
    let signing_key = format!(
        "{}&{}",
        percent_encode(&credentials.consumer_secret),
        percent_encode(&credentials.access_token_secret)
    );

    let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
        .map_err(|e| format!("Failed to initialize HMAC-SHA1: {}", e))?;
    mac.update(base_string.as_bytes());

    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Generates a 32-character alphanumeric nonce for one request.
fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Builds the `Authorization` header for an OAuth 1.0a signed request.
///
/// # Parameters
///
/// - `credentials`: The four API credential values
/// - `method`: HTTP method of the request (e.g. `"GET"`)
/// - `base_url`: The request URL without any query string
/// - `request_params`: Every query parameter the request will carry
///
/// # Returns
///
/// - `Ok(String)`: A header value of the form `OAuth oauth_consumer_key="...", ...`
/// - `Err(Box<dyn std::error::Error + Send + Sync>)`: If signing fails
pub fn build_oauth1_header(
    credentials: &ApiCredentials,
    method: &str,
    base_url: &str,
    request_params: &[(String, String)],
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    build_oauth1_header_at(
        credentials,
        method,
        base_url,
        request_params,
        &generate_nonce(),
        timestamp,
    )
}

/// Deterministic variant of [`build_oauth1_header`] taking an explicit nonce
/// and timestamp. Signing the same inputs always yields the same header.
pub(crate) fn build_oauth1_header_at(
    credentials: &ApiCredentials,
    method: &str,
    base_url: &str,
    request_params: &[(String, String)],
    nonce: &str,
    timestamp: u64,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let oauth_params: Vec<(String, String)> = vec![
        (
            "oauth_consumer_key".to_string(),
            credentials.consumer_key.clone(),
        ),
        ("oauth_nonce".to_string(), nonce.to_string()),
        (
            "oauth_signature_method".to_string(),
            "HMAC-SHA1".to_string(),
        ),
        ("oauth_timestamp".to_string(), timestamp.to_string()),
        ("oauth_token".to_string(), credentials.access_token.clone()),
        ("oauth_version".to_string(), "1.0".to_string()),
    ];

    // The signature covers the query parameters and the oauth_* parameters.
    let mut all_params: Vec<(String, String)> = request_params.to_vec();
    all_params.extend(oauth_params.iter().cloned());

    let signature = sign_request(credentials, method, base_url, &all_params)?;

    // The header itself carries only the oauth_* parameters plus the signature.
    let mut header_params = oauth_params;
    header_params.push(("oauth_signature".to_string(), signature));
    header_params.sort();

    let rendered = header_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!("OAuth {}", rendered))
}
