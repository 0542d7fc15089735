//! Error retriability.

use anyhow::Error;

use crate::config::HTTP_STATUS_TOO_MANY_REQUESTS;

/// Determines if a fetch error is transient and worth retrying.
///
/// # Retriable
///
/// - Timeouts, connection failures and request errors
/// - Server errors (5xx)
/// - Rate limiting (429)
/// - Unknown errors
///
/// # Not retriable
///
/// - Client errors (4xx except 429)
/// - URL parse errors
/// - Redirect loops and body decode errors
/// - Empty bodies
/// - Bodies over the size limit
///
/// The error chain is inspected by downcasting, so context added with
/// `anyhow::Context` does not hide the cause.
pub(crate) fn is_retriable_error(error: &Error) -> bool {
    for cause in error.chain() {
        if let Some(reqwest_err) = cause.downcast_ref::<reqwest::Error>() {
            if let Some(status) = reqwest_err.status() {
                let status_code = status.as_u16();
                if status_code == HTTP_STATUS_TOO_MANY_REQUESTS {
                    return true;
                }
                if (400..500).contains(&status_code) {
                    return false;
                }
                if (500..600).contains(&status_code) {
                    return true;
                }
            }

            if reqwest_err.is_timeout() || reqwest_err.is_connect() || reqwest_err.is_request() {
                return true;
            }
            if reqwest_err.is_redirect() || reqwest_err.is_decode() || reqwest_err.is_builder() {
                return false;
            }
        }

        if cause.downcast_ref::<url::ParseError>().is_some() {
            return false;
        }

        if cause.downcast_ref::<EmptyBody>().is_some()
            || cause.downcast_ref::<BodyTooLarge>().is_some()
        {
            return false;
        }
    }

    true
}

/// A response that succeeded but carried no bytes.
#[derive(thiserror::Error, Debug)]
#[error("Empty response body")]
pub(crate) struct EmptyBody;

/// A response body larger than the fetcher accepts.
#[derive(thiserror::Error, Debug)]
#[error("Response body too large: {size} bytes (max: {max} bytes)")]
pub(crate) struct BodyTooLarge {
    pub size: u64,
    pub max: usize,
}
