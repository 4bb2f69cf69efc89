//! Shared HTTP response handling.

use crate::error::OracleError;

/// Pass successful responses through; map everything else to
/// [`OracleError::Api`] with the response body as the message.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, OracleError> {
    if !resp.status().is_success() {
        return Err(OracleError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}
