use crate::error::{ItemLensError, Result};
use reqwest::Response;
use tracing::{debug, warn};

// Failures are logged at warn here; the analyzer owns the single error-level
// entry per failed call.

/// Convert a reqwest error to an ItemLensError, handling timeout errors specially.
pub fn handle_http_error(e: reqwest::Error, provider_name: &str) -> ItemLensError {
    warn!(error = %e, "HTTP request to {} failed", provider_name);
    if e.is_timeout() {
        ItemLensError::Timeout
    } else {
        ItemLensError::HttpError(e)
    }
}

/// Check HTTP response status and extract error message if unsuccessful.
pub async fn check_response_status(response: Response, provider_name: &str) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .map_err(|e| handle_http_error(e, provider_name))?;
        warn!(
            status = %status,
            error = %error_text,
            "{} API returned error response", provider_name
        );
        return Err(ItemLensError::ApiError(format!(
            "{} API error ({}): {}",
            provider_name, status, error_text
        )));
    }
    debug!(status = %status, "{} API returned success", provider_name);
    Ok(response)
}
