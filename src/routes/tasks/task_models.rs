use serde::Serialize;

/// JSON body for every non-2xx response from the task endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
