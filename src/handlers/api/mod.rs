pub mod login;
pub mod logout;
pub mod register;
pub mod reset;
pub mod search;
pub mod session;

use axum::{http::StatusCode, response::Json};
use serde_json::{json, Value};

/// Auth responses share one shape with the error path: statusCode + message.
pub(crate) fn auth_response(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({
            "statusCode": status.as_u16(),
            "message": message,
        })),
    )
}
