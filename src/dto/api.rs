//! Response envelope shared by every endpoint.

use actix_web::http::StatusCode;
use serde::Serialize;

/// `{statusCode, message?, data?}` wrapper around every JSON response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn data(status: StatusCode, data: T) -> Self {
        Self {
            status_code: status.as_u16(),
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            status_code: status.as_u16(),
            message: Some(message.into()),
            data: Some(data),
        }
    }

    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            message: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn absent_parts_are_omitted() {
        let value =
            serde_json::to_value(ApiResponse::<()>::message(StatusCode::NOT_FOUND, "Not found"))
                .unwrap();

        assert_eq!(value, json!({"statusCode": 404, "message": "Not found"}));
    }

    #[test]
    fn data_and_message_are_both_kept() {
        let value = serde_json::to_value(ApiResponse::with_message(
            StatusCode::CREATED,
            "Task created successfully!",
            json!({"id": 1}),
        ))
        .unwrap();

        assert_eq!(
            value,
            json!({"statusCode": 201, "message": "Task created successfully!", "data": {"id": 1}})
        );
    }
}
