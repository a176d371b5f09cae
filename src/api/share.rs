//! Share target endpoints
//!
//! `POST /share` receives a share action (form-urlencoded or multipart),
//! parks the payload in the share bridge and redirects the browser to the
//! app with the token. The app then reads the payload once through
//! `GET /v1/shared-text`.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};

use super::dto::SharedTextParams;
use super::extract::ApiQuery;
use crate::AppState;
use crate::data::SharedPayload;
use crate::error::AppError;

/// Share submission body, accepted as either form encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareSubmission(pub SharedPayload);

#[async_trait]
impl<S> FromRequest<S> for ShareSubmission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);
        let empty_body = req
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.trim() == "0");

        // A bare submission carries no fields; every field defaults to empty
        let Some(content_type) = content_type else {
            return Ok(Self(SharedPayload::default()));
        };
        if empty_body {
            return Ok(Self(SharedPayload::default()));
        }

        if !content_type.starts_with("multipart/form-data") {
            let axum::Form(payload) = axum::Form::<SharedPayload>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.to_string()))?;
            return Ok(Self(payload));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let mut payload = SharedPayload::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let slot = match name.as_str() {
                "text" => &mut payload.text,
                "title" => &mut payload.title,
                "url" => &mut payload.url,
                // Shared files and unknown fields are skipped unread
                _ => continue,
            };
            *slot = field
                .text()
                .await
                .map_err(|e| AppError::Validation(e.to_string()))?;
        }

        Ok(Self(payload))
    }
}

fn redirect_location(redirect_path: &str, token: &str) -> String {
    let separator = if redirect_path.contains('?') { '&' } else { '?' };
    format!("{redirect_path}{separator}shared={token}")
}

/// POST /share
pub async fn submit_share(
    State(state): State<AppState>,
    ShareSubmission(payload): ShareSubmission,
) -> Response {
    let token = state.share_bridge.put(payload).await;
    tracing::debug!("Share payload stored");

    let location = redirect_location(&state.config.share.redirect_path, &token);
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// GET /v1/shared-text
pub async fn get_shared_text(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SharedTextParams>,
) -> Result<Json<SharedPayload>, AppError> {
    let payload = state
        .share_bridge
        .take(&params.token)
        .await
        .ok_or(AppError::NotFound)?;

    Ok(Json(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn location_appends_token_query() {
        assert_eq!(redirect_location("/", "abc"), "/?shared=abc");
        assert_eq!(
            redirect_location("/app?from=share", "abc"),
            "/app?from=share&shared=abc"
        );
    }

    #[tokio::test]
    async fn urlencoded_submission_is_parsed_with_defaults() {
        let req = Request::builder()
            .method("POST")
            .uri("/share")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("text=%ED%83%9D%EB%B0%B0+link&url=https%3A%2F%2Fx.y"))
            .unwrap();

        let ShareSubmission(payload) = ShareSubmission::from_request(req, &()).await.unwrap();

        assert_eq!(payload.text, "택배 link");
        assert_eq!(payload.title, "");
        assert_eq!(payload.url, "https://x.y");
    }

    #[tokio::test]
    async fn bare_submission_defaults_every_field() {
        let req = Request::builder()
            .method("POST")
            .uri("/share")
            .body(Body::empty())
            .unwrap();

        let ShareSubmission(payload) = ShareSubmission::from_request(req, &()).await.unwrap();

        assert_eq!(payload, SharedPayload::default());
    }

    #[tokio::test]
    async fn empty_body_with_other_content_type_defaults_every_field() {
        let req = Request::builder()
            .method("POST")
            .uri("/share")
            .header(header::CONTENT_TYPE, "text/plain")
            .header(header::CONTENT_LENGTH, "0")
            .body(Body::empty())
            .unwrap();

        let ShareSubmission(payload) = ShareSubmission::from_request(req, &()).await.unwrap();

        assert_eq!(payload, SharedPayload::default());
    }

    #[tokio::test]
    async fn multipart_submission_is_parsed() {
        let body = concat!(
            "--XBOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"title\"\r\n\r\n",
            "Shared title\r\n",
            "--XBOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"text\"\r\n\r\n",
            "Your parcel is waiting\r\n",
            "--XBOUNDARY--\r\n",
        );
        let req = Request::builder()
            .method("POST")
            .uri("/share")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
            .body(Body::from(body))
            .unwrap();

        let ShareSubmission(payload) = ShareSubmission::from_request(req, &()).await.unwrap();

        assert_eq!(
            payload,
            SharedPayload {
                text: "Your parcel is waiting".to_string(),
                title: "Shared title".to_string(),
                url: String::new(),
            }
        );
    }
}
