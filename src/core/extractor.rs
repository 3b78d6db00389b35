use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, OptionalFromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;

/// JSON body extractor whose rejections render as [`AppError::BadRequest`].
///
/// As `Option<AppJson<T>>` it yields `None` for a request without a
/// `Content-Type` header, so endpoints whose body is entirely optional can be
/// called bare.
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = <Json<T> as FromRequest<S>>::from_request(req, state)
            .await
            .map_err(BodyRejection)?;
        Ok(Self(value))
    }
}

impl<T, S> OptionalFromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Option<Self>, Self::Rejection> {
        let body = <Json<T> as OptionalFromRequest<S>>::from_request(req, state)
            .await
            .map_err(BodyRejection)?;
        Ok(body.map(|Json(value)| Self(value)))
    }
}

pub struct BodyRejection(JsonRejection);

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => format!("Request body does not match: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("Request body is not valid JSON: {}", err),
            JsonRejection::MissingJsonContentType(err) => {
                format!("Expected an application/json body: {}", err)
            }
            _ => "Could not read request body".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}
