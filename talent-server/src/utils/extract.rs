//! JSON extractors
//!
//! axum's own `Json` rejects malformed bodies with a plain-text response.
//! These wrappers render the rejection through the [`AppError`] envelope
//! (400 ValidationFailed) and, for [`ValidJson`], run `validator` rules.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::utils::AppError;

/// `Json<T>` with enveloped rejections
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(data)) => Ok(AppJson(data)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

/// `Json<T>` followed by `T::validate()`
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let AppJson(data) = AppJson::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidJson(data))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    AppError::validation(rejection.body_text()).with_detail("status", rejection.status().as_u16())
}
