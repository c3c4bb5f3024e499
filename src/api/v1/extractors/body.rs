/*
 * Responsibility
 * - Json / Query の rejection を AppError (共通のエラー本文) に揃える
 * - 中身の解釈は axum の Json / Query にそのまま任せる
 */
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// 壊れた body は 400 INVALID_JSON
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request("INVALID_JSON", rejection.body_text()))?;

        Ok(Self(value))
    }
}

/// 読めない query string は 400 INVALID_QUERY
pub struct AppQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request("INVALID_QUERY", rejection.body_text()))?;

        Ok(Self(value))
    }
}
