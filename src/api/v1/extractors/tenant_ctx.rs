/*
 * Responsibility
 * - AuthCtx + organization ヘッダ → OrganizationContext (Tenant Resolver の HTTP 側の入口)
 * - handler はこれを受け取った時点でテナントが 1 つに確定している
 *
 * 失敗
 * - 未認証: 401
 * - ヘッダが UTF-8 / 可視 ASCII でない: 400 INVALID_ORGANIZATION_HEADER
 * - ヘッダが複数ある: 400 AMBIGUOUS_ORGANIZATION_HEADER (どれか 1 つを選んだりしない)
 * - それ以外は TenancyError をそのまま返す
 */
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, HeaderName, request::Parts};

use crate::error::AppError;
use crate::state::AppState;
use crate::tenancy::OrganizationContext;

use super::AuthCtxExtractor;

pub struct TenantCtx(pub OrganizationContext);

/// テナント選択ヘッダを高々 1 つ取り出す
fn selector<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Result<Option<&'a str>, AppError> {
    let mut values = headers.get_all(name).iter();
    let Some(value) = values.next() else {
        return Ok(None);
    };
    if values.next().is_some() {
        return Err(AppError::bad_request(
            "AMBIGUOUS_ORGANIZATION_HEADER",
            "organization header must be sent at most once",
        ));
    }

    value
        .to_str()
        .map(Some)
        .map_err(|_| AppError::bad_request("INVALID_ORGANIZATION_HEADER", "invalid organization header"))
}

impl FromRequestParts<AppState> for TenantCtx {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthCtxExtractor(auth) = AuthCtxExtractor::from_request_parts(parts, state).await?;

        let requested = selector(&parts.headers, &state.tenant_header)?;

        let ctx = state.tenants.resolve(auth.principal, requested).await?;

        Ok(TenantCtx(ctx))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn name() -> HeaderName {
        HeaderName::from_static("organization")
    }

    #[test]
    fn absent_header_selects_nothing() {
        assert_eq!(selector(&HeaderMap::new(), &name()).unwrap(), None);
    }

    #[test]
    fn single_header_is_passed_through_untrimmed() {
        let mut headers = HeaderMap::new();
        headers.insert(name(), HeaderValue::from_static(" org-1 "));

        assert_eq!(selector(&headers, &name()).unwrap(), Some(" org-1 "));
    }

    #[test]
    fn repeated_header_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.append(name(), HeaderValue::from_static("org-1"));
        headers.append(name(), HeaderValue::from_static("org-1"));

        assert!(matches!(
            selector(&headers, &name()),
            Err(AppError::BadRequest {
                code: "AMBIGUOUS_ORGANIZATION_HEADER",
                ..
            })
        ));
    }

    #[test]
    fn non_utf8_header_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(name(), HeaderValue::from_bytes(b"org-\xff").unwrap());

        assert!(matches!(
            selector(&headers, &name()),
            Err(AppError::BadRequest {
                code: "INVALID_ORGANIZATION_HEADER",
                ..
            })
        ));
    }
}
