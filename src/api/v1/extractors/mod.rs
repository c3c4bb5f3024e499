/*
 * Responsibility
 * - handler が受け取る型 (認証済み主体 / テナントコンテキスト / 公開 ID / body・query) の extractor
 */
pub mod auth_ctx;
pub mod body;
pub mod public_id;
pub mod tenant_ctx;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use body::{AppJson, AppQuery};
pub use tenant_ctx::TenantCtx;
