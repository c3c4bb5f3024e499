/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth::access (Identity Resolver) / cors / http / security_headers
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
