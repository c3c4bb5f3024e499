/*!
 * Authenticated principal extractor
 *
 * Responsibility:
 * - access middleware が組み立てた Principal (AuthCtx) を handler に渡す
 * - axum 依存は core、型は types
 */

mod core;
mod types;

pub use self::core::AuthCtxExtractor;
pub use types::AuthCtx;
