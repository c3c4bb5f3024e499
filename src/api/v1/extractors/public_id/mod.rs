/**
 * Responsibility
 *  - 公開 ID extractor (core) と、リソースごとの ID 型 (types) をまとめて公開する
 */
mod core;
mod types;

pub use self::core::PublicId;
pub use types::*;
