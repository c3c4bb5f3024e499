/*
 * Responsibility
 * - handler / middleware から使う横断的な service
 */
pub mod auth;
pub mod id_codec;
