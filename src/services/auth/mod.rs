pub mod access_jwt;
pub mod factory;

pub use access_jwt::{AccessJwtError, AuthService, TokenVerifier, VerifiedAccessToken};
pub use factory::build_token_verifier;
