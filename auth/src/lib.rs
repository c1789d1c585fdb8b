//! Authentication infrastructure for the dashboard backend.
//!
//! Provides the two security primitives every service-side auth decision
//! rests on:
//! - Password hashing (Argon2id)
//! - Signed bearer tokens carrying a principal identity and kind
//!
//! The service defines its own principal model and storage; this crate only
//! knows how to hash secrets and how to mint/verify tokens. The signing key
//! is always passed in explicitly; there is no ambient or default secret.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &digest));
//! assert!(!hasher.verify("not_my_password", &digest));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{PrincipalKind, TokenCodec};
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!", 24);
//! let token = codec.issue("42", PrincipalKind::Admin).unwrap();
//! let claims = codec.verify(&token).unwrap();
//! assert_eq!(claims.sub, "42");
//! assert_eq!(claims.user_type, PrincipalKind::Admin);
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::PrincipalKind;
pub use token::TokenClaims;
pub use token::TokenCodec;
pub use token::TokenError;
