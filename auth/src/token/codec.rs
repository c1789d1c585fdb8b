use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::PrincipalKind;
use super::claims::TokenClaims;
use super::errors::TokenError;

/// Signs and verifies bearer tokens (HS256).
///
/// The codec is constructed once at startup with the process signing key and
/// the token lifetime, and is immutable afterwards. Verification accepts
/// HS256 only; a token minted under any other algorithm or key fails.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl_hours: i64,
}

impl TokenCodec {
    /// Create a new codec.
    ///
    /// # Arguments
    /// * `secret` - Signing key; provisioned out-of-band, at least 32 bytes
    /// * `ttl_hours` - Lifetime stamped into every issued token
    pub fn new(secret: &[u8], ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            ttl_hours,
        }
    }

    /// Issue a signed token for a principal.
    ///
    /// # Arguments
    /// * `subject` - Principal identifier (admin id or device UUID as string)
    /// * `user_type` - Kind the identifier belongs to
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue(&self, subject: &str, user_type: PrincipalKind) -> Result<String, TokenError> {
        let claims = TokenClaims::new(subject, user_type, self.ttl_hours);
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a presented token and return its claims.
    ///
    /// Rejects tokens with a bad signature, a different algorithm, a
    /// malformed payload, a missing `exp`, or an `exp` in the past
    /// (no leeway).
    ///
    /// # Errors
    /// * `Expired` - Token expiry has passed
    /// * `Invalid` - Any other validation failure
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let token_data =
            decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    #[test]
    fn test_issue_and_verify() {
        let codec = TokenCodec::new(SECRET, 24);

        let token = codec
            .issue("42", PrincipalKind::Admin)
            .expect("Failed to issue token");
        assert!(!token.is_empty());

        let claims = codec.verify(&token).expect("Failed to verify token");
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_type, PrincipalKind::Admin);
    }

    #[test]
    fn test_verify_device_kind_round_trips() {
        let codec = TokenCodec::new(SECRET, 24);

        let token = codec
            .issue("0f8f1f9e-8a84-4f0e-bb9a-1d07f7a3e1b2", PrincipalKind::Device)
            .expect("Failed to issue token");

        let claims = codec.verify(&token).expect("Failed to verify token");
        assert_eq!(claims.user_type, PrincipalKind::Device);
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let codec = TokenCodec::new(SECRET, 24);

        let result = codec.verify("not.a.token");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let issuer = TokenCodec::new(b"first_secret_key_at_least_32_bytes!", 24);
        let verifier = TokenCodec::new(b"other_secret_key_at_least_32_bytes!", 24);

        let token = issuer
            .issue("42", PrincipalKind::Admin)
            .expect("Failed to issue token");

        let result = verifier.verify(&token);
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_verify_rejects_expired() {
        let codec = TokenCodec::new(SECRET, -1);

        let token = codec
            .issue("42", PrincipalKind::Admin)
            .expect("Failed to issue token");

        let result = codec.verify(&token);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_verify_rejects_tampered_payload() {
        let codec = TokenCodec::new(SECRET, 24);

        let token = codec
            .issue("42", PrincipalKind::Admin)
            .expect("Failed to issue token");

        // Swap the payload segment for a different (unsigned) one
        let mut parts: Vec<&str> = token.split('.').collect();
        let other = codec
            .issue("43", PrincipalKind::Admin)
            .expect("Failed to issue token");
        let other_parts: Vec<&str> = other.split('.').collect();
        parts[1] = other_parts[1];
        let forged = parts.join(".");

        assert!(codec.verify(&forged).is_err());
    }
}
