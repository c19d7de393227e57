use std::collections::HashSet;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::RawClaims;
use super::errors::TokenError;

/// Token signing configuration, fixed for the lifetime of the process.
#[derive(Clone)]
pub struct TokenConfig {
    pub secret: Vec<u8>,
    pub ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }
}

/// Issues and verifies signed bearer tokens.
///
/// Tokens are HS256 JWS strings. The verifier only accepts HS256 no matter
/// what the token header claims.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Create a token service from its configuration.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::new(Self::ALGORITHM);
        validation.algorithms = vec![Self::ALGORITHM];
        // Expiry is checked against our own clock in `verify_at`
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::new();

        Self {
            encoding_key: EncodingKey::from_secret(&config.secret),
            decoding_key: DecodingKey::from_secret(&config.secret),
            validation,
            ttl: config.ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for a subject and role, valid for the configured TTL.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject: impl ToString, role_id: i32) -> Result<String, TokenError> {
        self.issue_at(subject, role_id, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject: impl ToString,
        role_id: i32,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims::new(subject, role_id, now, self.ttl);
        self.encode(&claims)
    }

    /// Sign arbitrary claims.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(Self::ALGORITHM);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature mismatch or unexpected algorithm
    /// * `Expired` - Current time is past the expiry
    /// * `MalformedPayload` - Subject, role or timestamps missing or mistyped
    /// * `MalformedToken` - Not a decodable token at all
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        decode_header(token).map_err(|e| TokenError::MalformedToken(e.to_string()))?;

        let token_data = decode::<RawClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                ErrorKind::Json(_) => TokenError::MalformedPayload(e.to_string()),
                _ => TokenError::MalformedToken(e.to_string()),
            })?;

        let claims = Claims::try_from(token_data.claims)?;

        if claims.is_expired(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use serde_json::json;

    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn service() -> TokenService {
        TokenService::new(&TokenConfig::new(SECRET, Duration::hours(1)))
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn sign_raw(payload: serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let service = service();

        let token = service.issue_at("user123", 2, now()).expect("Failed to issue");
        assert_eq!(token.split('.').count(), 3);

        let claims = service.verify_at(&token, now()).expect("Failed to verify");
        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.role_id, 2);
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_issue_with_real_clock() {
        let service = service();

        let token = service.issue("user123", 1).unwrap();
        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, "user123");
    }

    #[test]
    fn test_expired_one_millisecond_after_expiry() {
        let service = service();
        let token = service.issue_at("user123", 1, now()).unwrap();

        let expires_at = now() + Duration::hours(1);
        assert!(service.verify_at(&token, expires_at).is_ok());

        let result = service.verify_at(&token, expires_at + Duration::milliseconds(1));
        assert_eq!(result, Err(TokenError::Expired));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let service = service();
        let token = service.issue_at("user123", 1, now()).unwrap();

        let (head, signature) = token.rsplit_once('.').unwrap();
        let mut bytes = signature.as_bytes().to_vec();
        let middle = bytes.len() / 2;
        bytes[middle] = if bytes[middle] == b'A' { b'B' } else { b'A' };
        let tampered = format!("{}.{}", head, String::from_utf8(bytes).unwrap());

        let result = service.verify_at(&tampered, now());
        assert_eq!(result, Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let service = service();
        let token = service.issue_at("user123", 2, now()).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let forged_payload = URL_SAFE_NO_PAD.encode(
            json!({"sub": "user123", "role_id": 1, "iat": 1_700_000_000, "exp": 1_700_003_600})
                .to_string(),
        );
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_eq!(
            service.verify_at(&forged, now()),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let other = TokenService::new(&TokenConfig::new(
            b"secret2_at_least_32_bytes_long_key!".to_vec(),
            Duration::hours(1),
        ));
        let token = other.issue_at("user123", 1, now()).unwrap();

        assert_eq!(
            service().verify_at(&token, now()),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_algorithm_is_pinned() {
        let token = encode(
            &Header::new(Algorithm::HS512),
            &json!({"sub": "user123", "role_id": 1, "iat": 1_700_000_000, "exp": 1_700_003_600}),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(
            service().verify_at(&token, now()),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_unsigned_token_rejected() {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            json!({"sub": "user123", "role_id": 1, "iat": 1_700_000_000, "exp": 1_700_003_600})
                .to_string(),
        );
        let token = format!("{}.{}.", header, payload);

        assert!(service().verify_at(&token, now()).is_err());
    }

    #[test]
    fn test_missing_role_is_malformed_payload() {
        let token = sign_raw(json!({"sub": "user123", "iat": 1_700_000_000, "exp": 1_700_003_600}));

        assert!(matches!(
            service().verify_at(&token, now()),
            Err(TokenError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_mistyped_role_is_malformed_payload() {
        let token = sign_raw(
            json!({"sub": "user123", "role_id": "admin", "iat": 1_700_000_000, "exp": 1_700_003_600}),
        );

        assert!(matches!(
            service().verify_at(&token, now()),
            Err(TokenError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_garbage_is_malformed_token() {
        assert!(matches!(
            service().verify_at("invalid.token.here", now()),
            Err(TokenError::MalformedToken(_))
        ));
        assert!(service().verify_at("", now()).is_err());
    }
}
