use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::TokenError;

/// Verified token payload.
///
/// Only ever produced by issuing a token or by a successful verification,
/// so every field is guaranteed to be present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Role identifier of the subject at issuance time
    pub role_id: i32,

    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,

    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
}

impl Claims {
    /// Build claims for a subject, valid for `ttl` from `now`.
    pub fn new(subject: impl ToString, role_id: i32, now: DateTime<Utc>, ttl: Duration) -> Self {
        let expiration = now + ttl;

        Self {
            sub: subject.to_string(),
            role_id,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Check if the token is expired at `now`, with millisecond precision.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() > self.exp.saturating_mul(1000)
    }
}

/// Payload as it appears on the wire, before shape validation.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    role_id: Option<i32>,
    #[serde(default)]
    iat: Option<i64>,
    #[serde(default)]
    exp: Option<i64>,
}

impl TryFrom<RawClaims> for Claims {
    type Error = TokenError;

    fn try_from(raw: RawClaims) -> Result<Self, Self::Error> {
        let sub = raw
            .sub
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| TokenError::MalformedPayload("missing subject".to_string()))?;
        let role_id = raw
            .role_id
            .ok_or_else(|| TokenError::MalformedPayload("missing role_id".to_string()))?;
        let iat = raw
            .iat
            .ok_or_else(|| TokenError::MalformedPayload("missing iat".to_string()))?;
        let exp = raw
            .exp
            .ok_or_else(|| TokenError::MalformedPayload("missing exp".to_string()))?;

        if exp <= iat {
            return Err(TokenError::MalformedPayload(
                "exp is not after iat".to_string(),
            ));
        }

        Ok(Self {
            sub,
            role_id,
            iat,
            exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(sub: Option<&str>, role_id: Option<i32>, iat: Option<i64>, exp: Option<i64>) -> RawClaims {
        RawClaims {
            sub: sub.map(str::to_string),
            role_id,
            iat,
            exp,
        }
    }

    #[test]
    fn test_new_claims() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = Claims::new("user123", 2, now, Duration::hours(1));

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.role_id, 2);
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp - claims.iat, 60 * 60);
        assert_eq!(claims.issued_at(), Some(now));
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims {
            sub: "user123".to_string(),
            role_id: 1,
            iat: 900,
            exp: 1000,
        };
        let at_millis = |ms: i64| DateTime::from_timestamp_millis(ms).unwrap();

        assert!(!claims.is_expired(at_millis(999_999))); // Not expired
        assert!(!claims.is_expired(at_millis(1_000_000))); // Exactly at expiration
        assert!(claims.is_expired(at_millis(1_000_001))); // One millisecond later
    }

    #[test]
    fn test_complete_payload_converts() {
        let claims = Claims::try_from(raw(Some("abc"), Some(1), Some(10), Some(20))).unwrap();
        assert_eq!(claims.sub, "abc");
        assert_eq!(claims.role_id, 1);
    }

    #[test]
    fn test_missing_subject_is_malformed() {
        let result = Claims::try_from(raw(None, Some(1), Some(10), Some(20)));
        assert!(matches!(result, Err(TokenError::MalformedPayload(_))));

        let result = Claims::try_from(raw(Some("  "), Some(1), Some(10), Some(20)));
        assert!(matches!(result, Err(TokenError::MalformedPayload(_))));
    }

    #[test]
    fn test_missing_role_is_malformed() {
        let result = Claims::try_from(raw(Some("abc"), None, Some(10), Some(20)));
        assert!(matches!(result, Err(TokenError::MalformedPayload(_))));
    }

    #[test]
    fn test_inverted_timestamps_are_malformed() {
        let result = Claims::try_from(raw(Some("abc"), Some(1), Some(20), Some(20)));
        assert!(matches!(result, Err(TokenError::MalformedPayload(_))));
    }
}
