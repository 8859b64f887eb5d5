use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::password::{hash_password, verify_password};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub username: String,
    pub role: String,
    pub exp: i64,    // expiration time
    pub iat: i64,    // issued at
    pub jti: String, // JWT ID
}

impl Claims {
    pub fn new(user_id: String, username: String, role: String, expiration_hours: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours as i64);

        Self {
            sub: user_id,
            username,
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// A freshly issued refresh token. Only `token_hash` is persisted; the
/// plaintext `secret` is handed to the client once via [`RefreshToken::encoded`].
#[derive(Debug)]
pub struct RefreshToken {
    pub id: String,
    pub user_id: String,
    pub secret: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

impl RefreshToken {
    pub fn encoded(&self) -> String {
        format!("{}:{}", self.id, self.secret)
    }
}

pub fn create_access_token(
    user_id: String,
    username: String,
    role: String,
    secret: &str,
    expiration_hours: u64,
) -> anyhow::Result<(String, Claims)> {
    let claims = Claims::new(user_id, username, role, expiration_hours);
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;

    Ok((token, claims))
}

pub fn verify_access_token(token: &str, secret: &str) -> anyhow::Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

pub fn create_refresh_token(user_id: String, expiration_days: u64) -> anyhow::Result<RefreshToken> {
    let secret = Uuid::new_v4().simple().to_string();
    let token_hash = hash_password(&secret)?;

    Ok(RefreshToken {
        id: Uuid::new_v4().to_string(),
        user_id,
        secret,
        token_hash,
        expires_at: Utc::now() + Duration::days(expiration_days as i64),
    })
}

/// Splits an encoded refresh token into `(id, secret)`.
pub fn decode_refresh_token(raw: &str) -> anyhow::Result<(String, String)> {
    let (id, secret) = raw
        .trim()
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("Malformed refresh token"))?;
    if id.is_empty() || secret.is_empty() {
        anyhow::bail!("Malformed refresh token");
    }
    Ok((id.to_string(), secret.to_string()))
}

pub fn verify_refresh_token(secret: &str, hash: &str) -> anyhow::Result<bool> {
    verify_password(secret, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_roundtrip_keeps_role() {
        let (token, issued) = create_access_token(
            "user-123".into(),
            "dispatch@example.com".into(),
            "dispatcher".into(),
            "secret",
            1,
        )
        .expect("create token");
        let claims = verify_access_token(&token, "secret").expect("verify token");
        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.role, "dispatcher");
        assert_eq!(claims.jti, issued.jti);
    }

    #[test]
    fn access_token_rejects_wrong_secret() {
        let (token, _) =
            create_access_token("u".into(), "u".into(), "manager".into(), "secret", 1).unwrap();
        assert!(verify_access_token(&token, "other").is_err());
    }

    #[test]
    fn refresh_token_encoding_roundtrip() {
        let token = create_refresh_token("user-1".into(), 7).expect("refresh token");
        let (id, secret) = decode_refresh_token(&token.encoded()).expect("decode");
        assert_eq!(id, token.id);
        assert!(verify_refresh_token(&secret, &token.token_hash).unwrap());
        assert!(!verify_refresh_token("nope", &token.token_hash).unwrap());
    }

    #[test]
    fn decode_refresh_token_rejects_malformed_values() {
        assert!(decode_refresh_token("no-separator").is_err());
        assert!(decode_refresh_token(":secret").is_err());
        assert!(decode_refresh_token("id:").is_err());
    }
}
