use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::UserRole,
};

const TOKEN_TTL_HOURS: i64 = 24;

/// Session token claims issued on login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid> {
        self.sub
            .parse()
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
    }
}

/// Single-purpose link tokens mailed to the user. The `type` claim prevents
/// a verification link from confirming an email change and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Verification,
    EmailUpdate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkClaims {
    pub sub: String,
    pub email: String,
    #[serde(rename = "type")]
    pub purpose: TokenPurpose,
    pub exp: usize,
    pub iat: usize,
}

impl LinkClaims {
    pub fn user_id(&self) -> Result<Uuid> {
        self.sub
            .parse()
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
    }
}

fn expiry_window() -> Result<(usize, usize)> {
    let now = chrono::Utc::now();
    let exp = now
        .checked_add_signed(chrono::Duration::hours(TOKEN_TTL_HOURS))
        .ok_or_else(|| AppError::InternalError("Failed to calculate expiration".to_string()))?;

    Ok((now.timestamp() as usize, exp.timestamp() as usize))
}

pub fn generate_token(secret: &str, user_id: Uuid, email: &str, role: UserRole) -> Result<String> {
    let (iat, exp) = expiry_window()?;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        exp,
        iat,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalError(format!("Token generation failed: {}", e)))
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))
}

pub fn generate_link_token(
    secret: &str,
    user_id: Uuid,
    email: &str,
    purpose: TokenPurpose,
) -> Result<String> {
    let (iat, exp) = expiry_window()?;

    let claims = LinkClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        purpose,
        exp,
        iat,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalError(format!("Token generation failed: {}", e)))
}

pub fn verify_link_token(secret: &str, token: &str, expected: TokenPurpose) -> Result<LinkClaims> {
    let claims = decode::<LinkClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    if claims.purpose != expected {
        return Err(AppError::Unauthorized("Invalid token type".to_string()));
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn session_token_round_trips() {
        let user_id = Uuid::new_v4();
        let token = generate_token(SECRET, user_id, "a@b.com", UserRole::Staff).unwrap();

        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.role, UserRole::Staff);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = generate_token("other", Uuid::new_v4(), "a@b.com", UserRole::Customer).unwrap();

        assert!(matches!(
            verify_token(SECRET, &token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "a@b.com".to_string(),
            role: UserRole::Customer,
            exp: (chrono::Utc::now().timestamp() - 3600) as usize,
            iat: (chrono::Utc::now().timestamp() - 7200) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            verify_token(SECRET, &token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn link_token_purpose_is_enforced() {
        let user_id = Uuid::new_v4();
        let token =
            generate_link_token(SECRET, user_id, "a@b.com", TokenPurpose::Verification).unwrap();

        let claims = verify_link_token(SECRET, &token, TokenPurpose::Verification).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);

        assert!(matches!(
            verify_link_token(SECRET, &token, TokenPurpose::EmailUpdate),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn session_token_is_not_a_valid_link_token() {
        let token = generate_token(SECRET, Uuid::new_v4(), "a@b.com", UserRole::Admin).unwrap();

        assert!(verify_link_token(SECRET, &token, TokenPurpose::Verification).is_err());
    }
}
