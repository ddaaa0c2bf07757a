use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::api::ApiError;

/// Role attached to every user. Anything unrecognized in storage is treated
/// as a plain user so authorization fails closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s == "admin" { Self::Admin } else { Self::User }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// The authenticated identity behind a request, regardless of whether it
/// came in through a bearer token (API) or a session cookie (UI). Domain
/// handlers only ever see this.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub user_id: i32,
    pub role: Role,
}

impl Principal {
    #[must_use]
    pub const fn is_privileged(&self) -> bool {
        self.role.is_admin()
    }

    pub const fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_privileged() {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

/// Bearer token claims. The role is embedded at issuance and trusted as-is
/// on every request; a role change in storage only takes effect on the next
/// login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i32,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    #[must_use]
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.sub,
            role: Role::parse(&self.role),
        }
    }
}

pub fn issue_token(secret: &str, user_id: i32, role: Role, ttl_minutes: i64) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        role: role.as_str().to_string(),
        iat: now.timestamp(),
        exp: (now + chrono::Duration::minutes(ttl_minutes)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to sign access token")
}

pub fn validate_token(secret: &str, token: &str) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Invalid access token")?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_fails_closed() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("user"), Role::User);
        assert_eq!(Role::parse("superuser"), Role::User);
        assert_eq!(Role::parse(""), Role::User);
    }

    #[test]
    fn test_token_round_trip() {
        let token = issue_token("secret", 7, Role::Admin, 60).unwrap();
        let claims = validate_token("secret", &token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, "admin");
        assert!(claims.principal().is_privileged());
    }

    #[test]
    fn test_token_rejects_wrong_secret() {
        let token = issue_token("secret", 7, Role::User, 60).unwrap();
        assert!(validate_token("other-secret", &token).is_err());
    }

    #[test]
    fn test_token_rejects_garbage() {
        assert!(validate_token("secret", "not-a-token").is_err());
    }
}
