use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::recipe::RecipeShort;

/// 예약된 사용자 이름 (`/api/users/me` 경로와 겹칩니다)
pub const RESERVED_USERNAME: &str = "me";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// 요청한 사용자가 이 사용자를 구독 중인지 여부
    pub is_subscribed: bool,
}

impl UserResponse {
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

/// 구독 목록/구독 응답에서 쓰는 사용자 표현 (작성자의 레시피 미리보기 포함)
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<RecipeShort>,
    pub recipes_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.email.contains('@') || self.email.len() > 254 {
            return Err(AppError::BadRequest("Invalid email address".to_string()));
        }
        let username = self.username.trim();
        if username.is_empty() || username.chars().count() > 150 {
            return Err(AppError::BadRequest(
                "Username must be between 1 and 150 characters".to_string(),
            ));
        }
        if username == RESERVED_USERNAME {
            return Err(AppError::BadRequest(format!(
                "Username cannot be \"{}\"",
                RESERVED_USERNAME
            )));
        }
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(AppError::BadRequest(
                "First and last name are required".to_string(),
            ));
        }
        if self.first_name.chars().count() > 150 || self.last_name.chars().count() > 150 {
            return Err(AppError::BadRequest(
                "Names must be at most 150 characters".to_string(),
            ));
        }
        if self.password.len() < 8 {
            return Err(AppError::BadRequest(
                "Password must be at least 8 characters".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

/// `GET /api/users/subscriptions`, `POST /api/users/{id}/subscribe`의 쿼리 파라미터
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SubscriptionsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// 작성자별 레시피 미리보기의 최대 개수 (없으면 전부)
    pub recipes_limit: Option<i64>,
}

impl SubscriptionsQuery {
    pub fn page_params(&self) -> crate::models::PageParams {
        crate::models::PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: "cook@example.com".to_string(),
            username: username.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn accepts_valid_registration() {
        assert!(request("ada", "correct horse").validate().is_ok());
    }

    #[test]
    fn rejects_reserved_username() {
        assert!(matches!(
            request("me", "correct horse").validate(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn rejects_short_password() {
        assert!(request("ada", "short").validate().is_err());
    }
}
