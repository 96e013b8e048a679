use crate::config::API_BASE;
use crate::storage::BrowserStorage;
use gloo_net::http::{Request, RequestBuilder};
use restaurant_client::models::{
    DailyMenu, ErrorResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
    Restaurant, UpdateUserRequest, User, WeeklyMenu,
};
use restaurant_client::session;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    /// Server message, or `Error <status>` when it sent none.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Failed to serialize request: {0}")]
    Encode(String),
}

impl ApiError {
    pub fn from_status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            message: ErrorResponse::message_for(status, body),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            base_url: API_BASE.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        body: Option<&impl Serialize>,
    ) -> Result<T, ApiError> {
        let builder = builder.header("Content-Type", "application/json");

        // Токен читается из localStorage на каждый запрос
        let builder = match session::load_token(&BrowserStorage) {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        };

        let request = match body {
            Some(body) => {
                let body_json =
                    serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
                builder.body(body_json)
            }
            None => builder.build(),
        }
        .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if (200..300).contains(&status) {
            serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
        } else {
            Err(ApiError::from_status(status, &text))
        }
    }

    pub async fn get_restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
        self.request(Request::get(&self.url("/restaurants")), None::<&()>)
            .await
    }

    pub async fn get_daily_menu(&self, id: &str, lang: &str) -> Result<DailyMenu, ApiError> {
        let url = self.url(&format!("/restaurants/daily/{}/{}", id, lang));
        self.request(Request::get(&url), None::<&()>).await
    }

    pub async fn get_weekly_menu(&self, id: &str, lang: &str) -> Result<WeeklyMenu, ApiError> {
        let url = self.url(&format!("/restaurants/weekly/{}/{}", id, lang));
        self.request(Request::get(&url), None::<&()>).await
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.request(Request::post(&self.url("/users")), Some(req))
            .await
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.request(Request::post(&self.url("/auth/login")), Some(req))
            .await
    }

    pub async fn update_user(&self, req: &UpdateUserRequest) -> Result<User, ApiError> {
        self.request(Request::put(&self.url("/users")), Some(req))
            .await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_carries_server_message() {
        let err = ApiError::from_status(401, r#"{"message":"Incorrect username/password"}"#);
        assert_eq!(err.to_string(), "Incorrect username/password");
    }

    #[test]
    fn status_error_without_message_names_the_status() {
        let err = ApiError::from_status(500, "Internal Server Error");
        assert_eq!(err.to_string(), "Error 500");
    }

    #[test]
    fn paths_join_the_base_url() {
        let api = ApiClient {
            base_url: "https://api.test/v1/".into(),
        };
        assert_eq!(
            api.url("/restaurants/daily/abc/fi"),
            "https://api.test/v1/restaurants/daily/abc/fi"
        );
    }
}
