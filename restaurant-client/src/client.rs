use crate::error::RestaurantClientError;
use crate::http_client::HttpClient;
use crate::models::{
    DailyMenu, LoginRequest, RegisterRequest, RegisterResponse, Restaurant,
    UpdateUserRequest, User, WeeklyMenu,
};
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Restaurant API client. Clones share the HTTP client and the token.
#[derive(Debug, Clone)]
pub struct RestaurantClient {
    base_url: String,
    http: Arc<Mutex<HttpClient>>,
}

impl RestaurantClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let http = HttpClient::new(base_url.clone());
        Self {
            base_url,
            http: Arc::new(Mutex::new(http)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the bearer token for authenticated requests
    pub async fn set_token(&self, token: String) {
        self.http.lock().await.set_token(token);
    }

    pub async fn get_token(&self) -> Option<String> {
        self.http.lock().await.get_token().cloned()
    }

    /// Clear the current token (logout)
    pub async fn clear_token(&self) {
        self.http.lock().await.clear_token();
    }

    pub async fn restaurants(&self) -> Result<Vec<Restaurant>, RestaurantClientError> {
        self.http.lock().await.get_restaurants().await
    }

    pub async fn daily_menu(
        &self,
        id: &str,
        lang: &str,
    ) -> Result<DailyMenu, RestaurantClientError> {
        self.http.lock().await.get_daily_menu(id, lang).await
    }

    pub async fn weekly_menu(
        &self,
        id: &str,
        lang: &str,
    ) -> Result<WeeklyMenu, RestaurantClientError> {
        self.http.lock().await.get_weekly_menu(id, lang).await
    }

    /// Register a new account. Does not log in.
    pub async fn register(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<RegisterResponse, RestaurantClientError> {
        let req = RegisterRequest::for_student(username, password);
        tracing::debug!("Register called for username: {}", req.username);
        self.http.lock().await.register(&req).await
    }

    /// Login with username and password. The returned session carries a
    /// fallback user when the server sends none.
    pub async fn login(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Session, RestaurantClientError> {
        let req = LoginRequest {
            username: username.into(),
            password: password.into(),
        };
        tracing::debug!("Login called for username: {}", req.username);

        let response = self.http.lock().await.login(&req).await?;
        let user = response.user_or_fallback(&req.username);
        Ok(Session::new(response.token, user))
    }

    pub async fn update_user(
        &self,
        req: &UpdateUserRequest,
    ) -> Result<User, RestaurantClientError> {
        self.http.lock().await.update_user(req).await
    }
}
