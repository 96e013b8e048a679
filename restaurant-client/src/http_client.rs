use crate::error::RestaurantClientError;
use crate::models::{
    DailyMenu, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, Restaurant,
    UpdateUserRequest, User, WeeklyMenu,
};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn get_token(&self) -> Option<&String> {
        self.token.as_ref()
    }

    fn add_auth_header(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, RestaurantClientError> {
        let mut request = self.add_auth_header(request).build()?;
        // Replaces the header `json()` sets, so bodies carry it once
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let response = self.client.execute(request).await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            let err = RestaurantClientError::from_status(status.as_u16(), &body);
            tracing::debug!("Request failed with {}: {}", status, err);
            Err(err)
        }
    }

    pub async fn get_restaurants(&self) -> Result<Vec<Restaurant>, RestaurantClientError> {
        let url = self.url("/restaurants");
        tracing::debug!("GET {}", url);
        self.send(self.client.get(&url)).await
    }

    pub async fn get_daily_menu(
        &self,
        id: &str,
        lang: &str,
    ) -> Result<DailyMenu, RestaurantClientError> {
        let url = self.url(&format!("/restaurants/daily/{}/{}", id, lang));
        tracing::debug!("GET {}", url);
        self.send(self.client.get(&url)).await
    }

    pub async fn get_weekly_menu(
        &self,
        id: &str,
        lang: &str,
    ) -> Result<WeeklyMenu, RestaurantClientError> {
        let url = self.url(&format!("/restaurants/weekly/{}/{}", id, lang));
        tracing::debug!("GET {}", url);
        self.send(self.client.get(&url)).await
    }

    pub async fn register(
        &self,
        req: &RegisterRequest,
    ) -> Result<RegisterResponse, RestaurantClientError> {
        let url = self.url("/users");
        self.send(self.client.post(&url).json(req)).await
    }

    /// Logs in and keeps the returned token for later requests.
    pub async fn login(&mut self, req: &LoginRequest) -> Result<LoginResponse, RestaurantClientError> {
        let url = self.url("/auth/login");
        let response: LoginResponse = self.send(self.client.post(&url).json(req)).await?;
        self.set_token(response.token.clone());
        Ok(response)
    }

    pub async fn update_user(
        &self,
        req: &UpdateUserRequest,
    ) -> Result<User, RestaurantClientError> {
        let url = self.url("/users");
        self.send(self.client.put(&url).json(req)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
        request.headers.get(name).and_then(|value| value.to_str().ok())
    }

    #[rstest]
    #[case::plain("https://api.test/v1", "/restaurants")]
    #[case::trailing_slash("https://api.test/v1/", "/restaurants")]
    #[case::bare_path("https://api.test/v1", "restaurants")]
    fn url_joins_base_and_path_with_one_slash(#[case] base: &str, #[case] path: &str) {
        let client = HttpClient::new(base);
        assert_eq!(client.url(path), "https://api.test/v1/restaurants");
    }

    #[test]
    fn token_can_be_set_and_cleared() {
        let mut client = HttpClient::new("https://api.test/v1");
        assert_eq!(client.get_token(), None);

        client.set_token("abc".into());
        assert_eq!(client.get_token().map(String::as_str), Some("abc"));

        client.clear_token();
        assert_eq!(client.get_token(), None);
    }

    #[tokio::test]
    async fn bearer_token_is_sent_only_once_set() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/restaurants"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let mut client = HttpClient::new(server.uri());
        client.get_restaurants().await.expect("anonymous request");
        client.set_token("tok".into());
        client.get_restaurants().await.expect("authenticated request");

        let requests = server.received_requests().await.expect("recording enabled");
        assert_eq!(requests.len(), 2);
        assert_eq!(header(&requests[0], "authorization"), None);
        assert_eq!(header(&requests[1], "authorization"), Some("Bearer tok"));
        assert_eq!(header(&requests[1], "content-type"), Some("application/json"));
    }

    #[tokio::test]
    async fn error_status_carries_the_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/restaurants/daily/abc/fi"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid token" })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/restaurants/weekly/abc/fi"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri());

        let err = client.get_daily_menu("abc", "fi").await.expect_err("401");
        assert_eq!(err.to_string(), "Invalid token");
        assert!(err.is_unauthorized());

        let err = client.get_weekly_menu("abc", "fi").await.expect_err("500");
        assert_eq!(err.to_string(), "Error 500");
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn login_keeps_the_returned_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({ "username": "u", "password": "p" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t" })))
            .mount(&server)
            .await;

        let mut client = HttpClient::new(server.uri());
        let response = client
            .login(&LoginRequest {
                username: "u".into(),
                password: "p".into(),
            })
            .await
            .expect("login");

        assert_eq!(client.get_token().map(String::as_str), Some("t"));
        let user = response.user_or_fallback("u");
        assert_eq!(user.id, "1");
        assert_eq!(user.email, "u@metropolia.fi");

        let requests = server.received_requests().await.expect("recording enabled");
        assert_eq!(requests[0].headers.get_all("content-type").iter().count(), 1);
    }
}
