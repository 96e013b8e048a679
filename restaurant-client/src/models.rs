use serde::{Deserialize, Serialize};

/// Public Metropolia restaurant API.
pub const DEFAULT_API_URL: &str = "https://media1.edu.metropolia.fi/restaurant/api/v1";

/// Menu language used when the caller does not pick one.
pub const DEFAULT_LANG: &str = "fi";

const REGISTER_EMAIL_DOMAIN: &str = "student.metropolia.fi";
const FALLBACK_EMAIL_DOMAIN: &str = "metropolia.fi";
const FALLBACK_USER_ID: &str = "1";

// ==================== Рестораны ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    #[serde(rename = "_id")]
    pub id: String,
    pub company_id: i64,
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    #[serde(default)]
    pub phone: String,
    pub location: Location,
    pub company: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`, GeoJSON order.
    pub coordinates: [f64; 2],
}

// ==================== Меню ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub diets: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyMenu {
    #[serde(default)]
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuDay {
    pub date: String,
    #[serde(default)]
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMenu {
    #[serde(default)]
    pub days: Vec<MenuDay>,
}

impl WeeklyMenu {
    /// A week whose days all lack courses reads the same as an empty week.
    pub fn has_courses(&self) -> bool {
        self.days.iter().any(|day| !day.courses.is_empty())
    }
}

// ==================== Пользователи ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favourite_restaurant: Option<String>,
}

impl User {
    /// Stand-in user for a login response that carries no user object.
    pub fn fallback(username: &str) -> Self {
        Self {
            id: FALLBACK_USER_ID.to_string(),
            username: username.to_string(),
            email: format!("{}@{}", username, FALLBACK_EMAIL_DOMAIN),
            avatar: None,
            favourite_restaurant: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LoginResponse {
    /// The user to cache for this login, falling back to one built from the
    /// submitted username.
    pub fn user_or_fallback(&self, username: &str) -> User {
        self.user
            .clone()
            .unwrap_or_else(|| User::fallback(username))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl RegisterRequest {
    /// Registration always uses the student mail domain.
    pub fn for_student(username: impl Into<String>, password: impl Into<String>) -> Self {
        let username = username.into();
        let email = registration_email(&username);
        Self {
            username,
            password: password.into(),
            email,
        }
    }
}

pub fn registration_email(username: &str) -> String {
    format!("{}@{}", username, REGISTER_EMAIL_DOMAIN)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

// ==================== Ошибки ====================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Message for a non-success response: the server's `message` field when
    /// the body carries one, `Error <status>` otherwise.
    pub fn message_for(status: u16, body: &str) -> String {
        serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|err| err.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| format!("Error {}", status))
    }
}
