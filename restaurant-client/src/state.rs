use crate::error::StorageError;
use crate::models::Restaurant;
use crate::storage::{read_json, write_json, KeyValueStore, FAVORITES_KEY};

/// Favorite restaurant ids, in the order they were added, without duplicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Favorites {
    ids: Vec<String>,
}

impl Favorites {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let mut favorites = Self::default();
        for id in read_json::<Vec<String>, S>(store, FAVORITES_KEY).unwrap_or_default() {
            if !favorites.contains(&id) {
                favorites.ids.push(id);
            }
        }
        favorites
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<(), StorageError> {
        write_json(store, FAVORITES_KEY, &self.ids)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|fav| fav == id)
    }

    /// Flips membership of `id`. Returns `true` when it is now a favorite.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.contains(id) {
            self.ids.retain(|fav| fav != id);
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Favorite restaurants in list order.
    pub fn select<'a>(&self, restaurants: &'a [Restaurant]) -> Vec<&'a Restaurant> {
        restaurants
            .iter()
            .filter(|restaurant| self.contains(&restaurant.id))
            .collect()
    }
}

/// Case-insensitive substring match on `city`. An empty term keeps everything.
pub fn filter_by_city<'a>(restaurants: &'a [Restaurant], term: &str) -> Vec<&'a Restaurant> {
    let term = term.to_lowercase();
    restaurants
        .iter()
        .filter(|restaurant| restaurant.city.to_lowercase().contains(&term))
        .collect()
}

/// The two modes of the shared login/register form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }

    /// Mode after a successful submit. Registration never logs in, so it
    /// hands over to the login form.
    pub fn after_success(self) -> Self {
        Self::Login
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Create Account",
        }
    }

    pub fn toggle_prompt(self) -> &'static str {
        match self {
            Self::Login => "No account?",
            Self::Register => "Already have an account?",
        }
    }

    /// Label of the link that switches to the other mode.
    pub fn toggle_link(self) -> &'static str {
        self.toggled().title()
    }
}
