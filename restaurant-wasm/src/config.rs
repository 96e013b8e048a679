use restaurant_client::models::{DEFAULT_API_URL, DEFAULT_LANG};

pub const API_BASE: &str = match option_env!("RESTAURANT_API_URL") {
    Some(url) => url,
    None => DEFAULT_API_URL,
};

/// Menus in the modal are always fetched in this language.
pub const MENU_LANG: &str = DEFAULT_LANG;

/// Mapbox token, supplied at build time. Without one the map is skipped.
pub const MAPBOX_ACCESS_TOKEN: Option<&str> = option_env!("MAPBOX_ACCESS_TOKEN");

pub const MAP_CONTAINER_ID: &str = "map-container";
pub const MAP_STYLE: &str = "mapbox://styles/mapbox/streets-v11";
/// Helsinki, `[lng, lat]`.
pub const MAP_CENTER: [f64; 2] = [24.93, 60.17];
pub const MAP_ZOOM: f64 = 12.0;
