//! Mapbox GL JS bindings, limited to what the restaurant map uses.
//! The page must load `mapbox-gl.js`, which defines the `mapboxgl` global.

use crate::config::{MAP_CENTER, MAP_CONTAINER_ID, MAP_STYLE, MAP_ZOOM};
use restaurant_client::models::Restaurant;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl)]
    type Map;

    #[wasm_bindgen(constructor, catch, js_namespace = mapboxgl)]
    fn new(options: &JsValue) -> Result<Map, JsValue>;

    #[wasm_bindgen(method)]
    fn resize(this: &Map);
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl)]
    type Marker;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl)]
    fn new() -> Marker;

    #[wasm_bindgen(method, js_name = setLngLat)]
    fn set_lng_lat(this: &Marker, lng_lat: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = setPopup)]
    fn set_popup(this: &Marker, popup: &Popup) -> Marker;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Marker, map: &Map) -> Marker;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl)]
    type Popup;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl)]
    fn new() -> Popup;

    #[wasm_bindgen(method, js_name = setHTML)]
    fn set_html(this: &Popup, html: &str) -> Popup;
}

#[derive(Serialize)]
struct MapOptions<'a> {
    container: &'a str,
    style: &'a str,
    center: [f64; 2],
    zoom: f64,
}

/// The page's single map instance with one marker per restaurant.
pub struct RestaurantMap {
    map: Map,
    _markers: Vec<Marker>,
}

impl RestaurantMap {
    pub fn init(restaurants: &[Restaurant], access_token: &str) -> Result<Self, JsValue> {
        set_access_token(access_token)?;

        let options = serde_wasm_bindgen::to_value(&MapOptions {
            container: MAP_CONTAINER_ID,
            style: MAP_STYLE,
            center: MAP_CENTER,
            zoom: MAP_ZOOM,
        })?;
        let map = Map::new(&options)?;

        let mut markers = Vec::with_capacity(restaurants.len());
        for restaurant in restaurants {
            let lng_lat = serde_wasm_bindgen::to_value(&restaurant.location.coordinates)?;
            let popup = Popup::new().set_html(&popup_html(restaurant));
            let marker = Marker::new()
                .set_lng_lat(&lng_lat)
                .set_popup(&popup)
                .add_to(&map);
            markers.push(marker);
        }

        log::info!("Map initialized with {} markers", markers.len());

        Ok(Self {
            map,
            _markers: markers,
        })
    }

    /// Needed after the container was hidden.
    pub fn resize(&self) {
        self.map.resize();
    }
}

fn set_access_token(token: &str) -> Result<(), JsValue> {
    let mapboxgl = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("mapboxgl"))?;
    if mapboxgl.is_undefined() {
        return Err(JsValue::from_str("mapboxgl is not loaded"));
    }
    js_sys::Reflect::set(
        &mapboxgl,
        &JsValue::from_str("accessToken"),
        &JsValue::from_str(token),
    )?;
    Ok(())
}

fn popup_html(restaurant: &Restaurant) -> String {
    format!(
        "<h3>{}</h3><p>{}</p>",
        escape_html(&restaurant.name),
        escape_html(&restaurant.address)
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use restaurant_client::models::Location;

    #[test]
    fn popup_shows_name_and_address() {
        let restaurant = Restaurant {
            id: "a".into(),
            company_id: 1,
            name: "Fazer & Co <Kampus>".into(),
            address: "Leiritie 1".into(),
            postal_code: "01600".into(),
            city: "Vantaa".into(),
            phone: String::new(),
            location: Location {
                kind: "Point".into(),
                coordinates: [24.84, 60.26],
            },
            company: "Compass Group".into(),
        };

        assert_eq!(
            popup_html(&restaurant),
            "<h3>Fazer &amp; Co &lt;Kampus&gt;</h3><p>Leiritie 1</p>"
        );
    }
}
