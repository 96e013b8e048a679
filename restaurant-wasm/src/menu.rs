use crate::api::ApiError;
use restaurant_client::models::{Course, DailyMenu, MenuDay, Restaurant, WeeklyMenu};

pub const NO_MENU_TODAY: &str = "No menu available for today.";
pub const NO_MENU_THIS_WEEK: &str = "No menu available for this week.";
pub const NO_COURSES: &str = "No courses found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTab {
    Today,
    Week,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuContent {
    Loading,
    Daily(Vec<Course>),
    Weekly(Vec<MenuDay>),
    Unavailable(&'static str),
}

impl MenuContent {
    pub fn from_daily(result: Result<DailyMenu, ApiError>) -> Self {
        match result {
            Ok(menu) if menu.courses.is_empty() => Self::Unavailable(NO_COURSES),
            Ok(menu) => Self::Daily(menu.courses),
            Err(e) => {
                log::warn!("Daily menu failed: {}", e);
                Self::Unavailable(NO_MENU_TODAY)
            }
        }
    }

    pub fn from_weekly(result: Result<WeeklyMenu, ApiError>) -> Self {
        match result {
            Ok(menu) if !menu.has_courses() => {
                Self::Unavailable(NO_COURSES)
            }
            Ok(menu) => Self::Weekly(menu.days),
            Err(e) => {
                log::warn!("Weekly menu failed: {}", e);
                Self::Unavailable(NO_MENU_THIS_WEEK)
            }
        }
    }
}

/// The open menu modal. It stays open whatever the fetch outcome; only the
/// close button removes it.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuModal {
    pub restaurant: Restaurant,
    pub tab: MenuTab,
    pub content: MenuContent,
}

impl MenuModal {
    pub fn open(restaurant: Restaurant) -> Self {
        Self {
            restaurant,
            tab: MenuTab::Today,
            content: MenuContent::Loading,
        }
    }

    /// Returns `true` when a new fetch is needed.
    pub fn switch_tab(&mut self, tab: MenuTab) -> bool {
        if self.tab == tab {
            return false;
        }
        self.tab = tab;
        self.content = MenuContent::Loading;
        true
    }

    /// Applies a daily menu result unless the modal has since moved on to
    /// another restaurant or tab. Returns whether it was applied.
    pub fn apply_daily(&mut self, restaurant_id: &str, result: Result<DailyMenu, ApiError>) -> bool {
        if !self.awaits(restaurant_id, MenuTab::Today) {
            return false;
        }
        self.content = MenuContent::from_daily(result);
        true
    }

    pub fn apply_weekly(
        &mut self,
        restaurant_id: &str,
        result: Result<WeeklyMenu, ApiError>,
    ) -> bool {
        if !self.awaits(restaurant_id, MenuTab::Week) {
            return false;
        }
        self.content = MenuContent::from_weekly(result);
        true
    }

    fn awaits(&self, restaurant_id: &str, tab: MenuTab) -> bool {
        self.restaurant.id == restaurant_id && self.tab == tab
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restaurant_client::models::Location;

    fn restaurant(id: &str) -> Restaurant {
        Restaurant {
            id: id.to_string(),
            company_id: 16,
            name: format!("Ravintola {}", id),
            address: "Karaportti 2".into(),
            postal_code: "02610".into(),
            city: "Espoo".into(),
            phone: String::new(),
            location: Location {
                kind: "Point".into(),
                coordinates: [24.76, 60.22],
            },
            company: "Sodexo".into(),
        }
    }

    fn course(name: &str) -> Course {
        Course {
            name: name.to_string(),
            price: Some("2,95 €".into()),
            diets: Some("L, G".into()),
        }
    }

    #[test]
    fn opening_shows_loading_for_today() {
        let modal = MenuModal::open(restaurant("a"));
        assert_eq!(modal.tab, MenuTab::Today);
        assert_eq!(modal.content, MenuContent::Loading);
    }

    #[test]
    fn failed_fetch_shows_fallback_text() {
        let mut modal = MenuModal::open(restaurant("a"));
        let applied = modal.apply_daily("a", Err(ApiError::Network("Failed to fetch".into())));

        assert!(applied);
        assert_eq!(modal.content, MenuContent::Unavailable(NO_MENU_TODAY));
        assert_eq!(modal.restaurant.id, "a");
    }

    #[test]
    fn empty_menu_shows_no_courses() {
        let mut modal = MenuModal::open(restaurant("a"));
        modal.apply_daily("a", Ok(DailyMenu::default()));
        assert_eq!(modal.content, MenuContent::Unavailable(NO_COURSES));
    }

    #[test]
    fn courses_are_kept_in_order() {
        let mut modal = MenuModal::open(restaurant("a"));
        let menu = DailyMenu {
            courses: vec![course("Lohikeitto"), course("Kasvispihvi")],
        };
        modal.apply_daily("a", Ok(menu.clone()));
        assert_eq!(modal.content, MenuContent::Daily(menu.courses));
    }

    #[test]
    fn response_for_previous_restaurant_is_dropped() {
        // "b" was opened while the request for "a" was still in flight.
        let mut modal = MenuModal::open(restaurant("b"));

        let applied = modal.apply_daily(
            "a",
            Ok(DailyMenu {
                courses: vec![course("Lohikeitto")],
            }),
        );

        assert!(!applied);
        assert_eq!(modal.content, MenuContent::Loading);
    }

    #[test]
    fn weekly_result_is_ignored_after_switching_back_to_today() {
        let mut modal = MenuModal::open(restaurant("a"));
        assert!(modal.switch_tab(MenuTab::Week));
        assert!(modal.switch_tab(MenuTab::Today));

        let applied = modal.apply_weekly("a", Ok(WeeklyMenu::default()));
        assert!(!applied);
    }

    #[test]
    fn switching_to_the_same_tab_needs_no_fetch() {
        let mut modal = MenuModal::open(restaurant("a"));
        assert!(!modal.switch_tab(MenuTab::Today));
    }

    #[test]
    fn weekly_failure_has_its_own_fallback() {
        let mut modal = MenuModal::open(restaurant("a"));
        modal.switch_tab(MenuTab::Week);
        modal.apply_weekly(
            "a",
            Err(ApiError::from_status(404, r#"{"message":"Menu not found"}"#)),
        );
        assert_eq!(modal.content, MenuContent::Unavailable(NO_MENU_THIS_WEEK));
    }

    #[test]
    fn weekly_days_are_rendered_when_any_has_courses() {
        let mut modal = MenuModal::open(restaurant("a"));
        modal.switch_tab(MenuTab::Week);
        let days = vec![
            MenuDay {
                date: "Monday 14 October".into(),
                courses: vec![course("Lohikeitto")],
            },
            MenuDay {
                date: "Tuesday 15 October".into(),
                courses: vec![],
            },
        ];
        modal.apply_weekly("a", Ok(WeeklyMenu { days: days.clone() }));
        assert_eq!(modal.content, MenuContent::Weekly(days));
    }
}
