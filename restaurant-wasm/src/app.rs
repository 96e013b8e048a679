use crate::api::{ApiClient, ApiError};
use crate::config::{MAPBOX_ACCESS_TOKEN, MAP_CONTAINER_ID, MENU_LANG};
use crate::map::RestaurantMap;
use crate::menu::{MenuContent, MenuModal, MenuTab, NO_COURSES};
use crate::storage::BrowserStorage;
use gloo_file::callbacks::FileReader;
use restaurant_client::models::{
    Course, DailyMenu, LoginRequest, LoginResponse, MenuDay, RegisterRequest, Restaurant,
    UpdateUserRequest, User, WeeklyMenu,
};
use restaurant_client::session::{self, Session};
use restaurant_client::state::{filter_by_city, AuthMode, Favorites};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub enum Msg {
    // Restaurant messages
    RestaurantsLoaded(Vec<Restaurant>),
    RestaurantsFailed(ApiError),
    ToggleFavorite(String),
    UpdateCityFilter(String),
    ResetFilter,

    // Menu messages
    OpenMenu(Restaurant),
    SwitchMenuTab(MenuTab),
    DailyMenuLoaded(String, Result<DailyMenu, ApiError>),
    WeeklyMenuLoaded(String, Result<WeeklyMenu, ApiError>),
    CloseModals,

    // Navigation
    ShowHome,
    ShowProfile,
    OpenLogin,
    Logout,

    // Auth messages
    ToggleAuthMode,
    UpdateUsername(String),
    UpdatePassword(String),
    SubmitAuth,
    LoggedIn(String, LoginResponse),
    Registered,
    AuthFailed(ApiError),

    // Profile messages
    UpdateProfileEmail(String),
    SaveProfile,
    ProfileSaved(User),
    ProfileFailed(ApiError),
    ChooseAvatar,
    AvatarSelected(web_sys::File),
    AvatarLoaded(Result<String, String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Home,
    Profile,
}

pub struct App {
    // Restaurants
    restaurants: Vec<Restaurant>,
    favorites: Favorites,
    city_filter: String,

    // Auth state
    user: Option<User>,
    avatar: Option<String>,
    auth_mode: AuthMode,
    login_open: bool,

    // Forms
    username: String,
    password: String,
    profile_email: String,

    // UI state
    section: Section,
    menu: Option<MenuModal>,
    avatar_input: NodeRef,
    avatar_reader: Option<FileReader>,

    // Map
    map: Option<RestaurantMap>,
    map_pending: bool,
    resize_map: bool,

    // API client
    api: ApiClient,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let mut app = Self {
            restaurants: Vec::new(),
            favorites: Favorites::load(&BrowserStorage),
            city_filter: String::new(),
            user: None,
            avatar: None,
            auth_mode: AuthMode::Login,
            login_open: false,
            username: String::new(),
            password: String::new(),
            profile_email: String::new(),
            section: Section::Home,
            menu: None,
            avatar_input: NodeRef::default(),
            avatar_reader: None,
            map: None,
            map_pending: false,
            resize_map: false,
            api: ApiClient::new(),
        };
        app.check_auth();

        let api = app.api.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            match api.get_restaurants().await {
                Ok(restaurants) => link.send_message(Msg::RestaurantsLoaded(restaurants)),
                Err(e) => link.send_message(Msg::RestaurantsFailed(e)),
            }
        });

        app
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::RestaurantsLoaded(restaurants) => {
                log::info!("Loaded {} restaurants", restaurants.len());
                self.restaurants = restaurants;
                self.map_pending = true;
                true
            }

            Msg::RestaurantsFailed(e) => {
                log::error!("Failed to initialize app: {}", e);
                false
            }

            Msg::ToggleFavorite(id) => {
                self.favorites.toggle(&id);
                if let Err(e) = self.favorites.save(&BrowserStorage) {
                    log::error!("Failed to save favorites: {}", e);
                }
                true
            }

            Msg::UpdateCityFilter(term) => {
                self.city_filter = term;
                true
            }

            Msg::ResetFilter => {
                self.city_filter.clear();
                true
            }

            // Меню
            Msg::OpenMenu(restaurant) => {
                let id = restaurant.id.clone();
                self.menu = Some(MenuModal::open(restaurant));
                self.fetch_menu(ctx, id, MenuTab::Today);
                true
            }

            Msg::SwitchMenuTab(tab) => {
                let Some(menu) = self.menu.as_mut() else {
                    return false;
                };
                if !menu.switch_tab(tab) {
                    return false;
                }
                let id = menu.restaurant.id.clone();
                self.fetch_menu(ctx, id, tab);
                true
            }

            Msg::DailyMenuLoaded(id, result) => self
                .menu
                .as_mut()
                .is_some_and(|menu| menu.apply_daily(&id, result)),

            Msg::WeeklyMenuLoaded(id, result) => self
                .menu
                .as_mut()
                .is_some_and(|menu| menu.apply_weekly(&id, result)),

            Msg::CloseModals => {
                self.login_open = false;
                self.menu = None;
                true
            }

            // Навигация
            Msg::ShowHome => {
                self.section = Section::Home;
                self.resize_map = true;
                true
            }

            Msg::ShowProfile => {
                self.section = Section::Profile;
                self.check_auth();
                true
            }

            Msg::OpenLogin => {
                self.login_open = true;
                true
            }

            Msg::Logout => {
                if let Err(e) = session::clear(&BrowserStorage) {
                    log::error!("Failed to clear session: {}", e);
                }
                self.check_auth();
                self.section = Section::Home;
                self.resize_map = true;
                alert("You have logged out.");
                true
            }

            // Авторизация
            Msg::ToggleAuthMode => {
                self.auth_mode = self.auth_mode.toggled();
                true
            }

            Msg::UpdateUsername(val) => {
                self.username = val;
                true
            }

            Msg::UpdatePassword(val) => {
                self.password = val;
                true
            }

            Msg::SubmitAuth => {
                let username = self.username.clone();
                let password = self.password.clone();
                let api = self.api.clone();
                let link = ctx.link().clone();

                match self.auth_mode {
                    AuthMode::Login => spawn_local(async move {
                        let req = LoginRequest {
                            username: username.clone(),
                            password,
                        };
                        match api.login(&req).await {
                            Ok(response) => link.send_message(Msg::LoggedIn(username, response)),
                            Err(e) => link.send_message(Msg::AuthFailed(e)),
                        }
                    }),
                    AuthMode::Register => spawn_local(async move {
                        let req = RegisterRequest::for_student(username, password);
                        match api.register(&req).await {
                            Ok(_) => link.send_message(Msg::Registered),
                            Err(e) => link.send_message(Msg::AuthFailed(e)),
                        }
                    }),
                }

                false
            }

            Msg::LoggedIn(username, response) => {
                let user = response.user_or_fallback(&username);
                if let Err(e) = Session::new(response.token, user).save(&BrowserStorage) {
                    log::error!("Failed to store session: {}", e);
                    alert(&format!("Error: {}", e));
                    return false;
                }

                alert("Login successful!");
                self.auth_mode = self.auth_mode.after_success();
                self.login_open = false;
                self.check_auth();
                true
            }

            Msg::Registered => {
                alert("Registration successful! Please login.");
                self.auth_mode = self.auth_mode.after_success();
                true
            }

            Msg::AuthFailed(e) => {
                log::error!("Auth request failed: {:?}", e);
                alert(&format!("Error: {}", e));
                false
            }

            // Профиль
            Msg::UpdateProfileEmail(val) => {
                self.profile_email = val;
                true
            }

            Msg::SaveProfile => {
                let req = UpdateUserRequest {
                    email: Some(self.profile_email.clone()),
                    ..Default::default()
                };
                let api = self.api.clone();
                let link = ctx.link().clone();

                spawn_local(async move {
                    match api.update_user(&req).await {
                        Ok(user) => link.send_message(Msg::ProfileSaved(user)),
                        Err(e) => link.send_message(Msg::ProfileFailed(e)),
                    }
                });

                false
            }

            Msg::ProfileSaved(user) => {
                if let Err(e) = session::save_user(&BrowserStorage, &user) {
                    log::error!("Failed to store user: {}", e);
                }
                self.check_auth();
                alert("Profile updated!");
                true
            }

            Msg::ProfileFailed(e) => {
                alert(&format!("Error: {}", e));
                false
            }

            Msg::ChooseAvatar => {
                if let Some(input) = self.avatar_input.cast::<HtmlInputElement>() {
                    input.click();
                }
                false
            }

            Msg::AvatarSelected(file) => {
                let link = ctx.link().clone();
                let file = gloo_file::File::from(file);
                // Чтение прерывается, если FileReader будет удалён
                self.avatar_reader = Some(gloo_file::callbacks::read_as_data_url(
                    &file,
                    move |result| {
                        link.send_message(Msg::AvatarLoaded(result.map_err(|e| e.to_string())));
                    },
                ));
                false
            }

            Msg::AvatarLoaded(result) => {
                self.avatar_reader = None;
                match result {
                    Ok(data_url) => {
                        if let Err(e) = session::save_avatar(&BrowserStorage, &data_url) {
                            log::error!("Failed to store avatar: {}", e);
                        }
                        self.avatar = Some(data_url);
                        true
                    }
                    Err(e) => {
                        log::error!("Failed to read avatar: {}", e);
                        false
                    }
                }
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <>
                { self.view_nav(ctx) }

                <main class="container">
                    <section
                        id="home-section"
                        class={classes!(hidden_if(self.section != Section::Home))}
                    >
                        { self.view_filter(ctx) }
                        <div id={MAP_CONTAINER_ID} class="map"></div>
                        { self.view_restaurant_grid(ctx) }
                    </section>

                    <section
                        id="profile-section"
                        class={classes!(hidden_if(self.section != Section::Profile))}
                    >
                        { self.view_profile(ctx) }
                    </section>
                </main>

                { self.view_login_modal(ctx) }
                { self.view_menu_modal(ctx) }
            </>
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        // Карта создаётся один раз, после первой успешной загрузки
        if self.map_pending && self.map.is_none() {
            self.map_pending = false;
            match MAPBOX_ACCESS_TOKEN {
                Some(token) => match RestaurantMap::init(&self.restaurants, token) {
                    Ok(map) => self.map = Some(map),
                    Err(e) => log::error!("Failed to initialize map: {:?}", e),
                },
                None => log::warn!("MAPBOX_ACCESS_TOKEN was not set at build time, map disabled"),
            }
        }

        if self.resize_map {
            self.resize_map = false;
            if let Some(map) = &self.map {
                map.resize();
            }
        }
    }
}

impl App {
    /// Re-reads the cached user and avatar. Only the user decides the nav state.
    fn check_auth(&mut self) {
        self.user = session::current_user(&BrowserStorage);
        if let Some(user) = &self.user {
            self.profile_email = user.email.clone();
        }
        self.avatar = session::load_avatar(&BrowserStorage);
    }

    fn fetch_menu(&self, ctx: &Context<Self>, id: String, tab: MenuTab) {
        let api = self.api.clone();
        let link = ctx.link().clone();

        spawn_local(async move {
            match tab {
                MenuTab::Today => {
                    let result = api.get_daily_menu(&id, MENU_LANG).await;
                    link.send_message(Msg::DailyMenuLoaded(id, result));
                }
                MenuTab::Week => {
                    let result = api.get_weekly_menu(&id, MENU_LANG).await;
                    link.send_message(Msg::WeeklyMenuLoaded(id, result));
                }
            }
        });
    }

    fn view_nav(&self, ctx: &Context<Self>) -> Html {
        let logged_in = self.user.is_some();

        html! {
            <nav class="navbar">
                <span class="brand">{ "🍴 Restaurants" }</span>
                <button id="nav-home" onclick={ctx.link().callback(|_| Msg::ShowHome)}>
                    { "Home" }
                </button>
                <button
                    id="nav-profile"
                    class={classes!(hidden_if(!logged_in))}
                    onclick={ctx.link().callback(|_| Msg::ShowProfile)}
                >
                    { "Profile" }
                </button>
                <button
                    id="nav-login"
                    class={classes!(hidden_if(logged_in))}
                    onclick={ctx.link().callback(|_| Msg::OpenLogin)}
                >
                    { "Login" }
                </button>
                <button
                    id="nav-logout"
                    class={classes!(hidden_if(!logged_in))}
                    onclick={ctx.link().callback(|_| Msg::Logout)}
                >
                    { "Logout" }
                </button>
            </nav>
        }
    }

    fn view_filter(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="filter-bar">
                <input
                    id="city-filter"
                    type="text"
                    placeholder="Filter by city"
                    value={self.city_filter.clone()}
                    oninput={ctx.link().callback(|e: InputEvent| {
                        let input: HtmlInputElement = e.target_unchecked_into();
                        Msg::UpdateCityFilter(input.value())
                    })}
                />
                <button id="reset-filter" onclick={ctx.link().callback(|_| Msg::ResetFilter)}>
                    { "Reset" }
                </button>
            </div>
        }
    }

    fn view_restaurant_grid(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="restaurant-grid">
                { for filter_by_city(&self.restaurants, &self.city_filter)
                    .into_iter()
                    .map(|restaurant| self.view_restaurant_card(restaurant, ctx)) }
            </div>
        }
    }

    fn view_restaurant_card(&self, restaurant: &Restaurant, ctx: &Context<Self>) -> Html {
        let is_favorite = self.favorites.contains(&restaurant.id);

        let favorite_callback = {
            let id = restaurant.id.clone();
            ctx.link().callback(move |e: MouseEvent| {
                e.stop_propagation();
                Msg::ToggleFavorite(id.clone())
            })
        };

        let menu_callback = {
            let restaurant = restaurant.clone();
            ctx.link()
                .callback(move |_| Msg::OpenMenu(restaurant.clone()))
        };

        html! {
            <div class="restaurant-card" key={restaurant.id.clone()}>
                <button
                    class={classes!("fav-btn", is_favorite.then_some("active"))}
                    data-id={restaurant.id.clone()}
                    onclick={favorite_callback}
                >
                    { "★" }
                </button>
                <h3>{ &restaurant.name }</h3>
                <p>{ format!("📍 {}, {}", restaurant.address, restaurant.city) }</p>
                <p>{ format!("🏢 {}", restaurant.company) }</p>
                <button class="btn-menu" onclick={menu_callback}>
                    { "🍽️ View Menu" }
                </button>
            </div>
        }
    }

    fn view_menu_modal(&self, ctx: &Context<Self>) -> Html {
        let Some(menu) = &self.menu else {
            return html! {};
        };

        let tab_button = |tab: MenuTab, label: &'static str| {
            html! {
                <button
                    class={classes!("tab", (menu.tab == tab).then_some("active"))}
                    onclick={ctx.link().callback(move |_| Msg::SwitchMenuTab(tab))}
                >
                    { label }
                </button>
            }
        };

        html! {
            <div id="menu-modal" class="modal">
                <div class="modal-content">
                    <button class="close-modal" onclick={ctx.link().callback(|_| Msg::CloseModals)}>
                        { "×" }
                    </button>
                    <h2>{ &menu.restaurant.name }</h2>
                    <div class="menu-tabs">
                        { tab_button(MenuTab::Today, "Today") }
                        { tab_button(MenuTab::Week, "This week") }
                    </div>
                    <div id="menu-content">
                        { view_menu_content(&menu.content) }
                    </div>
                </div>
            </div>
        }
    }

    fn view_login_modal(&self, ctx: &Context<Self>) -> Html {
        if !self.login_open {
            return html! {};
        }

        let mode = self.auth_mode;
        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::SubmitAuth
        });
        let ontoggle = ctx.link().callback(|e: MouseEvent| {
            e.prevent_default();
            Msg::ToggleAuthMode
        });

        html! {
            <div id="login-modal" class="modal">
                <div class="modal-content">
                    <button class="close-modal" onclick={ctx.link().callback(|_| Msg::CloseModals)}>
                        { "×" }
                    </button>
                    <h2>{ mode.title() }</h2>
                    <form id="login-form" {onsubmit}>
                        <input
                            id="username"
                            type="text"
                            placeholder="Username"
                            required={true}
                            value={self.username.clone()}
                            oninput={ctx.link().callback(|e: InputEvent| {
                                let input: HtmlInputElement = e.target_unchecked_into();
                                Msg::UpdateUsername(input.value())
                            })}
                        />
                        <input
                            id="password"
                            type="password"
                            placeholder="Password"
                            required={true}
                            value={self.password.clone()}
                            oninput={ctx.link().callback(|e: InputEvent| {
                                let input: HtmlInputElement = e.target_unchecked_into();
                                Msg::UpdatePassword(input.value())
                            })}
                        />
                        <button type="submit">{ mode.submit_label() }</button>
                    </form>
                    <p class="toggle-auth">
                        { mode.toggle_prompt() }
                        { " " }
                        <a href="#" id="switch-to-register" onclick={ontoggle}>
                            { mode.toggle_link() }
                        </a>
                    </p>
                </div>
            </div>
        }
    }

    fn view_profile(&self, ctx: &Context<Self>) -> Html {
        let username = self
            .user
            .as_ref()
            .map(|user| user.username.clone())
            .unwrap_or_default();

        let on_avatar_change = ctx.link().batch_callback(|e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            input
                .files()
                .and_then(|files| files.get(0))
                .map(Msg::AvatarSelected)
        });

        html! {
            <div class="profile-card">
                <div class="avatar">
                    if let Some(avatar) = &self.avatar {
                        <img id="profile-avatar" src={avatar.clone()} alt="Avatar" />
                    } else {
                        <div id="profile-avatar" class="avatar-placeholder">{ "👤" }</div>
                    }
                    <button
                        id="btn-upload-avatar"
                        onclick={ctx.link().callback(|_| Msg::ChooseAvatar)}
                    >
                        { "Upload Avatar" }
                    </button>
                    <input
                        id="avatar-upload"
                        type="file"
                        accept="image/*"
                        class="hidden"
                        ref={self.avatar_input.clone()}
                        onchange={on_avatar_change}
                    />
                </div>

                <h2 id="profile-username">{ username }</h2>
                <label for="profile-email">{ "Email" }</label>
                <input
                    id="profile-email"
                    type="email"
                    value={self.profile_email.clone()}
                    oninput={ctx.link().callback(|e: InputEvent| {
                        let input: HtmlInputElement = e.target_unchecked_into();
                        Msg::UpdateProfileEmail(input.value())
                    })}
                />
                <button id="save-profile" onclick={ctx.link().callback(|_| Msg::SaveProfile)}>
                    { "Save" }
                </button>

                <h3>{ "Favorite restaurants" }</h3>
                <ul id="favorites-ul">
                    { self.view_favorite_items() }
                </ul>
            </div>
        }
    }

    fn view_favorite_items(&self) -> Html {
        let favorites = self.favorites.select(&self.restaurants);
        if favorites.is_empty() {
            return html! { <li>{ "No favorites yet." }</li> };
        }

        favorites
            .into_iter()
            .map(|restaurant| html! { <li key={restaurant.id.clone()}>{ &restaurant.name }</li> })
            .collect()
    }
}

fn view_menu_content(content: &MenuContent) -> Html {
    match content {
        MenuContent::Loading => html! { <p>{ "Loading menu..." }</p> },
        MenuContent::Unavailable(text) => html! { <p>{ *text }</p> },
        MenuContent::Daily(courses) => view_course_table(courses),
        MenuContent::Weekly(days) => html! {
            <>
                { for days.iter().map(view_menu_day) }
            </>
        },
    }
}

fn view_menu_day(day: &MenuDay) -> Html {
    html! {
        <div class="menu-day" key={day.date.clone()}>
            <h4>{ &day.date }</h4>
            { view_course_table(&day.courses) }
        </div>
    }
}

fn view_course_table(courses: &[Course]) -> Html {
    if courses.is_empty() {
        return html! { <p>{ NO_COURSES }</p> };
    }

    html! {
        <table class="menu-table">
            { for courses.iter().map(|course| html! {
                <tr>
                    <td>
                        <div><strong>{ &course.name }</strong></div>
                        <div class="diets">{ course.diets.clone().unwrap_or_default() }</div>
                    </td>
                    <td class="price">{ course.price.clone().unwrap_or_default() }</td>
                </tr>
            }) }
        </table>
    }
}

fn hidden_if(hidden: bool) -> Option<&'static str> {
    hidden.then_some("hidden")
}

fn alert(message: &str) {
    if let Err(e) = gloo_utils::window().alert_with_message(message) {
        log::warn!("alert() failed: {:?}", e);
    }
}
