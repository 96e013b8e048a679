mod logging;
mod store;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use restaurant_client::models::{Course, UpdateUserRequest, DEFAULT_API_URL, DEFAULT_LANG};
use restaurant_client::state::{filter_by_city, Favorites};
use restaurant_client::{session, RestaurantClient};
use std::path::PathBuf;
use store::FileStore;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the restaurant API
    #[arg(short, long, env = "RESTAURANT_API_URL", default_value = DEFAULT_API_URL)]
    server: String,

    /// Session file (defaults to ~/.restaurant_session.json)
    #[arg(long, env = "RESTAURANT_STORE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List restaurants
    Restaurants {
        /// Keep restaurants whose city contains this text (case-insensitive)
        #[arg(short, long)]
        city: Option<String>,

        /// Only favorites
        #[arg(short, long)]
        favorites: bool,
    },

    /// Show a restaurant's menu
    Menu {
        #[arg(short, long)]
        id: String,

        #[arg(short, long, env = "RESTAURANT_LANG", default_value = DEFAULT_LANG)]
        lang: String,

        /// Whole week instead of today
        #[arg(short, long)]
        weekly: bool,
    },

    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    Logout,

    Status,

    /// Add or remove a favorite
    Favorite {
        #[arg(short, long)]
        id: String,
    },

    Favorites,

    /// Show the profile, or update its email
    Profile {
        #[arg(short, long)]
        email: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    let store = FileStore::open(cli.store).context("Failed to open session store")?;
    let client = RestaurantClient::new(cli.server);
    tracing::debug!("Using API at {}", client.base_url());
    if let Some(token) = session::load_token(&store) {
        client.set_token(token).await;
        tracing::debug!("Authenticated with saved token");
    }

    match cli.command {
        Commands::Restaurants { city, favorites } => {
            list_restaurants(&client, &store, city.as_deref(), favorites).await
        }
        Commands::Menu { id, lang, weekly } => show_menu(&client, &id, &lang, weekly).await,
        Commands::Register { username, password } => {
            println!("📝 Registering user: {}", username);

            match client.register(&username, password).await {
                Ok(_) => {
                    println!("{}", "✅ Registration successful! Please login.".green());
                    Ok(())
                }
                Err(e) => fail(format!("Error: {}", e)),
            }
        }
        Commands::Login { username, password } => {
            println!("🔑 Logging in as: {}", username);

            match client.login(&username, password).await {
                Ok(logged_in) => {
                    logged_in.save(&store)?;
                    println!("{}", "✅ Login successful!".green());
                    println!("   Username: {}", logged_in.user.username);
                    println!("   Email: {}", logged_in.user.email);
                    Ok(())
                }
                Err(e) => fail(format!("Error: {}", e)),
            }
        }
        Commands::Logout => {
            session::clear(&store)?;
            client.clear_token().await;
            println!("👋 You have logged out.");
            Ok(())
        }
        Commands::Status => {
            show_status(&store);
            Ok(())
        }
        Commands::Favorite { id } => {
            let mut favorites = Favorites::load(&store);
            let added = favorites.toggle(&id);
            favorites.save(&store)?;

            if added {
                println!("{} Added {} to favorites", "★".yellow(), id);
            } else {
                println!("☆ Removed {} from favorites", id);
            }
            Ok(())
        }
        Commands::Favorites => list_favorites(&client, &store).await,
        Commands::Profile { email } => match email {
            Some(email) => update_email(&client, &store, email).await,
            None => {
                show_profile(&store);
                Ok(())
            }
        },
    }
}

async fn list_restaurants(
    client: &RestaurantClient,
    store: &FileStore,
    city: Option<&str>,
    only_favorites: bool,
) -> Result<()> {
    let restaurants = match client.restaurants().await {
        Ok(restaurants) => restaurants,
        Err(e) => fail(format!("Failed to load restaurants: {}", e)),
    };
    let favorites = Favorites::load(store);

    let shown: Vec<_> = filter_by_city(&restaurants, city.unwrap_or_default())
        .into_iter()
        .filter(|r| !only_favorites || favorites.contains(&r.id))
        .collect();

    println!("📋 {} of {} restaurants", shown.len(), restaurants.len());
    println!();

    for restaurant in shown {
        let star = if favorites.contains(&restaurant.id) {
            "★".yellow()
        } else {
            "☆".normal()
        };
        println!("{} {}  [{}]", star, restaurant.name.bold(), restaurant.id);
        println!("   📍 {}, {}", restaurant.address, restaurant.city);
        println!("   🏢 {}", restaurant.company);
    }

    Ok(())
}

async fn show_menu(client: &RestaurantClient, id: &str, lang: &str, weekly: bool) -> Result<()> {
    if weekly {
        match client.weekly_menu(id, lang).await {
            Ok(menu) if !menu.has_courses() => println!("No courses found."),
            Ok(menu) => {
                for day in menu.days {
                    println!("{}", day.date.bold());
                    print_courses(&day.courses);
                    println!();
                }
            }
            Err(e) => {
                tracing::debug!("Weekly menu for {} failed: {}", id, e);
                println!("{}", "No menu available for this week.".yellow());
            }
        }
    } else {
        match client.daily_menu(id, lang).await {
            Ok(menu) => print_courses(&menu.courses),
            Err(e) => {
                tracing::debug!("Daily menu for {} failed: {}", id, e);
                println!("{}", "No menu available for today.".yellow());
            }
        }
    }

    Ok(())
}

fn print_courses(courses: &[Course]) {
    if courses.is_empty() {
        println!("   No courses found.");
        return;
    }

    for course in courses {
        println!(
            "   {}  {}",
            course.name,
            course.price.as_deref().unwrap_or_default().green()
        );
        if let Some(diets) = course.diets.as_deref().filter(|d| !d.is_empty()) {
            println!("      {}", diets.dimmed());
        }
    }
}

fn show_status(store: &FileStore) {
    let favorites = Favorites::load(store);

    match session::current_user(store) {
        Some(user) => {
            println!("🔑 Logged in as {} ({})", user.username, user.email);
            if let Some(token) = session::load_token(store) {
                let preview: String = token.chars().take(12).collect();
                println!("   Token: {}...", preview);
            }
        }
        None => println!("❌ Not logged in"),
    }

    println!("   Favorites: {}", favorites.len());
    println!("   Store: {:?}", store.path());
}

async fn list_favorites(client: &RestaurantClient, store: &FileStore) -> Result<()> {
    let favorites = Favorites::load(store);
    if favorites.is_empty() {
        println!("No favorites yet.");
        return Ok(());
    }

    let restaurants = match client.restaurants().await {
        Ok(restaurants) => restaurants,
        Err(e) => fail(format!("Failed to load restaurants: {}", e)),
    };

    let selected = favorites.select(&restaurants);
    if selected.is_empty() {
        println!("No favorites yet.");
    }
    for restaurant in selected {
        println!("{} {}  [{}]", "★".yellow(), restaurant.name, restaurant.id);
    }

    Ok(())
}

fn show_profile(store: &FileStore) {
    let Some(user) = session::current_user(store) else {
        println!("❌ Not logged in");
        return;
    };

    println!("👤 {}", user.username.bold());
    println!("   Email: {}", user.email);
    let avatar = if session::load_avatar(store).is_some() {
        "uploaded"
    } else {
        "none"
    };
    println!("   Avatar: {}", avatar);
    println!("   Favorites: {}", Favorites::load(store).len());
}

async fn update_email(client: &RestaurantClient, store: &FileStore, email: String) -> Result<()> {
    if !session::is_authenticated(store) {
        fail("Not logged in. Please login first.".to_string());
    }

    let req = UpdateUserRequest {
        email: Some(email),
        ..Default::default()
    };

    match client.update_user(&req).await {
        Ok(user) => {
            session::save_user(store, &user)?;
            println!("{}", "✅ Profile updated!".green());
            println!("   Email: {}", user.email);
            Ok(())
        }
        Err(e) if e.is_unauthorized() => {
            fail(format!("Error: {}. Your session may have expired, please login again.", e))
        }
        Err(e) => fail(format!("Error: {}", e)),
    }
}

fn fail(message: String) -> ! {
    eprintln!("{} {}", "❌".red(), message);
    std::process::exit(1);
}
