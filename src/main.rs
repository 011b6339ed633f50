#[macro_use]
extern crate rocket;

use rocket::fs::FileServer;
use rocket::response::content::RawHtml;
use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;

mod ai;
mod boot;
mod credentials;
mod db;
mod export;
mod models;
mod render;
mod routes;
mod seo;
mod state;


#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Page not found.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>← Home</a></body></html>".to_string())
}

/// Assemble the application around an initialised pool.
pub fn build(pool: db::DbPool) -> Rocket<Build> {
    rocket::build()
        .manage(pool)
        .manage(state::AppState::new())
        .attach(Template::fairing())
        .mount("/static", FileServer::from("website/static"))
        .mount("/", routes::pages::routes())
        .mount("/api", routes::api::routes())
        .register("/", catchers![not_found, server_error])
        .register("/api", routes::api::catchers())
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    // Boot check: create missing directories and verify critical files
    boot::run();

    let pool = db::init_pool().expect("Failed to initialize database pool");
    db::run_migrations(&pool).expect("Failed to run database migrations");
    db::seed_defaults(&pool).expect("Failed to seed default settings");

    log::info!("Database ready at {}", db::db_path());

    build(pool)
}
