use rocket::{Build, Rocket, routes};

use crate::{config::Rules, cors::create_cors, session::create_sessions};

pub mod config;
pub mod cors;
pub mod data;
pub mod error;
pub mod logic;
pub mod routes;
pub mod session;

/// Rocket instance serving the board engine with the given rules.
pub fn build(rules: Rules) -> Rocket<Build> {
    rocket::build()
        .attach(create_cors())
        .manage(create_sessions())
        .manage(rules)
        .mount(
            "/",
            routes![
                routes::create_game,
                routes::show_game,
                routes::configure,
                routes::sweep,
                routes::flag,
                routes::new_game,
                routes::delete_game,
            ],
        )
}
