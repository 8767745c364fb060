use authentikate::{Config, build_rocket};
use rocket::{Build, Rocket};

#[rocket::launch]
fn rocket() -> Rocket<Build> {
    dotenvy::dotenv().ok();

    let config = Config::load().unwrap_or_else(|e| panic!("Failed to load configuration: {e}"));
    build_rocket(config)
}
