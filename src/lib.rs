mod auth;
mod config;
mod database;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod service;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;

use crate::auth::TokenSigner;
use crate::db::stage_db;
use crate::middleware::RequestLogger;
use crate::routes as app_routes;
use crate::routes::session::CampusTimezone;
use crate::service::biometric::{BiometricMatcher, TemplateEqualityMatcher};
use chrono_tz::Tz;
use rocket::{Build, Rocket, catchers, http::Method};
use rocket_cors::{AllowedOrigins, CorsOptions};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing(log_level: &str, json_format: bool) {
    // RUST_LOG overrides the configured level for per-module control, e.g.
    // RUST_LOG=info,authentikate::service=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);

    if json_format {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn build_cors(cors_config: &config::CorsConfig) -> CorsOptions {
    let is_wildcard = cors_config.allowed_origins.len() == 1 && cors_config.allowed_origins[0] == "*";

    let allowed_origins = if is_wildcard {
        AllowedOrigins::all()
    } else {
        AllowedOrigins::some_exact(&cors_config.allowed_origins.iter().map(String::as_str).collect::<Vec<_>>())
    };

    CorsOptions {
        allowed_origins,
        allowed_methods: vec![Method::Get, Method::Post, Method::Options]
            .into_iter()
            .map(From::from)
            .collect(),
        allowed_headers: rocket_cors::AllowedHeaders::some(&["Content-Type", "Authorization", "Accept"]),
        ..Default::default()
    }
}

struct RouteSpec {
    path: &'static str,
    routes: Vec<rocket::Route>,
}

fn collect_route_specs() -> Vec<RouteSpec> {
    vec![
        RouteSpec {
            path: "/auth",
            routes: app_routes::auth::routes(),
        },
        RouteSpec {
            path: "/",
            routes: app_routes::department::routes(),
        },
        RouteSpec {
            path: "/courses",
            routes: app_routes::course::routes(),
        },
        RouteSpec {
            path: "/enrollment",
            routes: app_routes::enrollment::routes(),
        },
        RouteSpec {
            path: "/sessions",
            routes: app_routes::session::routes(),
        },
        RouteSpec {
            path: "/attendance",
            routes: app_routes::attendance::routes(),
        },
        RouteSpec {
            path: "/reports",
            routes: app_routes::report::routes(),
        },
        RouteSpec {
            path: "/health",
            routes: app_routes::health::routes(),
        },
    ]
}

pub fn build_rocket(config: Config) -> Rocket<Build> {
    init_tracing(&config.logging.level, config.logging.json_format);

    let cors = build_cors(&config.cors).to_cors().expect("Failed to create CORS fairing");

    let campus_tz: Tz = config
        .campus
        .timezone
        .parse()
        .unwrap_or_else(|_| panic!("Invalid campus timezone: {}", config.campus.timezone));

    let signer = TokenSigner::new(&config.auth);
    let matcher: Arc<dyn BiometricMatcher> = Arc::new(TemplateEqualityMatcher);

    let figment = rocket::Config::figment()
        .merge(("port", config.server.port))
        .merge(("address", config.server.address.clone()));

    let mut rocket = rocket::custom(figment)
        .attach(cors)
        .attach(RequestLogger)
        .attach(stage_db(config.database))
        .manage(signer)
        .manage(CampusTimezone(campus_tz))
        .manage(matcher);

    for spec in collect_route_specs() {
        rocket = rocket.mount(spec.path, spec.routes);
    }

    rocket.register(
        "/",
        catchers![app_routes::error::unauthorized, app_routes::error::not_found, app_routes::error::conflict],
    )
}
