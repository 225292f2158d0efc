#[macro_use]
extern crate rocket;

mod entrypoints;

use std::sync::Arc;
use std::time::Duration;

use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use github_insights_server::{api::github::GithubClient, cache};

#[derive(Debug, serde::Deserialize)]
pub struct Env {
    github_token: String,
    cache_ttl_in_minutes: Option<u64>,
    max_repositories: Option<usize>,
}

#[launch]
async fn rocket() -> _ {
    dotenv::dotenv().ok();

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().pretty());
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let env = envy::from_env::<Env>().expect("Failed to load environment variables");
    let cache_ttl = Duration::from_secs(env.cache_ttl_in_minutes.unwrap_or(240) * 60);
    let github = GithubClient::new(env.github_token, env.max_repositories.unwrap_or(1000))
        .expect("Failed to create Github client");

    let cors = CorsOptions {
        allowed_origins: AllowedOrigins::all(),
        allowed_methods: [Method::Get, Method::Options]
            .into_iter()
            .map(From::from)
            .collect(),
        allowed_headers: AllowedHeaders::some(&["Content-Type", "Authorization", "Accept"]),
        max_age: Some(86400),
        ..Default::default()
    }
    .to_cors()
    .expect("Failed to create CORS fairing");

    let span = tracing::info_span!("Starting Rocket");
    let _enter = span.enter();

    rocket::build()
        .attach(cors)
        .manage(Arc::new(github))
        .attach(cache::stage(cache_ttl))
        .attach(entrypoints::stage())
}
