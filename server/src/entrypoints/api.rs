use std::sync::Arc;

use chrono::Utc;
use github_insights_server::{
    api::github::GithubClient,
    cache::ResponseCache,
    types::{BadgesResponse, DataResponse, RankKind, RankResponse, StreaksResponse},
};
use rocket::{form::Errors, State};
use shared::{StreakAnalyzer, TrophyEngine};

use super::common::{
    cache_key, fetch_profile, lookup, rank_strategy, require_username, store,
    to_json, ApiError, Cached,
};

#[utoipa::path(context_path = "/api", responses(
    (status = 200, description = "Profile, trophies, ranks, streaks and contribution days", body = DataResponse),
    (status = 400, description = "Missing username"),
    (status = 404, description = "User not found")
))]
#[get("/data?<username>")]
async fn get_data(
    username: Option<&str>,
    github: &State<Arc<GithubClient>>,
    cache: &State<Arc<ResponseCache>>,
) -> Result<Cached, ApiError> {
    let username = require_username(username)?;
    let key = cache_key("api-data", &username);
    if let Some(hit) = lookup(cache, &key).await {
        return Ok(hit);
    }

    let profile = fetch_profile(github, &username).await?;
    let streaks = profile.streaks(&StreakAnalyzer::default());
    let content = to_json(&DataResponse::new(&profile, streaks, Utc::now()))?;

    Ok(store(cache, key, content).await)
}

#[utoipa::path(context_path = "/api", responses(
    (status = 200, description = "Earned trophies, best tier first", body = BadgesResponse),
    (status = 400, description = "Missing username"),
    (status = 404, description = "User not found")
))]
#[get("/badges?<username>")]
async fn get_badges(
    username: Option<&str>,
    github: &State<Arc<GithubClient>>,
    cache: &State<Arc<ResponseCache>>,
) -> Result<Cached, ApiError> {
    let username = require_username(username)?;
    let key = cache_key("api-badges", &username);
    if let Some(hit) = lookup(cache, &key).await {
        return Ok(hit);
    }

    let profile = fetch_profile(github, &username).await?;
    let trophies = TrophyEngine::default().evaluate(&profile.trophy_metrics(Utc::now()));
    let content = to_json(&BadgesResponse {
        username: profile.user.login,
        trophies,
    })?;

    Ok(store(cache, key, content).await)
}

#[utoipa::path(context_path = "/api", params(
    ("username" = String, Query, description = "GitHub login"),
    ("strategy" = Option<RankKind>, Query, description = "Rank strategy, weighted by default")
), responses(
    (status = 200, description = "Rank of the user under the selected strategy", body = RankResponse),
    (status = 400, description = "Missing username or unknown strategy"),
    (status = 404, description = "User not found")
))]
#[get("/rank?<username>&<strategy>")]
async fn get_rank(
    username: Option<&str>,
    strategy: Option<Result<RankKind, Errors<'_>>>,
    github: &State<Arc<GithubClient>>,
    cache: &State<Arc<ResponseCache>>,
) -> Result<Cached, ApiError> {
    let username = require_username(username)?;
    let strategy = rank_strategy(strategy)?;
    let key = cache_key(&format!("api-rank-{}", strategy.name()), &username);
    if let Some(hit) = lookup(cache, &key).await {
        return Ok(hit);
    }

    let profile = fetch_profile(github, &username).await?;
    let rank = strategy.evaluate(&profile.rank_metrics(Utc::now()));
    let content = to_json(&RankResponse {
        username: profile.user.login,
        strategy: strategy.name().to_string(),
        rank,
    })?;

    Ok(store(cache, key, content).await)
}

#[utoipa::path(context_path = "/api", responses(
    (status = 200, description = "Current and longest contribution streaks", body = StreaksResponse),
    (status = 400, description = "Missing username"),
    (status = 404, description = "User not found")
))]
#[get("/streaks?<username>")]
async fn get_streaks(
    username: Option<&str>,
    github: &State<Arc<GithubClient>>,
    cache: &State<Arc<ResponseCache>>,
) -> Result<Cached, ApiError> {
    let username = require_username(username)?;
    let key = cache_key("api-streaks", &username);
    if let Some(hit) = lookup(cache, &key).await {
        return Ok(hit);
    }

    let profile = fetch_profile(github, &username).await?;
    let streaks = profile.streaks(&StreakAnalyzer::default());
    let content = to_json(&StreaksResponse {
        username: profile.user.login,
        streaks,
    })?;

    Ok(store(cache, key, content).await)
}

pub fn stage() -> rocket::fairing::AdHoc {
    rocket::fairing::AdHoc::on_ignite("Installing JSON entrypoints", |rocket| async {
        rocket.mount(
            "/api",
            rocket::routes![get_data, get_badges, get_rank, get_streaks],
        )
    })
}
