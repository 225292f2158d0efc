use std::sync::Arc;

use chrono::Utc;
use github_insights_server::{
    api::github::GithubClient,
    cache::{CachedContent, ResponseCache},
    svg::{generate_rank_svg, generate_streaks_svg, generate_trophies_svg, RankCard},
    types::RankKind,
};
use rocket::{form::Errors, State};
use shared::{StreakAnalyzer, TrophyEngine};

use super::common::{
    cache_key, fetch_profile, lookup, rank_strategy, require_username, store,
    ApiError, Cached,
};

const INDEX: &str = "GitHub insights

JSON:
  GET /api/data?username=<login>
  GET /api/badges?username=<login>
  GET /api/rank?username=<login>&strategy=weighted|percentile
  GET /api/streaks?username=<login>

SVG:
  GET /badges?username=<login>
  GET /rank?username=<login>&strategy=weighted|percentile
  GET /streaks?username=<login>

Docs:
  GET /swagger-ui/
";

#[utoipa::path(context_path = "/", responses(
    (status = 200, description = "List of available endpoints", content_type = "text/plain")
))]
#[get("/")]
fn index() -> &'static str {
    INDEX
}

#[utoipa::path(context_path = "/", responses(
    (status = 200, description = "Trophy grid image", content_type = "image/svg+xml"),
    (status = 400, description = "Missing username"),
    (status = 404, description = "User not found")
))]
#[get("/badges?<username>")]
async fn get_badges_svg(
    username: Option<&str>,
    github: &State<Arc<GithubClient>>,
    cache: &State<Arc<ResponseCache>>,
) -> Result<Cached, ApiError> {
    let username = require_username(username)?;
    let key = cache_key("svg-badges", &username);
    if let Some(hit) = lookup(cache, &key).await {
        return Ok(hit);
    }

    let profile = fetch_profile(github, &username).await?;
    let trophies = TrophyEngine::default().evaluate(&profile.trophy_metrics(Utc::now()));
    let svg = generate_trophies_svg(&profile.user.login, &trophies);

    Ok(store(cache, key, CachedContent::svg(svg)).await)
}

#[utoipa::path(context_path = "/", params(
    ("username" = String, Query, description = "GitHub login"),
    ("strategy" = Option<RankKind>, Query, description = "Rank strategy, weighted by default")
), responses(
    (status = 200, description = "Rank card image", content_type = "image/svg+xml"),
    (status = 400, description = "Missing username or unknown strategy"),
    (status = 404, description = "User not found")
))]
#[get("/rank?<username>&<strategy>")]
async fn get_rank_svg(
    username: Option<&str>,
    strategy: Option<Result<RankKind, Errors<'_>>>,
    github: &State<Arc<GithubClient>>,
    cache: &State<Arc<ResponseCache>>,
) -> Result<Cached, ApiError> {
    let username = require_username(username)?;
    let strategy = rank_strategy(strategy)?;
    let key = cache_key(&format!("svg-rank-{}", strategy.name()), &username);
    if let Some(hit) = lookup(cache, &key).await {
        return Ok(hit);
    }

    let profile = fetch_profile(github, &username).await?;
    let rank = strategy.evaluate(&profile.rank_metrics(Utc::now()));
    let svg = generate_rank_svg(&profile.user.login, &RankCard::from(&rank));

    Ok(store(cache, key, CachedContent::svg(svg)).await)
}

#[utoipa::path(context_path = "/", responses(
    (status = 200, description = "Streak card image", content_type = "image/svg+xml"),
    (status = 400, description = "Missing username"),
    (status = 404, description = "User not found")
))]
#[get("/streaks?<username>")]
async fn get_streaks_svg(
    username: Option<&str>,
    github: &State<Arc<GithubClient>>,
    cache: &State<Arc<ResponseCache>>,
) -> Result<Cached, ApiError> {
    let username = require_username(username)?;
    let key = cache_key("svg-streaks", &username);
    if let Some(hit) = lookup(cache, &key).await {
        return Ok(hit);
    }

    let profile = fetch_profile(github, &username).await?;
    let streaks = profile.streaks(&StreakAnalyzer::default());
    let svg = generate_streaks_svg(&profile.user.login, &streaks);

    Ok(store(cache, key, CachedContent::svg(svg)).await)
}

pub fn stage() -> rocket::fairing::AdHoc {
    rocket::fairing::AdHoc::on_ignite("Installing image entrypoints", |rocket| async {
        rocket.mount(
            "/",
            rocket::routes![index, get_badges_svg, get_rank_svg, get_streaks_svg],
        )
    })
}
