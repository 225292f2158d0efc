use github_insights_server::types::{
    BadgesResponse, ContributionDayResponse, DataResponse, LanguageShare, ProfileResponse,
    RankKind, RankResponse, RanksResponse, RepositoryResponse, StreaksResponse,
};
use rocket::fairing::AdHoc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod api;
pub mod common;
pub mod images;

#[derive(OpenApi)]
#[openapi(
    info(title = "GitHub insights", description = "Trophies, ranks and streaks of GitHub users"),
    paths(
        api::get_data,
        api::get_badges,
        api::get_rank,
        api::get_streaks,
        images::index,
        images::get_badges_svg,
        images::get_rank_svg,
        images::get_streaks_svg,
    ),
    components(schemas(
        DataResponse,
        ProfileResponse,
        RepositoryResponse,
        LanguageShare,
        ContributionDayResponse,
        RanksResponse,
        BadgesResponse,
        RankResponse,
        RankKind,
        StreaksResponse,
    ))
)]
pub struct ApiDoc;

pub fn stage() -> AdHoc {
    AdHoc::on_ignite("Installing entrypoints", |rocket| async {
        rocket
            .attach(api::stage())
            .attach(images::stage())
            .mount(
                "/",
                SwaggerUi::new("/swagger-ui/<_..>").url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
}
