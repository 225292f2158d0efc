use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use serde_json::json;
use shared::{calendar, ContributionHistory};
use tracing::{debug, instrument, warn};

pub(crate) mod types;
pub use types::*;

const REPOSITORIES_PER_PAGE: usize = 100;

const USER_QUERY: &str = r#"
query($login: String!) {
  user(login: $login) {
    login
    name
    avatarUrl
    bio
    company
    location
    websiteUrl
    createdAt
    followers { totalCount }
    publicGists: gists(privacy: PUBLIC) { totalCount }
    mergedPrs: pullRequests(states: MERGED) { totalCount }
    repositories(ownerAffiliations: OWNER, privacy: PUBLIC, isFork: false) { totalCount }
    contributionsCollection { contributionYears }
  }
}
"#;

const REPOSITORIES_QUERY: &str = r#"
query($login: String!, $first: Int!, $after: String) {
  user(login: $login) {
    repositories(
      first: $first
      after: $after
      ownerAffiliations: OWNER
      privacy: PUBLIC
      isFork: false
      orderBy: { field: STARGAZERS, direction: DESC }
    ) {
      pageInfo { hasNextPage endCursor }
      nodes {
        name
        stargazerCount
        forkCount
        primaryLanguage { name }
      }
    }
  }
}
"#;

const CONTRIBUTIONS_QUERY: &str = r#"
query($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      totalCommitContributions
      totalPullRequestReviewContributions
      totalIssueContributions
      totalRepositoryContributions
      restrictedContributionsCount
      contributionCalendar {
        weeks {
          contributionDays { date contributionCount }
        }
      }
    }
  }
}
"#;

#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    #[error("GitHub user not found")]
    UserNotFound,
    #[error("GitHub request failed: {0}")]
    Api(#[from] octocrab::Error),
    #[error("GitHub GraphQL error: {0}")]
    GraphQl(String),
}

/// A null user without errors, or with a `NOT_FOUND` error, is an unknown
/// login. Any other error is reported with its messages joined.
fn into_user<T>(response: GraphQlResponse<UserQuery<T>>) -> Result<T, GithubError> {
    match response.data.and_then(|data| data.user) {
        Some(user) => Ok(user),
        None if response.errors.is_empty()
            || response.errors.iter().any(GraphQlError::is_not_found) =>
        {
            Err(GithubError::UserNotFound)
        }
        None => Err(GithubError::GraphQl(
            response
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; "),
        )),
    }
}

#[derive(Clone, Debug)]
pub struct GithubClient {
    octocrab: octocrab::Octocrab,
    max_repositories: usize,
}

impl GithubClient {
    pub fn new(github_token: String, max_repositories: usize) -> anyhow::Result<Self> {
        let octocrab = octocrab::Octocrab::builder()
            .personal_token(github_token)
            .build()?;

        Ok(Self {
            octocrab,
            max_repositories,
        })
    }

    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, GithubError> {
        let response: GraphQlResponse<UserQuery<T>> = self
            .octocrab
            .graphql(&json!({ "query": query, "variables": variables }))
            .await?;

        into_user(response)
    }

    #[instrument(skip(self))]
    pub async fn user(&self, login: &str) -> Result<UserNode, GithubError> {
        self.query(USER_QUERY, json!({ "login": login })).await
    }

    /// Owned, public, non-fork repositories, most starred first.
    #[instrument(skip(self))]
    pub async fn repositories(&self, login: &str) -> Result<Vec<RepositoryNode>, GithubError> {
        let mut repositories = Vec::new();
        let mut after: Option<String> = None;

        while repositories.len() < self.max_repositories {
            let first = REPOSITORIES_PER_PAGE.min(self.max_repositories - repositories.len());
            let page: RepositoriesNode = self
                .query(
                    REPOSITORIES_QUERY,
                    json!({ "login": login, "first": first, "after": after }),
                )
                .await?;

            let connection = page.repositories;
            debug!("Fetched {} repositories", connection.nodes.len());
            repositories.extend(connection.nodes);

            match connection.page_info.end_cursor {
                Some(cursor) if connection.page_info.has_next_page => after = Some(cursor),
                _ => return Ok(repositories),
            }
        }

        warn!(
            "Repository list truncated at {} entries",
            self.max_repositories
        );
        repositories.truncate(self.max_repositories);

        Ok(repositories)
    }

    #[instrument(skip(self))]
    pub async fn contributions_for_year(
        &self,
        login: &str,
        year: i32,
    ) -> Result<ContributionHistory, GithubError> {
        let (from, to) = calendar::year_bounds(year)
            .ok_or_else(|| GithubError::GraphQl(format!("Invalid contribution year {year}")))?;

        let node: ContributionsNode = self
            .query(
                CONTRIBUTIONS_QUERY,
                json!({ "login": login, "from": from, "to": to }),
            )
            .await?;

        Ok(node.contributions_collection.into())
    }

    /// All-time contributions, one request per active year, merged into a
    /// single history.
    #[instrument(skip(self, years))]
    pub async fn contributions(
        &self,
        login: &str,
        years: &[i32],
    ) -> Result<ContributionHistory, GithubError> {
        let years: Vec<i32> = if years.is_empty() {
            vec![calendar::current_year()]
        } else {
            years.to_vec()
        };

        let histories = try_join_all(
            years
                .into_iter()
                .map(|year| self.contributions_for_year(login, year)),
        )
        .await?;

        Ok(histories.into_iter().collect())
    }

    #[instrument(skip(self))]
    pub async fn profile(&self, login: &str) -> Result<ProfileData, GithubError> {
        let user = self.user(login).await?;
        let (repositories, contributions) = futures::try_join!(
            self.repositories(&user.login),
            self.contributions(&user.login, &user.contributions_collection.contribution_years),
        )?;

        Ok(ProfileData {
            user,
            repositories,
            contributions,
        })
    }
}
