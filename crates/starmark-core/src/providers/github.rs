// GitHub provider implementation - bridges API client with StarsSource trait
use async_trait::async_trait;
use starmark_api::{GitHubClient, StarredEntry};

use crate::{
    config::GitHubConfig,
    stars::{StarredItem, StarsPage, StarsSource},
    Error, Result,
};

/// Wrapper around GitHubClient that implements StarsSource
pub struct GitHubStarsSource {
    client: GitHubClient,
    per_page: u32,
}

impl GitHubStarsSource {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let client = GitHubClient::with_base_url(&config.api_url)
            .map_err(|e| Error::ApiError(e.to_string()))?;

        Ok(Self {
            client,
            per_page: config.per_page(),
        })
    }
}

#[async_trait]
impl StarsSource for GitHubStarsSource {
    fn starred_url(&self, account: &str) -> String {
        self.client.starred_url(account, self.per_page)
    }

    async fn fetch_page(&self, url: &str) -> Result<StarsPage> {
        let page = self
            .client
            .fetch_starred_page(url)
            .await
            .map_err(|e| Error::ApiError(e.to_string()))?;

        Ok(StarsPage {
            items: page.entries.into_iter().map(entry_to_item).collect(),
            next: page.next,
        })
    }
}

/// Convert a GitHub star entry to our internal StarredItem
fn entry_to_item(entry: StarredEntry) -> StarredItem {
    StarredItem {
        name: entry.repo.name,
        html_url: entry.repo.html_url,
        description: entry.repo.description,
        starred_at: entry.starred_at,
    }
}
