use crate::{models::NewBookmark, Result};

/// One starred repository, reduced to what becomes a bookmark
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarredItem {
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    /// Raw `starred_at`; only parsed when the import keeps remote timestamps
    pub starred_at: String,
}

impl StarredItem {
    pub fn to_bookmark(&self) -> NewBookmark {
        NewBookmark {
            title: self.name.clone(),
            url: self.html_url.clone(),
            notes: self.description.clone(),
        }
    }
}

/// A page of stars plus the server's link to the next one
#[derive(Debug, Clone, Default)]
pub struct StarsPage {
    pub items: Vec<StarredItem>,
    pub next: Option<String>,
}

/// Where starred repositories come from
///
/// GitHub in production, a canned set of pages in tests. Pagination is
/// whatever `next` the source hands back; callers never build page URLs.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait StarsSource: Send + Sync {
    /// URL of the first page of `account`'s stars
    fn starred_url(&self, account: &str) -> String;

    async fn fetch_page(&self, url: &str) -> Result<StarsPage>;
}
