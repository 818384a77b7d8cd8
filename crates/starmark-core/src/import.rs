// GitHub stars -> bookmarks
use starmark_store::Storage;
use tracing::{debug, info, warn};

use crate::{
    bookmarks,
    models::{parse_starred_at, ImportRequest},
    stars::StarsSource,
    Error, Result,
};

/// What a finished import did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub pages: usize,
}

impl ImportSummary {
    pub fn message(&self) -> String {
        format!("Imported {} bookmarks from starred repos!", self.imported)
    }
}

/// Walks an account's stars page by page and adds each one as a bookmark
///
/// Strictly sequential: every bookmark is written before the next one is
/// looked at, and the next page is only requested once the current page is
/// fully stored. If anything fails midway, whatever was imported so far stays.
pub struct StarsImporter<'a> {
    source: &'a dyn StarsSource,
    store: &'a dyn Storage,
}

impl<'a> StarsImporter<'a> {
    pub fn new(source: &'a dyn StarsSource, store: &'a dyn Storage) -> Self {
        Self { source, store }
    }

    pub async fn run(&self, request: &ImportRequest) -> Result<ImportSummary> {
        let mut summary = ImportSummary {
            imported: 0,
            pages: 0,
        };
        let mut next_page = Some(self.source.starred_url(&request.account));

        info!("Importing stars of {}", request.account);

        while let Some(url) = next_page.take() {
            let page = self.source.fetch_page(&url).await.map_err(|e| {
                warn!("Fetching {} failed after {} imports: {}", url, summary.imported, e);
                Error::Fetch {
                    imported: summary.imported,
                    message: e.to_string(),
                }
            })?;
            summary.pages += 1;
            // Follow the server's cursor only; an empty link ends the walk too
            next_page = page.next.filter(|next| !next.is_empty());

            debug!("Page {} has {} stars", summary.pages, page.items.len());

            for item in &page.items {
                let timestamp = if request.preserve_remote_timestamps {
                    Some(parse_starred_at(&item.starred_at)?)
                } else {
                    None
                };

                bookmarks::add(self.store, &item.to_bookmark(), timestamp)?;
                summary.imported += 1;
            }
        }

        info!(
            "Imported {} stars across {} page(s)",
            summary.imported, summary.pages
        );
        Ok(summary)
    }
}
