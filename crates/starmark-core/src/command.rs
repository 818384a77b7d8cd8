// The uniform command surface the CLI drives
use chrono::{DateTime, Utc};
use starmark_store::Storage;
use tracing::debug;

use crate::{
    bookmarks,
    import::StarsImporter,
    models::{Bookmark, BookmarkField, EditRequest, ImportRequest, NewBookmark},
    stars::StarsSource,
    Result,
};

/// Everything a command may touch, handed in by the caller
///
/// Nothing here is global; tests build one from an in-memory store and a fake source.
pub struct CommandContext<'a> {
    pub store: &'a dyn Storage,
    pub stars: &'a dyn StarsSource,
}

impl<'a> CommandContext<'a> {
    pub fn new(store: &'a dyn Storage, stars: &'a dyn StarsSource) -> Self {
        Self { store, stars }
    }
}

/// One bookmark operation together with its payload
#[derive(Debug, Clone)]
pub enum Command {
    /// Create the bookmarks table if it isn't there yet
    CreateSchema,
    /// Store a bookmark; without a timestamp it is stamped with the current time
    Add {
        bookmark: NewBookmark,
        timestamp: Option<DateTime<Utc>>,
    },
    List { order_by: BookmarkField },
    Delete { id: i64 },
    Edit(EditRequest),
    ImportStars(ImportRequest),
    /// Ask the caller to stop; nothing is torn down here
    Quit,
}

/// What executing a command produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Status(String),
    Bookmarks(Vec<Bookmark>),
    /// The loop driving commands should exit
    Quit,
}

impl Command {
    pub fn add(bookmark: NewBookmark) -> Self {
        Command::Add {
            bookmark,
            timestamp: None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateSchema => "create-schema",
            Command::Add { .. } => "add",
            Command::List { .. } => "list",
            Command::Delete { .. } => "delete",
            Command::Edit(_) => "edit",
            Command::ImportStars(_) => "import-stars",
            Command::Quit => "quit",
        }
    }

    /// Run the command. Errors are passed through untouched for the caller to present.
    pub async fn execute(self, ctx: &CommandContext<'_>) -> Result<Outcome> {
        debug!("Executing {}", self.name());

        match self {
            Command::CreateSchema => {
                bookmarks::create_schema(ctx.store)?;
                Ok(Outcome::Done)
            }
            Command::Add {
                bookmark,
                timestamp,
            } => {
                bookmarks::add(ctx.store, &bookmark, timestamp)?;
                Ok(Outcome::Status("Bookmark added!".into()))
            }
            Command::List { order_by } => {
                Ok(Outcome::Bookmarks(bookmarks::list(ctx.store, order_by)?))
            }
            Command::Delete { id } => {
                bookmarks::delete(ctx.store, id)?;
                Ok(Outcome::Status("Bookmark deleted!".into()))
            }
            Command::Edit(EditRequest { id, update }) => {
                bookmarks::edit(ctx.store, id, &update)?;
                Ok(Outcome::Status("Bookmark updated!".into()))
            }
            Command::ImportStars(request) => {
                let summary = StarsImporter::new(ctx.stars, ctx.store).run(&request).await?;
                Ok(Outcome::Status(summary.message()))
            }
            Command::Quit => Ok(Outcome::Quit),
        }
    }
}
