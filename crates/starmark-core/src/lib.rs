// Core business logic lives here - commands, bookmarks and the stars import
pub mod bookmarks;
pub mod command;
pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod providers;
pub mod stars;

pub use command::{Command, CommandContext, Outcome};
pub use config::Config;
pub use error::Error;
pub use import::{ImportSummary, StarsImporter};
pub use models::{Bookmark, BookmarkField, EditRequest, ImportRequest, NewBookmark};
pub use stars::{StarredItem, StarsPage, StarsSource};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
