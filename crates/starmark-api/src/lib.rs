// GitHub REST client - just the starred-repositories slice of it
pub mod github;

// Re-export common types
pub use github::{parse_next_link, GitHubClient, DEFAULT_API_URL, GitHubError, StarredEntry, StarredPage, StarredRepo};
