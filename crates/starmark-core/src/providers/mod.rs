// Provider implementations for stars sources
pub mod github;

pub use github::GitHubStarsSource;
