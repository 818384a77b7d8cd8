use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, LINK, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Public GitHub; Enterprise installs live elsewhere
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Media type that makes GitHub wrap each starred repo as `{starred_at, repo}`
pub const STAR_MEDIA_TYPE: &str = "application/vnd.github.v3.star+json";

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GitHubError>;

pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
}

impl GitHubClient {
    /// Client rooted at `base_url`: usually `DEFAULT_API_URL`, else Enterprise or a test server
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        // GitHub rejects requests without a User-Agent
        headers.insert(USER_AGENT, HeaderValue::from_static("starmark/0.1.0"));
        headers.insert(ACCEPT, HeaderValue::from_static(STAR_MEDIA_TYPE));

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// First page of an account's stars; later pages come from the `Link` header
    pub fn starred_url(&self, account: &str, per_page: u32) -> String {
        format!(
            "{}/users/{}/starred?per_page={}",
            self.base_url,
            urlencoding::encode(account),
            per_page
        )
    }

    /// Fetch a single page of starred repositories
    ///
    /// Anonymous access only. No retries: any failure is returned as-is and
    /// the caller decides what a half-finished walk means.
    pub async fn fetch_starred_page(&self, url: &str) -> Result<StarredPage> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == 404 {
            return Err(GitHubError::NotFound(url.to_string()));
        }

        if status == 429 || (status == 403 && rate_limit_exhausted(response.headers())) {
            return Err(GitHubError::RateLimitExceeded);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let next = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_next_link);

        // Read as text first so a malformed page shows up as a ParseError
        let body = response.text().await?;
        let entries: Vec<StarredEntry> = serde_json::from_str(&body)?;
        debug!("Page had {} entries, next: {:?}", entries.len(), next);

        Ok(StarredPage { entries, next })
    }
}

fn rate_limit_exhausted(headers: &HeaderMap) -> bool {
    headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim() == "0")
        .unwrap_or(false)
}

/// Pull the `rel="next"` target out of an RFC 8288 `Link` header
///
/// `<https://api.github.com/user/1/starred?page=2>; rel="next", <...>; rel="last"`
pub fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|link| {
        let mut parts = link.split(';');
        let target = parts.next()?.trim();
        let url = target.strip_prefix('<')?.strip_suffix('>')?;

        let is_next = parts.any(|param| {
            param
                .trim()
                .strip_prefix("rel=")
                .map(|rel| rel.trim_matches('"').split_whitespace().any(|r| r == "next"))
                .unwrap_or(false)
        });

        is_next.then(|| url.to_string())
    })
}

/// One page of the stars listing plus the cursor to the next one
#[derive(Debug, Clone)]
pub struct StarredPage {
    pub entries: Vec<StarredEntry>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarredEntry {
    /// `YYYY-MM-DDTHH:MM:SSZ`, left as text for the caller to parse
    pub starred_at: String,
    pub repo: StarredRepo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarredRepo {
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const PAGE: &str = r#"[
        {
            "starred_at": "2020-01-02T03:04:05Z",
            "repo": {
                "id": 1,
                "name": "ripgrep",
                "full_name": "BurntSushi/ripgrep",
                "html_url": "https://github.com/BurntSushi/ripgrep",
                "description": "fast grep",
                "stargazers_count": 40000
            }
        },
        {
            "starred_at": "2021-06-07T08:09:10Z",
            "repo": {
                "name": "dotfiles",
                "html_url": "https://github.com/someone/dotfiles",
                "description": null
            }
        }
    ]"#;

    /// Answer exactly one HTTP request with a canned response, handing back what was asked
    async fn serve_once(status: &'static str, headers: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n{}\r\n{}",
                status,
                body.len(),
                headers,
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;

            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}", addr), handle)
    }

    #[test]
    fn test_parse_next_link() {
        let header = r#"<https://api.github.com/user/1/starred?page=2>; rel="next", <https://api.github.com/user/1/starred?page=9>; rel="last""#;
        assert_eq!(
            parse_next_link(header).as_deref(),
            Some("https://api.github.com/user/1/starred?page=2")
        );
    }

    #[test]
    fn test_parse_next_link_absent_on_last_page() {
        let header = r#"<https://api.github.com/user/1/starred?page=1>; rel="first", <https://api.github.com/user/1/starred?page=8>; rel="prev""#;
        assert_eq!(parse_next_link(header), None);
        assert_eq!(parse_next_link(""), None);
    }

    #[test]
    fn test_starred_url() {
        let client = GitHubClient::with_base_url("https://ghe.example.com/api/v3/").unwrap();
        assert_eq!(
            client.starred_url("octocat", 100),
            "https://ghe.example.com/api/v3/users/octocat/starred?per_page=100"
        );
    }

    #[test]
    fn test_deserialize_star_entries() {
        let entries: Vec<StarredEntry> = serde_json::from_str(PAGE).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].repo.name, "ripgrep");
        assert_eq!(entries[0].starred_at, "2020-01-02T03:04:05Z");
        assert_eq!(entries[1].repo.description, None);
    }

    #[tokio::test]
    async fn test_fetch_page_follows_link_header() {
        let (base, server) = serve_once(
            "200 OK",
            "link: <http://127.0.0.1:1/next?page=2>; rel=\"next\"\r\n",
            PAGE,
        )
        .await;

        let client = GitHubClient::with_base_url(&base).unwrap();
        let page = client
            .fetch_starred_page(&client.starred_url("octocat", 2))
            .await
            .unwrap();

        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.next.as_deref(), Some("http://127.0.0.1:1/next?page=2"));

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /users/octocat/starred?per_page=2 "));
        assert!(request.contains("accept: application/vnd.github.v3.star+json"));
    }

    #[tokio::test]
    async fn test_fetch_page_without_link_is_last() {
        let (base, server) = serve_once("200 OK", "", "[]").await;
        let client = GitHubClient::with_base_url(&base).unwrap();

        let page = client.fetch_starred_page(&base).await.unwrap();
        assert!(page.entries.is_empty());
        assert!(page.next.is_none());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_page_error_statuses() {
        let (base, _server) = serve_once("404 Not Found", "", "{}").await;
        let client = GitHubClient::with_base_url(&base).unwrap();
        let err = client.fetch_starred_page(&base).await.unwrap_err();
        assert!(matches!(err, GitHubError::NotFound(_)));

        let (base, _server) = serve_once("403 Forbidden", "x-ratelimit-remaining: 0\r\n", "{}").await;
        let err = client.fetch_starred_page(&base).await.unwrap_err();
        assert!(matches!(err, GitHubError::RateLimitExceeded));

        let (base, _server) = serve_once("500 Internal Server Error", "", "boom").await;
        let err = client.fetch_starred_page(&base).await.unwrap_err();
        assert!(matches!(err, GitHubError::RequestFailed(_)));
    }

    #[tokio::test]
    async fn test_fetch_page_rejects_plain_repo_listing() {
        // Without the star media type GitHub returns bare repos, which we can't use
        let (base, _server) = serve_once("200 OK", "", r#"[{"name": "x", "html_url": "y"}]"#).await;
        let client = GitHubClient::with_base_url(&base).unwrap();

        let err = client.fetch_starred_page(&base).await.unwrap_err();
        assert!(matches!(err, GitHubError::ParseError(_)));
    }
}
