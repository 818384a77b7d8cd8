// Presentation of command outcomes
use starmark_core::{Bookmark, Outcome};

pub fn render(outcome: &Outcome, json: bool) -> anyhow::Result<()> {
    match outcome {
        Outcome::Done | Outcome::Quit => {}
        Outcome::Status(message) => println!("{}", message),
        Outcome::Bookmarks(bookmarks) if json => {
            println!("{}", serde_json::to_string_pretty(bookmarks)?);
        }
        Outcome::Bookmarks(bookmarks) => print!("{}", format_bookmarks(bookmarks)),
    }
    Ok(())
}

pub fn format_bookmarks(bookmarks: &[Bookmark]) -> String {
    if bookmarks.is_empty() {
        return "No bookmarks yet.\n".to_string();
    }

    let mut out = String::new();
    for b in bookmarks {
        out.push_str(&format!("{:>4}  {}  {}\n      {}\n", b.id, b.date_added, b.title, b.url));
        if let Some(notes) = b.notes.as_deref().filter(|n| !n.is_empty()) {
            out.push_str(&format!("      {}\n", notes));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bookmarks() {
        let bookmarks = vec![
            Bookmark {
                id: 1,
                title: "Rust".into(),
                url: "https://rust-lang.org".into(),
                notes: None,
                date_added: "2020-01-02T03:04:05.000000Z".into(),
            },
            Bookmark {
                id: 12,
                title: "Tokio".into(),
                url: "https://tokio.rs".into(),
                notes: Some("async runtime".into()),
                date_added: "2021-01-02T03:04:05.000000Z".into(),
            },
        ];

        let text = format_bookmarks(&bookmarks);
        assert!(text.starts_with("   1  2020-01-02T03:04:05.000000Z  Rust\n"));
        assert!(text.contains("  12  2021-01-02T03:04:05.000000Z  Tokio\n      https://tokio.rs\n      async runtime\n"));
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_bookmarks(&[]), "No bookmarks yet.\n");
    }
}
