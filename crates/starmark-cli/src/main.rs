use anyhow::Context;
use clap::Parser;
use starmark_core::{
    providers::GitHubStarsSource, BookmarkField, Command, CommandContext, Config, EditRequest,
    ImportRequest, NewBookmark,
};
use starmark_store::SqliteStore;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod interactive;
mod output;

#[derive(Parser)]
#[command(name = "starmark")]
#[command(version, about = "Personal bookmark manager that can import your GitHub stars", long_about = None)]
struct Cli {
    /// SQLite database file (overrides the config file)
    #[arg(long, global = true, env = "STARMARK_DB")]
    db: Option<PathBuf>,

    /// Read this config file instead of the default one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create the bookmarks table
    Init,
    /// Add a bookmark
    Add {
        title: String,
        url: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List bookmarks
    List {
        /// id, title, url, notes or date_added
        #[arg(long, value_parser = parse_field)]
        order_by: Option<BookmarkField>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a bookmark by id
    Delete { id: i64 },
    /// Change fields of a bookmark
    Edit {
        id: i64,
        /// field=value, repeatable; an empty notes value clears the notes
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true, value_parser = parse_assignment)]
        set: Vec<(BookmarkField, String)>,
    },
    /// Import the public stars of a GitHub account
    ImportStars {
        account: String,
        /// Use the time each repo was starred as its date_added
        #[arg(long)]
        preserve_timestamps: bool,
    },
    /// Print the effective configuration
    Config {
        /// Also write it to the config file
        #[arg(long)]
        save: bool,
    },
    /// Menu-driven mode (default)
    Interactive,
}

/// A parsed subcommand that needs the database
enum Action {
    Interactive,
    Init,
    /// The command plus whether to print JSON
    Run(Command, bool),
}

fn parse_field(s: &str) -> Result<BookmarkField, String> {
    s.parse().map_err(|e: starmark_core::Error| e.to_string())
}

fn parse_assignment(s: &str) -> Result<(BookmarkField, String), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got {:?}", s))?;
    Ok((parse_field(field)?, value.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - stderr, so list output stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "starmark=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(db) = cli.db {
        config.database.path = Some(db);
    }

    // Decide what to run before touching the database
    let action = match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Config { save } => {
            print!("{}", config.to_toml()?);
            if save {
                let path = match &cli.config {
                    Some(path) => path.clone(),
                    None => Config::config_path()?,
                };
                config.save_to(&path)?;
                eprintln!("Saved to {}", path.display());
            }
            return Ok(());
        }
        Commands::Interactive => Action::Interactive,
        Commands::Init => Action::Init,
        Commands::Add { title, url, notes } => {
            Action::Run(Command::add(NewBookmark { title, url, notes }), false)
        }
        Commands::List { order_by, json } => Action::Run(
            Command::List {
                order_by: order_by.unwrap_or(config.list.order_by),
            },
            json,
        ),
        Commands::Delete { id } => Action::Run(Command::Delete { id }, false),
        Commands::Edit { id, set } => Action::Run(
            Command::Edit(EditRequest {
                id,
                update: set.into_iter().collect(),
            }),
            false,
        ),
        Commands::ImportStars {
            account,
            preserve_timestamps,
        } => Action::Run(
            Command::ImportStars(ImportRequest {
                account,
                preserve_remote_timestamps: preserve_timestamps,
            }),
            false,
        ),
    };

    let db_path = config.database.resolved_path()?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Could not create {}", parent.display()))?;
    }
    tracing::debug!("Using database {}", db_path.display());

    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("Could not open {}", db_path.display()))?;
    let stars = GitHubStarsSource::new(&config.github)?;
    let ctx = CommandContext::new(&store, &stars);

    // Every run makes sure the table exists before doing anything else
    Command::CreateSchema.execute(&ctx).await?;

    let (command, json) = match action {
        Action::Interactive => return interactive::run(&ctx).await,
        Action::Init => {
            println!("Bookmarks table ready at {}", db_path.display());
            return Ok(());
        }
        Action::Run(command, json) => (command, json),
    };

    tracing::info!("Running {}", command.name());
    let outcome = command.execute(&ctx).await?;
    output::render(&outcome, json)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("title=Rust Book").unwrap(),
            (BookmarkField::Title, "Rust Book".to_string())
        );
        // Only the first '=' splits
        assert_eq!(
            parse_assignment("url=https://x.test/?a=b").unwrap(),
            (BookmarkField::Url, "https://x.test/?a=b".to_string())
        );
        assert!(parse_assignment("title").is_err());
        assert!(parse_assignment("colour=red").is_err());
    }

    #[test]
    fn test_edit_requires_a_change() {
        assert!(Cli::try_parse_from(["starmark", "edit", "3"]).is_err());

        let cli = Cli::try_parse_from(["starmark", "edit", "3", "--set", "notes=later"]).unwrap();
        match cli.command {
            Some(Commands::Edit { id, set }) => {
                assert_eq!(id, 3);
                assert_eq!(set, vec![(BookmarkField::Notes, "later".to_string())]);
            }
            _ => panic!("expected edit"),
        }
    }

    #[test]
    fn test_config_save_flag() {
        let cli = Cli::try_parse_from(["starmark", "config", "--save"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config { save: true })));

        let cli = Cli::try_parse_from(["starmark", "config"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config { save: false })));
    }

    #[test]
    fn test_import_flags() {
        let cli = Cli::try_parse_from(["starmark", "import-stars", "octocat", "--preserve-timestamps"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::ImportStars { ref account, preserve_timestamps: true }) if account == "octocat"
        ));
    }
}
