// Menu-driven loop: pick an option, answer a few prompts, see the result
use dialoguer::{Confirm, Input, Select};
use starmark_core::{
    BookmarkField, Command, CommandContext, EditRequest, ImportRequest, NewBookmark, Outcome,
};
use std::collections::BTreeMap;

use crate::output;

/// Menu entries: key, label
const OPTIONS: &[(char, &str)] = &[
    ('A', "Add a bookmark"),
    ('B', "List bookmarks by date"),
    ('T', "List bookmarks by title"),
    ('E', "Edit a bookmark"),
    ('D', "Delete a bookmark"),
    ('G', "Import GitHub stars"),
    ('Q', "Quit"),
];

const EDITABLE: [BookmarkField; 3] = [BookmarkField::Title, BookmarkField::Url, BookmarkField::Notes];

/// Run until the user picks Quit. Command failures are shown and the loop carries on.
pub async fn run(ctx: &CommandContext<'_>) -> anyhow::Result<()> {
    let labels: Vec<String> = OPTIONS
        .iter()
        .map(|(key, label)| format!("({}) {}", key, label))
        .collect();

    loop {
        println!();
        let choice = Select::new()
            .with_prompt("Choose an option")
            .items(&labels)
            .default(0)
            .interact()?;

        let command = command_for(OPTIONS[choice].0)?;

        match command.execute(ctx).await {
            Ok(Outcome::Quit) => break,
            Ok(outcome) => output::render(&outcome, false)?,
            Err(e) => eprintln!("• {}", e),
        }
    }

    Ok(())
}

fn command_for(key: char) -> anyhow::Result<Command> {
    let command = match key {
        'A' => Command::add(prompt_bookmark()?),
        'B' => Command::List {
            order_by: BookmarkField::DateAdded,
        },
        'T' => Command::List {
            order_by: BookmarkField::Title,
        },
        'E' => Command::Edit(prompt_edit()?),
        'D' => Command::Delete {
            id: prompt_id("Enter a bookmark ID to delete")?,
        },
        'G' => Command::ImportStars(prompt_import()?),
        _ => Command::Quit,
    };
    Ok(command)
}

fn prompt_bookmark() -> anyhow::Result<NewBookmark> {
    let title: String = Input::new().with_prompt("Title").interact_text()?;
    let url: String = Input::new().with_prompt("URL").interact_text()?;
    let notes: String = Input::new()
        .with_prompt("Notes (optional)")
        .allow_empty(true)
        .interact_text()?;

    Ok(NewBookmark {
        title,
        url,
        notes: Some(notes).filter(|n| !n.trim().is_empty()),
    })
}

fn prompt_id(prompt: &str) -> anyhow::Result<i64> {
    Ok(Input::<i64>::new().with_prompt(prompt).interact_text()?)
}

fn prompt_edit() -> anyhow::Result<EditRequest> {
    let id = prompt_id("Enter a bookmark ID to edit")?;
    let mut update = BTreeMap::new();

    loop {
        let fields: Vec<&str> = EDITABLE.iter().map(|f| f.column()).collect();
        let picked = Select::new()
            .with_prompt("Choose a value to edit")
            .items(&fields)
            .default(0)
            .interact()?;

        let value: String = Input::new()
            .with_prompt(format!("New value for {}", fields[picked]))
            .allow_empty(true)
            .interact_text()?;
        update.insert(EDITABLE[picked], value);

        if !Confirm::new()
            .with_prompt("Edit another field?")
            .default(false)
            .interact()?
        {
            break;
        }
    }

    Ok(EditRequest { id, update })
}

fn prompt_import() -> anyhow::Result<ImportRequest> {
    let account: String = Input::new().with_prompt("GitHub username").interact_text()?;
    let preserve_remote_timestamps = Confirm::new()
        .with_prompt("Preserve timestamps of original stars?")
        .default(true)
        .interact()?;

    Ok(ImportRequest {
        account,
        preserve_remote_timestamps,
    })
}
