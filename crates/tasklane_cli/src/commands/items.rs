//! `tasklane items` subcommands.

use anyhow::Result;
use tasklane_client::{CreateItemRequest, TodoApi, UpdateItemRequest};
use tasklane_core::{item, validate, ItemStatus};
use tasklane_runtime::bridge;

use crate::cli::ItemsAction;
use crate::output;

pub async fn handle(base_url: Option<String>, action: ItemsAction) -> Result<()> {
    let config = super::runtime_config(base_url);
    let api = super::client(&config);
    match action {
        ItemsAction::List { list_id } => list(api.as_ref(), &list_id).await,
        ItemsAction::Add {
            list_id,
            title,
            description,
        } => add(api.as_ref(), &list_id, &title, description).await,
        ItemsAction::Edit {
            list_id,
            item_id,
            title,
            description,
        } => edit(api.as_ref(), &list_id, &item_id, title, description).await,
        ItemsAction::Done {
            list_id,
            item_id,
            undo,
        } => done(api.as_ref(), &list_id, &item_id, undo).await,
        ItemsAction::Delete { list_id, item_id } => {
            delete(api.as_ref(), &list_id, &item_id).await
        }
    }
}

async fn list(api: &dyn TodoApi, list_id: &str) -> Result<()> {
    let spinner = output::spinner("Fetching items...");
    let items = match api.list_items(list_id).await {
        Ok(items) => {
            spinner.finish_and_clear();
            items
        }
        Err(e) => {
            output::spinner_error(&spinner, "Failed to fetch items");
            return Err(e.into());
        }
    };

    if output::is_json() {
        output::data("items", &items);
        return Ok(());
    }

    if items.is_empty() {
        output::dim("No items yet. Add one with: tasklane items add <list-id> <title>");
        return Ok(());
    }

    let summary =
        bridge::completion_summary(item::completed_count(&items), items.len() as u64)
            .unwrap_or_default();
    output::header(&format!("Items ({})", summary));
    let mut table = output::table(&["", "Title", "Id"]);
    for item in &items {
        let checkbox = match item.status {
            ItemStatus::Pending => "[ ]",
            ItemStatus::Completed => "[x]",
        };
        let title = match &item.description {
            Some(description) => format!("{}  — {}", item.title, description),
            None => item.title.clone(),
        };
        table.add_row(vec![
            comfy_table::Cell::new(checkbox).fg(comfy_table::Color::Cyan),
            comfy_table::Cell::new(title),
            comfy_table::Cell::new(&item.id),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn add(
    api: &dyn TodoApi,
    list_id: &str,
    title: &str,
    description: Option<String>,
) -> Result<()> {
    validate::item_title(title)?;
    if let Some(description) = &description {
        validate::item_description(description)?;
    }
    let item = api
        .create_item(list_id, CreateItemRequest::new(title.trim(), description))
        .await?;
    output::success(&format!("Added '{}' ({})", item.title, item.id));
    Ok(())
}

async fn edit(
    api: &dyn TodoApi,
    list_id: &str,
    item_id: &str,
    title: Option<String>,
    description: Option<String>,
) -> Result<()> {
    if title.is_none() && description.is_none() {
        output::dim("Nothing to change; pass --title and/or --description.");
        return Ok(());
    }
    if let Some(title) = &title {
        validate::item_title(title)?;
    }
    if let Some(description) = &description {
        validate::item_description(description)?;
    }
    let item = api
        .update_item(
            list_id,
            item_id,
            UpdateItemRequest {
                title,
                description,
                status: None,
            },
        )
        .await?;
    output::success(&format!("Updated '{}'", item.title));
    Ok(())
}

async fn done(api: &dyn TodoApi, list_id: &str, item_id: &str, undo: bool) -> Result<()> {
    let status = if undo {
        ItemStatus::Pending
    } else {
        ItemStatus::Completed
    };
    let item = api
        .update_item(list_id, item_id, UpdateItemRequest::status(status))
        .await?;
    match status {
        ItemStatus::Completed => output::success(&format!("Completed '{}'", item.title)),
        ItemStatus::Pending => output::success(&format!("Reopened '{}'", item.title)),
    }
    Ok(())
}

async fn delete(api: &dyn TodoApi, list_id: &str, item_id: &str) -> Result<()> {
    api.delete_item(list_id, item_id).await?;
    output::success(&format!("Deleted item {}", item_id));
    Ok(())
}
