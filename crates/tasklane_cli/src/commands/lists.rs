//! `tasklane lists` subcommands.

use anyhow::Result;
use tasklane_client::{CreateListRequest, TodoApi, UpdateListRequest};
use tasklane_core::{item, validate};

use crate::cli::ListsAction;
use crate::output;

pub async fn handle(base_url: Option<String>, action: ListsAction) -> Result<()> {
    let config = super::runtime_config(base_url);
    let api = super::client(&config);
    match action {
        ListsAction::List => list(api.as_ref()).await,
        ListsAction::Create { name } => create(api.as_ref(), &name).await,
        ListsAction::Rename { list_id, name } => rename(api.as_ref(), &list_id, &name).await,
        ListsAction::Delete { list_id } => delete(api.as_ref(), &list_id).await,
    }
}

async fn list(api: &dyn TodoApi) -> Result<()> {
    let spinner = output::spinner("Fetching lists...");
    let lists = match api.list_lists().await {
        Ok(lists) => {
            spinner.finish_and_clear();
            lists
        }
        Err(e) => {
            output::spinner_error(&spinner, "Failed to fetch lists");
            return Err(e.into());
        }
    };

    if output::is_json() {
        output::data("lists", &lists);
        return Ok(());
    }

    if lists.is_empty() {
        output::dim("No lists yet. Create one with: tasklane lists create <name>");
        return Ok(());
    }

    output::header("Todo Lists");
    let mut table = output::table(&["Name", "Id", "Items", "Updated"]);
    for list in &lists {
        // The collection read may omit items; show a dash rather than zero.
        let items = if list.items.is_empty() {
            "-".to_string()
        } else {
            format!(
                "{}/{}",
                item::completed_count(&list.items),
                list.items.len()
            )
        };
        table.add_row(vec![
            comfy_table::Cell::new(&list.name).fg(comfy_table::Color::Green),
            comfy_table::Cell::new(&list.id),
            comfy_table::Cell::new(items),
            comfy_table::Cell::new(list.updated_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn create(api: &dyn TodoApi, name: &str) -> Result<()> {
    validate::list_name(name)?;
    let list = api
        .create_list(CreateListRequest {
            name: name.trim().to_string(),
        })
        .await?;
    output::success(&format!("Created list '{}' ({})", list.name, list.id));
    Ok(())
}

async fn rename(api: &dyn TodoApi, list_id: &str, name: &str) -> Result<()> {
    validate::list_name(name)?;
    let list = api
        .update_list(
            list_id,
            UpdateListRequest {
                name: Some(name.trim().to_string()),
            },
        )
        .await?;
    output::success(&format!("Renamed list {} to '{}'", list_id, list.name));
    Ok(())
}

async fn delete(api: &dyn TodoApi, list_id: &str) -> Result<()> {
    api.delete_list(list_id).await?;
    output::success(&format!("Deleted list {}", list_id));
    Ok(())
}
