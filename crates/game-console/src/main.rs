//! Headless walkthrough of the admin console.
//!
//! Without `CONSOLE_API_URL` the console runs against the in-process backend seeded with demo
//! data; with it, against the real API using `CONSOLE_USERNAME` / `CONSOLE_PASSWORD`.

use console_framework::backend::BackendHandle;
use console_framework::tracing::setup_tracing;
use console_framework::{ConsoleConfig, Field, MemoryNavigator, Navigator};
use game_console::model::{Admin, Kit, ShopItem, User};
use game_console::{AppError, Console};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    setup_tracing();

    let config = ConsoleConfig::from_env()?;
    let navigator = Arc::new(MemoryNavigator::new(config.home_route()));
    let username = std::env::var("CONSOLE_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let password = std::env::var("CONSOLE_PASSWORD").unwrap_or_else(|_| "admin".to_string());

    let (console, backend) = if std::env::var("CONSOLE_API_URL").is_ok() {
        (Console::connect(config, navigator.clone())?, None)
    } else {
        let (console, backend) =
            Console::in_process(config, navigator.clone(), &username, &password);
        seed_demo_data(&backend).await?;
        (console, Some(backend))
    };

    console.bootstrap().await;
    info!(path = %navigator.current_path(), "After bootstrap");

    console.login(&username, &password).await?;
    info!(path = %navigator.current_path(), "Signed in");

    let span = tracing::info_span!("users_screen");
    async { browse_users(&console).await }.instrument(span).await?;

    let span = tracing::info_span!("shop_screen");
    async { create_shop_item(&console).await }
        .instrument(span)
        .await?;

    let span = tracing::info_span!("admins_screen");
    async { try_delete_system_admin(&console).await }
        .instrument(span)
        .await?;

    console.logout().await;
    info!(path = %navigator.current_path(), "Signed out");

    drop(backend);
    console.shutdown().await?;
    info!("Walkthrough completed successfully");
    Ok(())
}

async fn seed_demo_data(backend: &BackendHandle) -> Result<(), AppError> {
    for n in 1..=25 {
        backend
            .seed(
                "users",
                json!({ "username": format!("player{n:02}"), "level": n, "coins": n * 100 }),
            )
            .await?;
    }
    for (name, templates) in [("Starter", vec![1, 2]), ("Raider", vec![3])] {
        backend
            .seed("kits", json!({ "name": name, "templateIds": templates }))
            .await?;
    }
    info!("Demo data seeded");
    Ok(())
}

async fn browse_users(console: &Console) -> Result<(), AppError> {
    let users = console.screen::<User>();
    users.mount().await?;
    let view = users.view();
    info!(total = view.total, pages = view.total_pages, "Users listed");

    while users.next_page().await? {}
    info!(page = users.view().page_number, "Reached last page");

    users.set_query("7").await?;
    users.submit_search().await?;
    if let Some(row) = users.view().rows.first() {
        info!(id = row.record.id, username = %row.record.username, "Found user");
    }
    users.set_query("").await?;
    Ok(())
}

async fn create_shop_item(console: &Console) -> Result<(), AppError> {
    let items = Arc::new(console.screen::<ShopItem>());
    items.mount().await?;
    items.open_create();

    let mut kits = console.multi_selector::<Kit, _, _>(&items, Vec::new(), |draft, ids| {
        draft.kit_ids = Field::Value(ids);
    });
    kits.load().await;
    let offered: Vec<_> = kits.visible_candidates().iter().map(|k| k.id).collect();
    for kit in offered {
        kits.toggle_selection(kit);
    }

    items.update_draft(|draft| {
        draft.name = Field::Value("Golden Sword".to_string());
        draft.price = Field::Value(250);
    });
    items.attach(ShopItem::image_attachment(
        "golden-sword.png",
        "image/png",
        vec![0x89, b'P', b'N', b'G'],
    ));
    items.submit_editor().await?;

    for row in items.view().rows {
        info!(id = row.record.id, name = %row.record.name, kits = ?row.record.kit_ids, image = ?row.record.image, "Shop item");
    }
    Ok(())
}

async fn try_delete_system_admin(console: &Console) -> Result<(), AppError> {
    let admins = console.screen::<Admin>();
    admins.mount().await?;
    let Some(row) = admins.view().rows.into_iter().find(|r| !r.can_delete) else {
        return Ok(());
    };
    if let Err(e) = admins.request_delete(&row.record) {
        warn!(error = %e, "Delete refused");
    }
    admins.dismiss_error();
    Ok(())
}
