use console_framework::backend::BackendHandle;
use console_framework::{
    Access, ConsoleConfig, ErrorKind, Field, MemoryNavigator, Method, Navigator, Transport,
};
use game_console::model::{Admin, Clan, Kit, Setting, ShopItem, User, War, WarStatus};
use game_console::Console;
use serde_json::json;
use std::sync::Arc;

async fn signed_in() -> (Console, BackendHandle, Arc<MemoryNavigator>) {
    let navigator = Arc::new(MemoryNavigator::new("/users"));
    let (console, backend) =
        Console::in_process(ConsoleConfig::default(), navigator.clone(), "root", "secret");
    console.login("root", "secret").await.unwrap();
    (console, backend, navigator)
}

#[tokio::test]
async fn bootstrap_sends_anonymous_user_to_login_and_back_home() {
    let navigator = Arc::new(MemoryNavigator::new("/clans"));
    let (console, _backend) =
        Console::in_process(ConsoleConfig::default(), navigator.clone(), "root", "secret");

    assert_eq!(console.bootstrap().await, Access::Redirect("/login".to_string()));
    assert_eq!(navigator.current_path(), "/login");
    assert!(!console.session().redirect_pending());

    console.login("root", "secret").await.unwrap();
    assert_eq!(navigator.current_path(), "/");
}

#[tokio::test]
async fn users_paginate_to_three_pages() {
    let (console, backend, _) = signed_in().await;
    for n in 1..=25 {
        backend
            .seed("users", json!({"username": format!("u{n}"), "level": 1}))
            .await
            .unwrap();
    }
    let users = console.screen::<User>();
    users.mount().await.unwrap();
    assert_eq!(users.view().total_pages, 3);

    while users.next_page().await.unwrap() {}
    let view = users.view();
    assert_eq!(view.page_number, 3);
    assert_eq!(view.rows.len(), 5);

    let log = backend.requests().await.unwrap();
    assert!(log.iter().all(|(_, path)| !path.contains("page=4")));
}

#[tokio::test]
async fn shop_item_round_trip_with_kits_and_image() {
    let (console, backend, _) = signed_in().await;
    backend.seed("kits", json!({"name": "Starter"})).await.unwrap();
    backend.seed("kits", json!({"name": "Raider"})).await.unwrap();

    let items = Arc::new(console.screen::<ShopItem>());
    items.mount().await.unwrap();
    items.open_create();

    let mut kits = console.multi_selector::<Kit, _, _>(&items, Vec::new(), |draft, ids| {
        draft.kit_ids = Field::Value(ids);
    });
    kits.load().await;
    assert_eq!(kits.visible_candidates().len(), 2);
    kits.toggle_selection(2);

    items.update_draft(|d| {
        d.name = Field::Value("X".to_string());
        d.price = Field::Value(10);
    });
    items.attach(ShopItem::image_attachment("x.png", "image/png", vec![1, 2, 3]));
    assert!(items.submit_editor().await.unwrap());

    let view = items.view();
    assert_eq!(view.total, 1);
    let record = &view.rows[0].record;
    assert_eq!(record.name, "X");
    assert_eq!(record.price, 10);
    assert_eq!(record.currency, "coins");
    assert_eq!(record.kit_ids, vec![2]);
    assert_eq!(record.image.as_deref(), Some("uploads/x.png"));
}

#[tokio::test]
async fn numeric_looking_name_survives_an_image_upload() {
    let (console, _backend, _) = signed_in().await;
    let items = console.screen::<ShopItem>();
    items.mount().await.unwrap();

    items.open_create();
    items.update_draft(|d| {
        d.name = Field::Value("1984".to_string());
        d.price = Field::Value(5);
    });
    items.attach(ShopItem::image_attachment("1984.png", "image/png", vec![9]));
    assert!(items.submit_editor().await.unwrap());

    let view = items.view();
    assert!(view.editor.is_none());
    assert_eq!(view.total, 1);
    assert_eq!(view.rows[0].record.name, "1984");
    assert_eq!(view.rows[0].record.price, 5);
}

#[tokio::test]
async fn clan_editor_takes_leader_and_members_from_selectors() {
    let (console, backend, _) = signed_in().await;
    for name in ["ann", "bob", "cid"] {
        backend.seed("users", json!({"username": name})).await.unwrap();
    }
    let clan_id = backend
        .seed("clans", json!({"name": "Ravens", "tag": "RVN", "memberIds": [1]}))
        .await
        .unwrap();

    let clans = Arc::new(console.screen::<Clan>());
    clans.mount().await.unwrap();
    let clan = clans.view().rows[0].record.clone();
    clans.open_edit(&clan).unwrap();

    let mut members =
        console.multi_selector::<User, _, _>(&clans, clan.member_ids.clone(), |draft, ids| {
            draft.member_ids = Field::Value(ids);
        });
    let mut leader = console.single_selector::<User, _, _>(&clans, clan.leader_id, |draft, id| {
        draft.leader_id = Field::from_nullable(id);
    });
    members.load().await;
    leader.load().await;

    members.toggle_selection(3);
    members.remove(1);
    leader.set_selection(Some(3));
    assert!(clans.submit_editor().await.unwrap());

    let saved = console.gateway::<Clan>().get_by_id(clan_id).await.unwrap();
    assert_eq!(saved.member_ids, vec![3]);
    assert_eq!(saved.leader_id, Some(3));
    assert_eq!(saved.tag, "RVN");
}

#[tokio::test]
async fn clearing_a_nullable_relation_sends_null() {
    let (console, backend, _) = signed_in().await;
    let id = backend
        .seed(
            "wars",
            json!({"attackerClanId": 1, "defenderClanId": 2, "status": "finished", "winnerClanId": 2}),
        )
        .await
        .unwrap();

    let wars = console.screen::<War>();
    wars.mount().await.unwrap();
    let war = wars.view().rows[0].record.clone();
    assert_eq!(war.status, WarStatus::Finished);

    wars.open_edit(&war).unwrap();
    wars.update_draft(|d| {
        d.winner_clan_id = Field::Null;
        d.status = Field::Value(WarStatus::Active);
    });
    wars.submit_editor().await.unwrap();

    let saved = console.gateway::<War>().get_by_id(id).await.unwrap();
    assert_eq!(saved.winner_clan_id, None);
    assert_eq!(saved.status, WarStatus::Active);
    assert_eq!(saved.attacker_clan_id, 1);
}

#[tokio::test]
async fn system_admin_is_protected() {
    let (console, backend, _) = signed_in().await;
    let admins = console.screen::<Admin>();
    admins.mount().await.unwrap();

    let view = admins.view();
    let root = &view.rows[0];
    assert!(root.record.is_system);
    assert!(!root.can_delete && !root.can_edit);

    let err = admins.request_delete(&root.record).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        admins.view().error.as_deref(),
        Some("Admin \"root\" is a system account and cannot be modified")
    );

    let log = backend.requests().await.unwrap();
    assert!(log.iter().all(|(method, _)| *method != Method::Delete));
}

#[tokio::test]
async fn system_settings_refuse_edits_but_others_save() {
    let (console, backend, _) = signed_in().await;
    backend
        .seed("settings", json!({"key": "maintenance", "value": "off", "isSystem": true}))
        .await
        .unwrap();
    backend
        .seed("settings", json!({"key": "motd", "value": "hello"}))
        .await
        .unwrap();

    let settings = console.screen::<Setting>();
    settings.mount().await.unwrap();
    let rows = settings.view().rows;
    assert!(settings.open_edit(&rows[0].record).is_err());

    settings.open_edit(&rows[1].record).unwrap();
    settings.update_draft(|d| d.value = Field::Value("welcome".into()));
    assert!(settings.submit_editor().await.unwrap());
    assert_eq!(
        settings.view().rows[1].record.value.as_deref(),
        Some("welcome")
    );
}

#[tokio::test]
async fn expiry_redirects_once_and_login_recovers() {
    let (console, backend, navigator) = signed_in().await;
    backend.seed("kits", json!({"name": "Starter"})).await.unwrap();
    let kits = console.screen::<Kit>();
    let users = console.screen::<User>();
    kits.mount().await.unwrap();
    users.mount().await.unwrap();

    navigator.navigate("/kits");
    backend.expire_session().await.unwrap();
    let (a, b) = tokio::join!(kits.reload(), users.reload());
    assert!(a.is_err() && b.is_err());
    assert!(kits.view().error.is_none());
    assert_eq!(
        navigator.history().iter().filter(|p| *p == "/login").count(),
        1
    );

    console.login("root", "secret").await.unwrap();
    assert_eq!(navigator.current_path(), "/");
    kits.reload().await.unwrap();
    assert_eq!(kits.view().total, 1);
}

#[tokio::test]
async fn logout_returns_to_login() {
    let (console, backend, navigator) = signed_in().await;
    console.logout().await;
    assert_eq!(navigator.current_path(), "/login");
    assert!(!console.session().is_authenticated());

    let probe = backend
        .send(console_framework::ApiRequest::get("/admins/me"))
        .await
        .unwrap();
    assert_eq!(probe.status, 401);
}
