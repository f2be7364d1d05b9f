mod common;

use common::{client, item, screen, Item};
use console_framework::mock::MockTransport;
use console_framework::{
    ConsoleConfig, Field, GatewayError, Method, MultiRelationSelector, ResourceGateway,
    ResourceId, SingleRelationSelector,
};
use serde_json::json;
use std::sync::{Arc, Mutex};

const CANDIDATES: &str = "/items?page=1&limit=1000";

fn candidate_page() -> serde_json::Value {
    json!({
        "data": [item(1, "a"), item(12, "b"), item(21, "c"), item(3, "d")],
        "total": 4,
        "page": 1,
        "limit": 1000,
    })
}

fn gateway(mock: &MockTransport) -> ResourceGateway<Item> {
    let (client, _) = client(Arc::new(mock.clone()), &ConsoleConfig::default(), "/kits");
    ResourceGateway::new(client)
}

fn ids(records: Vec<&Item>) -> Vec<ResourceId> {
    records.into_iter().map(|r| r.id).collect()
}

#[tokio::test]
async fn filter_matches_id_substring() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, CANDIDATES).return_json(200, candidate_page());
    let mut selector = MultiRelationSelector::new(gateway(&mock), 1000, Vec::new(), |_| {});
    selector.load().await;

    selector.set_filter_text("1");
    assert_eq!(ids(selector.visible_candidates()), vec![1, 12, 21]);

    selector.set_filter_text(" 2 ");
    assert_eq!(selector.candidates().filter_text(), "2");
    assert_eq!(ids(selector.visible_candidates()), vec![12, 21]);

    selector.set_filter_text("");
    assert_eq!(selector.visible_candidates().len(), 4);
}

#[tokio::test]
async fn selection_survives_filtering_and_keeps_order() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, CANDIDATES).return_json(200, candidate_page());
    let mut selector = MultiRelationSelector::new(gateway(&mock), 1000, vec![21], |_| {});
    selector.load().await;

    assert!(selector.toggle_selection(3));
    assert!(selector.toggle_selection(1));
    selector.set_filter_text("12");
    assert_eq!(ids(selector.visible_candidates()), vec![12]);

    // Selected ids stay selected while hidden by the filter.
    assert_eq!(selector.selection().ids(), &[21, 3, 1]);
    assert!(selector.is_selected(3));

    selector.remove(3);
    assert_eq!(selector.selection().ids(), &[21, 1]);
}

#[tokio::test]
async fn chips_resolve_loaded_records() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, CANDIDATES).return_json(200, candidate_page());
    let mut selector = MultiRelationSelector::new(gateway(&mock), 1000, vec![12, 99], |_| {});
    selector.load().await;

    let chips = selector.chips();
    assert_eq!(chips.len(), 2);
    assert_eq!(chips[0].record.map(|r| r.name.as_str()), Some("b"));
    assert_eq!(chips[1].id, 99);
    assert!(chips[1].record.is_none());
}

#[tokio::test]
async fn every_change_is_reported() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, CANDIDATES).return_json(200, candidate_page());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let mut selector = MultiRelationSelector::new(gateway(&mock), 1000, Vec::new(), move |ids| {
        sink.lock().unwrap().push(ids.to_vec());
    });
    selector.load().await;

    selector.toggle_selection(12);
    selector.toggle_selection(1);
    selector.toggle_selection(12);
    // Removing an id that is not selected changes nothing.
    selector.remove(42);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![vec![12], vec![12, 1], vec![1]]
    );
}

#[tokio::test]
async fn candidates_load_once() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, CANDIDATES).return_json(200, candidate_page());
    let mut selector = MultiRelationSelector::new(gateway(&mock), 1000, Vec::new(), |_| {});

    selector.load().await;
    selector.load().await;
    assert!(selector.candidates().is_loaded());
    assert_eq!(selector.candidates().all().len(), 4);
    assert_eq!(mock.count(Method::Get), 1);
}

#[tokio::test]
async fn failed_load_leaves_selector_usable() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, CANDIDATES)
        .return_err(GatewayError::Network("connection refused".into()));
    let mut selector = MultiRelationSelector::new(gateway(&mock), 1000, vec![5], |_| {});

    selector.load().await;
    assert!(selector.visible_candidates().is_empty());
    assert!(selector.toggle_selection(6));
    assert_eq!(selector.selection().ids(), &[5, 6]);
}

#[tokio::test]
async fn single_selector_replaces_and_clears() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, CANDIDATES).return_json(200, candidate_page());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let mut selector = SingleRelationSelector::new(gateway(&mock), 1000, Some(3), move |id| {
        sink.lock().unwrap().push(id);
    });
    selector.load().await;
    assert_eq!(selector.selected_record().map(|r| r.name.as_str()), Some("d"));

    selector.set_filter_text("2");
    selector.set_selection(Some(21));
    assert_eq!(selector.selection(), Some(21));
    selector.set_selection(None);
    assert!(selector.selected_record().is_none());

    assert_eq!(*seen.lock().unwrap(), vec![Some(21), None]);
}

#[tokio::test]
async fn selection_flows_into_the_open_draft() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, CANDIDATES).return_json(200, candidate_page());
    let form = Arc::new(screen(&mock));
    form.open_create();

    let draft = form.clone();
    let mut kits = MultiRelationSelector::new(gateway(&mock), 1000, Vec::new(), move |ids| {
        draft.update_draft(|d| d.kit_ids = Field::Value(ids.to_vec()));
    });
    kits.load().await;
    kits.toggle_selection(21);
    kits.toggle_selection(1);

    let editor = form.view().editor.expect("editor open");
    assert_eq!(editor.draft.kit_ids, Field::Value(vec![21, 1]));
}
