//! Integration tests for the initial inventory fetch.
//!
//! The app starts on the inventory route and should dispatch a refresh on
//! its own; these tests drive the app against a mock service and verify
//! the fetched rows reach both the compute cache and the rendered table.

mod common;

use crate::common::{DEFAULT_NETWORK_WAIT_MS, TestCtx, yield_wait_for_network};
use cardledger_business::inventory::InventoryCompute;
use kittest::Queryable;

#[tokio::test]
async fn inventory_is_fetched_automatically_on_startup() {
    let mut ctx = TestCtx::new_app().await;
    let harness = ctx.harness_mut();

    // A few frames for the idle check to dispatch the refresh.
    for _ in 0..5 {
        harness.step();
    }

    yield_wait_for_network(DEFAULT_NETWORK_WAIT_MS).await;

    {
        let app = harness.state_mut();
        app.state_mut().ctx.sync_computes();
    }
    for _ in 0..5 {
        harness.step();
    }

    let app = harness.state();
    let compute = app
        .state()
        .ctx
        .cached::<InventoryCompute>()
        .expect("InventoryCompute should be registered");
    assert!(
        !compute.is_idle(),
        "startup should have dispatched the inventory refresh"
    );
    let items = compute.items().expect("inventory should be loaded");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].sku, "MH2-0123-NM");
}

#[tokio::test]
async fn fetched_inventory_rows_are_displayed_in_the_table() {
    let mut ctx = TestCtx::new_app().await;
    let harness = ctx.harness_mut();

    for _ in 0..5 {
        harness.step();
    }

    yield_wait_for_network(DEFAULT_NETWORK_WAIT_MS).await;

    {
        let app = harness.state_mut();
        app.state_mut().ctx.sync_computes();
    }
    for _ in 0..10 {
        harness.step();
        yield_wait_for_network(DEFAULT_NETWORK_WAIT_MS).await;
    }

    assert!(
        harness
            .query_by_label_contains("Ragavan, Nimble Pilferer")
            .is_some(),
        "first inventory row should be rendered"
    );
    assert!(
        harness
            .query_by_label_contains("The Wandering Emperor")
            .is_some(),
        "second inventory row should be rendered"
    );
    assert!(
        harness.query_by_label_contains("2 items").is_some(),
        "the toolbar should report the loaded row count"
    );
}

#[tokio::test]
async fn fetch_error_is_surfaced_with_a_retry_button() {
    let mut ctx = TestCtx::new_app_with_list_status(500).await;

    let harness = ctx.harness_mut();
    for _ in 0..5 {
        harness.step();
    }
    yield_wait_for_network(DEFAULT_NETWORK_WAIT_MS).await;
    {
        let app = harness.state_mut();
        app.state_mut().ctx.sync_computes();
    }
    for _ in 0..5 {
        harness.step();
    }

    let app = harness.state();
    let compute = app
        .state()
        .ctx
        .cached::<InventoryCompute>()
        .expect("InventoryCompute should be registered");
    assert!(
        compute.error_message().is_some(),
        "a 500 response should surface as an error"
    );
    assert!(
        harness.query_by_label("Retry").is_some(),
        "the error strip should offer a retry"
    );
}
