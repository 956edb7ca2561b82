//! Integration tests for recording a new transaction.
//!
//! The form fields are regular widgets, but typing through egui_kittest is
//! noisy; the tests fill the form state directly and then drive the Save
//! button, asserting on the POST body and the post-save navigation.

mod common;

use crate::common::{DEFAULT_NETWORK_WAIT_MS, TestCtx, yield_wait_for_network};
use cardledger_business::Route;
use cardledger_ui::pages::{LineDraft, NewTransactionForm};
use kittest::Queryable;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn filled_form() -> NewTransactionForm {
    NewTransactionForm {
        platform: "TCGplayer".to_owned(),
        occurred_on: "2026-02-10".parse().expect("valid date"),
        total_text: "$100.00".to_owned(),
        lines: vec![
            LineDraft {
                sku: "MH2-0123-NM".to_owned(),
                name: "Ragavan, Nimble Pilferer".to_owned(),
                quantity_text: "1".to_owned(),
                market_text: "60".to_owned(),
            },
            LineDraft {
                sku: "NEO-0211-LP".to_owned(),
                name: "The Wandering Emperor".to_owned(),
                quantity_text: "2".to_owned(),
                market_text: "20".to_owned(),
            },
        ],
        ..NewTransactionForm::default()
    }
}

#[tokio::test]
async fn saving_posts_the_allocated_request_and_returns_to_the_ledger() {
    let mut ctx = TestCtx::new_app().await;

    Mock::given(method("POST"))
        .and(path("/api/transactions"))
        .and(body_partial_json(serde_json::json!({
            "kind": "purchase",
            "platform": "TCGplayer",
            "total_cents": 10000,
            "line_items": [
                { "sku": "MH2-0123-NM", "line_total_cents": 6000 },
                { "sku": "NEO-0211-LP", "line_total_cents": 4000 }
            ]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 3,
            "kind": "purchase",
            "platform": "TCGplayer",
            "occurred_at": "2026-02-10T00:00:00Z",
            "total_cents": 10000,
            "fee_cents": 0,
            "line_items": []
        })))
        .expect(1)
        .mount(ctx.mock_server())
        .await;

    let harness = ctx.harness_mut();
    {
        let app = harness.state_mut();
        let state_ctx = &mut app.state_mut().ctx;
        state_ctx.update::<Route>(|route| *route = Route::NewTransaction);
        *state_ctx.state_mut::<NewTransactionForm>() = filled_form();
    }
    harness.step();

    assert!(harness.query_by_label("Allocation preview").is_some());
    harness.get_by_label("Save transaction").click();
    harness.step();

    // Save round-trip, then the completion handler navigates away.
    for _ in 0..3 {
        yield_wait_for_network(DEFAULT_NETWORK_WAIT_MS).await;
        {
            let app = harness.state_mut();
            app.state_mut().ctx.sync_computes();
        }
        for _ in 0..3 {
            harness.step();
        }
    }

    let app = harness.state();
    let state_ctx = &app.state().ctx;
    assert_eq!(
        *state_ctx.state::<Route>(),
        Route::Transactions,
        "a saved transaction should land back on the ledger"
    );
    let form = state_ctx.state::<NewTransactionForm>();
    assert!(form.total_text.is_empty(), "the form should be reset");
    assert_eq!(form.lines.len(), 1);
}

#[tokio::test]
async fn invalid_input_shows_errors_and_sends_nothing() {
    let mut ctx = TestCtx::new_app().await;

    Mock::given(method("POST"))
        .and(path("/api/transactions"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(ctx.mock_server())
        .await;

    let harness = ctx.harness_mut();
    {
        let app = harness.state_mut();
        let state_ctx = &mut app.state_mut().ctx;
        state_ctx.update::<Route>(|route| *route = Route::NewTransaction);
        // Default form: no total, one empty line.
    }
    harness.step();

    harness.get_by_label("Save transaction").click();
    for _ in 0..3 {
        harness.step();
    }

    assert!(
        harness
            .query_by_label_contains("Total must be a dollar amount")
            .is_some(),
        "validation errors should be rendered"
    );
    let app = harness.state();
    assert_eq!(
        *app.state().ctx.state::<Route>(),
        Route::NewTransaction,
        "a failed submit must not navigate"
    );
}
