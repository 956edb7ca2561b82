use cardledger_ui::CardledgerApp;
use cardledger_ui::state::State;
use egui_kittest::Harness;
use wiremock::Mock;
use wiremock::matchers::{method, path};
use wiremock::{MockServer, ResponseTemplate};

/// Default time to wait for a mocked request to round-trip.
#[allow(unused)]
pub const DEFAULT_NETWORK_WAIT_MS: u64 = 50;

/// Yields to the tokio runtime so in-flight commands can finish.
#[allow(unused)]
pub async fn yield_wait_for_network(ms: u64) {
    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
    tokio::task::yield_now().await;
}

pub struct TestCtx<'a, T = State> {
    mock_server: MockServer,
    harness: Harness<'a, T>,
}

impl<'a, T> TestCtx<'a, T> {
    pub fn harness_mut(&mut self) -> &mut Harness<'a, T> {
        &mut self.harness
    }

    #[allow(unused)]
    pub fn harness(&self) -> &Harness<'a, T> {
        &self.harness
    }

    #[allow(unused)]
    pub fn mock_server(&self) -> &MockServer {
        &self.mock_server
    }
}

impl<'a> TestCtx<'a, CardledgerApp> {
    pub async fn new_app() -> Self {
        let (mock_server, state) = setup_test_state(200).await;
        let app = CardledgerApp::new(state);
        let harness = Harness::new_eframe(|_| app);

        Self {
            mock_server,
            harness,
        }
    }

    /// App wired against a service whose list endpoints fail with the
    /// given status. The health endpoint still answers 200.
    #[allow(unused)]
    pub async fn new_app_with_list_status(status_code: u16) -> Self {
        let (mock_server, state) = setup_test_state(status_code).await;
        let app = CardledgerApp::new(state);
        let harness = Harness::new_eframe(|_| app);

        Self {
            mock_server,
            harness,
        }
    }
}

pub fn inventory_body() -> serde_json::Value {
    serde_json::json!({
        "items": [
            {
                "sku": "MH2-0123-NM",
                "name": "Ragavan, Nimble Pilferer",
                "set_name": "Modern Horizons 2",
                "condition": "near_mint",
                "quantity": 3,
                "avg_cost_cents": 5200,
                "market_price_cents": 6150,
                "updated_at": "2026-02-10T08:30:00Z"
            },
            {
                "sku": "NEO-0211-LP",
                "name": "The Wandering Emperor",
                "set_name": "Kamigawa: Neon Dynasty",
                "condition": "lightly_played",
                "quantity": 2,
                "avg_cost_cents": 1500,
                "market_price_cents": null,
                "updated_at": "2026-02-08T12:00:00Z"
            }
        ]
    })
}

pub fn transactions_body() -> serde_json::Value {
    serde_json::json!({
        "transactions": [
            {
                "id": 1,
                "kind": "purchase",
                "platform": "TCGplayer",
                "occurred_at": "2026-01-10T00:00:00Z",
                "total_cents": 10000,
                "fee_cents": 0,
                "line_items": [
                    {
                        "sku": "MH2-0123-NM",
                        "name": "Ragavan, Nimble Pilferer",
                        "quantity": 1,
                        "line_total_cents": 6000
                    },
                    {
                        "sku": "NEO-0211-LP",
                        "name": "The Wandering Emperor",
                        "quantity": 2,
                        "line_total_cents": 4000
                    }
                ]
            },
            {
                "id": 2,
                "kind": "sale",
                "platform": "eBay",
                "occurred_at": "2026-01-20T00:00:00Z",
                "total_cents": 12500,
                "fee_cents": 1620,
                "notes": "single card sale",
                "line_items": []
            }
        ]
    })
}

async fn setup_test_state(list_status: u16) -> (MockServer, State) {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/is-health"))
        .respond_with(ResponseTemplate::new(200).insert_header("x-service-version", "0.1.0+test"))
        .mount(&mock_server)
        .await;

    let inventory = if list_status == 200 {
        ResponseTemplate::new(200).set_body_json(inventory_body())
    } else {
        ResponseTemplate::new(list_status)
    };
    Mock::given(method("GET"))
        .and(path("/api/inventory"))
        .respond_with(inventory)
        .mount(&mock_server)
        .await;

    let transactions = if list_status == 200 {
        ResponseTemplate::new(200).set_body_json(transactions_body())
    } else {
        ResponseTemplate::new(list_status)
    };
    Mock::given(method("GET"))
        .and(path("/api/transactions"))
        .respond_with(transactions)
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let state = State::with_base_url(&base_url);

    (mock_server, state)
}
