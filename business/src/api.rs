//! Typed REST client for the cardledger service.
//!
//! Every function takes the canonical API base (see
//! [`crate::ApiConfig::api_url`], already ending in `/api`) and returns a
//! decoded domain value or an [`ApiError`].

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::http::{HttpError, HttpRequest, HttpResponse};
use crate::model::{
    CreateTransactionRequest, DeleteTransactionsRequest, DeleteTransactionsResponse,
    InventoryItem, ListInventoryResponse, ListTransactionsResponse, PriceHistoryResponse,
    PricePoint, Transaction,
};

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] HttpError),

    #[error("service returned status {0}")]
    Status(u16),

    #[error("invalid response body: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

fn expect_status(response: HttpResponse, expected: u16) -> ApiResult<HttpResponse> {
    if response.status == expected {
        Ok(response)
    } else {
        Err(ApiError::Status(response.status))
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> ApiResult<T> {
    response.json().map_err(|e| ApiError::Decode(e.to_string()))
}

/// `GET {api}/inventory`
pub async fn list_inventory(api_base_url: &str) -> ApiResult<Vec<InventoryItem>> {
    let url = format!("{api_base_url}/inventory");
    let response = expect_status(HttpRequest::get(url).send().await?, 200)?;
    Ok(decode::<ListInventoryResponse>(&response)?.items)
}

/// `GET {api}/inventory/{sku}/prices?days={days}`
pub async fn price_history(
    api_base_url: &str,
    sku: &str,
    days: u16,
) -> ApiResult<Vec<PricePoint>> {
    let url = format!("{api_base_url}/inventory/{sku}/prices?days={days}");
    let response = expect_status(HttpRequest::get(url).send().await?, 200)?;
    Ok(decode::<PriceHistoryResponse>(&response)?.points)
}

/// `GET {api}/transactions`
pub async fn list_transactions(api_base_url: &str) -> ApiResult<Vec<Transaction>> {
    let url = format!("{api_base_url}/transactions");
    let response = expect_status(HttpRequest::get(url).send().await?, 200)?;
    Ok(decode::<ListTransactionsResponse>(&response)?.transactions)
}

/// `POST {api}/transactions`, expects 201 with the stored transaction.
pub async fn create_transaction(
    api_base_url: &str,
    request: &CreateTransactionRequest,
) -> ApiResult<Transaction> {
    let url = format!("{api_base_url}/transactions");
    let response = expect_status(HttpRequest::post(url).json(request)?.send().await?, 201)?;
    decode(&response)
}

/// `POST {api}/transactions/delete`, bulk delete by id.
pub async fn delete_transactions(api_base_url: &str, ids: &[i64]) -> ApiResult<u32> {
    let url = format!("{api_base_url}/transactions/delete");
    let request = DeleteTransactionsRequest { ids: ids.to_vec() };
    let response = expect_status(HttpRequest::post(url).json(&request)?.send().await?, 200)?;
    Ok(decode::<DeleteTransactionsResponse>(&response)?.deleted)
}

/// `GET {api}/is-health`; the service version rides in the
/// `x-service-version` header when the deploy exposes it.
pub async fn check_health(api_base_url: &str) -> ApiResult<Option<String>> {
    let url = format!("{api_base_url}/is-health");
    let response = expect_status(HttpRequest::get(url).send().await?, 200)?;
    Ok(response.header("x-service-version").map(str::to_owned))
}
