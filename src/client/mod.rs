use hyper::client::HttpConnector;
use hyper::{Body, Client, StatusCode, Uri};
use std::time::Duration;
use tokio::time::timeout;

use crate::models::outcome::{RequestError, RequestOutcome};

pub type HttpClient = Client<HttpConnector, Body>;

pub fn build_client() -> HttpClient {
    Client::builder().build_http()
}

/// Issues one GET and reads the response to the end. Hitting `limit` at any
/// point counts as a timeout.
pub async fn send_get(client: &HttpClient, uri: &Uri, limit: Duration) -> RequestOutcome {
    match timeout(limit, exchange(client, uri)).await {
        Ok(Ok(status)) => RequestOutcome::Completed {
            status: status.as_u16(),
        },
        Ok(Err(reason)) => RequestOutcome::Failed { reason },
        Err(_) => RequestOutcome::Failed {
            reason: RequestError::Timeout,
        },
    }
}

async fn exchange(client: &HttpClient, uri: &Uri) -> Result<StatusCode, RequestError> {
    let response = client
        .get(uri.clone())
        .await
        .map_err(|e| RequestError::from_hyper(&e))?;

    let status = response.status();

    // drain so the connection can go back to the pool
    hyper::body::to_bytes(response.into_body())
        .await
        .map_err(|e| RequestError::from_hyper(&e))?;

    Ok(status)
}
