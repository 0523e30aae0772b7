//! `gloo-net` implementation of [`HttpTransport`].

use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use shipwait_core::http::{HttpResponse, HttpTransport, TransportError};

/// `fetch`-backed transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
	async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
		let response = Request::get(url).send().await.map_err(transport_error)?;
		Ok(read(response).await)
	}

	async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, TransportError> {
		let response = Request::post(url)
			.header("Content-Type", "application/json")
			.body(body)
			.map_err(transport_error)?
			.send()
			.await
			.map_err(transport_error)?;
		Ok(read(response).await)
	}
}

async fn read(response: Response) -> HttpResponse {
	let status = response.status();
	let body = response.text().await.unwrap_or_default();
	HttpResponse::new(status, body)
}

fn transport_error(err: gloo_net::Error) -> TransportError {
	TransportError::new(err.to_string())
}
