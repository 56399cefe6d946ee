//! Blocking HTTP Transport
//!
//! Thin `reqwest::blocking` implementation of the `Transport` seam with
//! the crate's configured timeouts and a shared pooled client.

use reqwest::blocking::Client;

use crate::config::Settings;
use crate::error::{WeblinkError, WeblinkResult};
use crate::types::ApiEnvelope;

use super::{Method, Transport};

pub struct HttpTransport {
    client: Client,
    settings: Settings,
}

impl HttpTransport {
    pub fn new(settings: Settings) -> WeblinkResult<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .connect_timeout(settings.connect_timeout)
            .user_agent(concat!("weblink-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WeblinkError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn route_url(&self, route: &str) -> String {
        format!("{}/{}", self.settings.base_url, route)
    }
}

impl Transport for HttpTransport {
    fn call(
        &self,
        method: Method,
        route: &str,
        body: Option<serde_json::Value>,
    ) -> WeblinkResult<(u16, ApiEnvelope)> {
        let url = self.route_url(route);
        crate::log_debug!("api", "Backend call", route = route);

        let request = match method {
            Method::Get => self.client.get(&url),
            Method::Post => {
                let builder = self.client.post(&url);
                match body {
                    Some(json) => builder.json(&json),
                    None => builder,
                }
            }
        };

        let response = request.send()?;
        let status = response.status().as_u16();
        let envelope: ApiEnvelope = response.json().map_err(|e| {
            WeblinkError::parse_error(format!("Malformed response envelope from '{}': {}", route, e))
        })?;

        Ok((status, envelope))
    }
}
