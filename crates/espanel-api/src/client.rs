// Hand-crafted async HTTP client for the ESPHome web_server REST API.
//
// One entity class per path segment: /switch/<id>, /binary_sensor/<id>,
// /sensor/<id>, /text_sensor/<id>, /number/<id>, /select/<id>, and
// /button/<id>/press. No auth, plain HTTP.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{BinarySensorState, StateValue, SwitchState};

// ── Client ───────────────────────────────────────────────────────────

/// Async client for one ESPHome device's web_server API.
///
/// Holds the device base address for its whole lifetime; create a new
/// client to talk to a different device.
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DeviceClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a device address and transport config.
    ///
    /// A bare host or IP (no scheme) is treated as `http://<addr>`.
    pub fn new(address: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(address)?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(address: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(address)?;
        Ok(Self { http, base_url })
    }

    /// Normalize the device address into a base URL ending in `/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let trimmed = raw.trim();
        let with_scheme = if trimmed.contains("://") {
            trimmed.to_owned()
        } else {
            format!("http://{trimmed}")
        };

        let mut url = Url::parse(&with_scheme)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The normalized device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"switch/relay1"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::status_error(status, resp).await);
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            // Truncate by characters, not bytes: a byte slice could split a
            // multibyte character and panic on non-ASCII device output.
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    /// POST a JSON body. The device replies to most writes with an empty
    /// body; when a body is present but unparseable it is treated as an
    /// empty success, matching the firmware's loose response contract.
    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::status_error(status, resp).await);
        }
        Ok(())
    }

    async fn status_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let body = resp.text().await.unwrap_or_default();
        Error::Http {
            status: status.as_u16(),
            body: if body.is_empty() {
                status.to_string()
            } else {
                body
            },
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Switches ─────────────────────────────────────────────────────

    pub async fn switch_state(&self, id: &str) -> Result<bool, Error> {
        let state: SwitchState = self.get(&format!("switch/{id}")).await?;
        Ok(state.value)
    }

    pub async fn set_switch(&self, id: &str, on: bool) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            state: &'a str,
        }

        self.post(
            &format!("switch/{id}"),
            &Body {
                state: if on { "ON" } else { "OFF" },
            },
        )
        .await
    }

    // ── Binary sensors ───────────────────────────────────────────────

    pub async fn binary_sensor_state(&self, id: &str) -> Result<BinarySensorState, Error> {
        self.get(&format!("binary_sensor/{id}")).await
    }

    // ── Sensors ──────────────────────────────────────────────────────

    pub async fn sensor_state(&self, id: &str) -> Result<Option<String>, Error> {
        let value: StateValue = self.get(&format!("sensor/{id}")).await?;
        Ok(value.state)
    }

    // ── Text sensors ─────────────────────────────────────────────────

    pub async fn text_sensor_state(&self, id: &str) -> Result<Option<String>, Error> {
        let value: StateValue = self.get(&format!("text_sensor/{id}")).await?;
        Ok(value.state)
    }

    // ── Numbers ──────────────────────────────────────────────────────

    pub async fn number_state(&self, id: &str) -> Result<Option<String>, Error> {
        let value: StateValue = self.get(&format!("number/{id}")).await?;
        Ok(value.state)
    }

    pub async fn set_number(&self, id: &str, value: f64) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body {
            value: f64,
        }

        self.post(&format!("number/{id}"), &Body { value }).await
    }

    // ── Selects ──────────────────────────────────────────────────────

    pub async fn select_state(&self, id: &str) -> Result<Option<String>, Error> {
        let value: StateValue = self.get(&format!("select/{id}")).await?;
        Ok(value.state)
    }

    pub async fn set_select(&self, id: &str, option: &str) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            option: &'a str,
        }

        self.post(&format!("select/{id}"), &Body { option }).await
    }

    // ── Buttons ──────────────────────────────────────────────────────

    /// Press a template button (`POST /button/<id>/press`).
    pub async fn press_button(&self, id: &str) -> Result<(), Error> {
        self.post(&format!("button/{id}/press"), &serde_json::json!({}))
            .await
    }

    /// Press a button trying each candidate identifier in order.
    ///
    /// The device sanitizes human-readable names into identifiers with
    /// rules that vary across firmware builds, so callers supply every
    /// plausible spelling, primary first. Stops at the first success; if
    /// all candidates are rejected, the error names each identifier in
    /// attempt order.
    pub async fn press_button_with_fallback(&self, candidates: &[&str]) -> Result<(), Error> {
        for id in candidates {
            match self.press_button(id).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    debug!(id, error = %e, "button candidate rejected");
                }
            }
        }
        Err(Error::ButtonNotFound {
            tried: candidates.iter().map(|s| (*s).to_owned()).collect(),
        })
    }
}

// ── Unit tests ───────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bare_address_gains_http_scheme() {
        let url = DeviceClient::normalize_base_url("192.168.1.50").unwrap();
        assert_eq!(url.as_str(), "http://192.168.1.50/");
    }

    #[test]
    fn explicit_scheme_is_kept() {
        let url = DeviceClient::normalize_base_url("http://kc868.local").unwrap();
        assert_eq!(url.as_str(), "http://kc868.local/");
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let url = DeviceClient::normalize_base_url("http://10.0.0.2/").unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.2/");
    }

    #[test]
    fn garbage_address_is_rejected() {
        assert!(DeviceClient::normalize_base_url("http://").is_err());
    }
}
