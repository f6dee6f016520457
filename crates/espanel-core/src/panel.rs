// ── Panel facade ──
//
// Owns the device client and the panel lifecycle: initial load, the five
// entity-class refreshes, the periodic poll task, and every mutation
// path with its write policy.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use espanel_api::{DeviceClient, Error as ApiError, TransportConfig};

use crate::entity_map::{self, ButtonAction};
use crate::error::CoreError;
use crate::snapshot::{
    InputState, PanelSnapshot, ParamState, RelayState, SensorReading, SlotState, on_off,
};

/// Default poll period, matching the source panel's 5 s auto-refresh.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

// ── Configuration ───────────────────────────────────────────────────

/// Panel configuration: where the device lives and how often to poll it.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Device address (bare IP/host or full `http://` URL).
    pub address: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Poll period for the background refresh task; zero disables it.
    pub refresh_interval: Duration,
}

impl PanelConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            timeout: Duration::from_secs(10),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }

    /// Disable the background poll task (single-shot CLI invocations).
    pub fn oneshot(mut self) -> Self {
        self.refresh_interval = Duration::ZERO;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }
}

// ── Panel ───────────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc`. All I/O goes through the one
/// `DeviceClient`; the device base address is fixed for the panel's
/// lifetime (reconnecting to another device means a new `Panel`).
#[derive(Clone)]
pub struct Panel {
    inner: Arc<PanelInner>,
}

struct PanelInner {
    client: DeviceClient,
    config: PanelConfig,
    snapshot_tx: watch::Sender<Option<Arc<PanelSnapshot>>>,
    reachable_tx: watch::Sender<bool>,
    /// Last known relay states, used to report the revert target when an
    /// optimistic toggle write fails.
    relay_cache: Mutex<HashMap<&'static str, bool>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Panel {
    /// Create a panel from configuration. Does NOT touch the network --
    /// call [`connect()`](Self::connect) or [`refresh_all()`](Self::refresh_all).
    pub fn new(config: PanelConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = DeviceClient::new(&config.address, &transport)?;

        let (snapshot_tx, _) = watch::channel(None);
        let (reachable_tx, _) = watch::channel(false);

        Ok(Self {
            inner: Arc::new(PanelInner {
                client,
                config,
                snapshot_tx,
                reachable_tx,
                relay_cache: Mutex::new(HashMap::new()),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &PanelConfig {
        &self.inner.config
    }

    /// The device client (for ad-hoc reads the snapshot doesn't cover).
    pub fn client(&self) -> &DeviceClient {
        &self.inner.client
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Perform the initial full refresh and start the periodic poll task
    /// (when `refresh_interval` is non-zero).
    ///
    /// Never fails outright: an unreachable device yields a snapshot full
    /// of placeholders with `reachable == false`.
    pub async fn connect(&self) -> Arc<PanelSnapshot> {
        let snapshot = self.refresh_all().await;

        let interval = self.inner.config.refresh_interval;
        if !interval.is_zero() {
            let panel = self.clone();
            let cancel = self.inner.cancel.child_token();
            let handle = tokio::spawn(refresh_task(panel, interval, cancel));
            self.inner.task_handles.lock().await.push(handle);
        }

        snapshot
    }

    /// Stop background tasks.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        for handle in self.inner.task_handles.lock().await.drain(..) {
            let _ = handle.await;
        }
    }

    /// Observe the latest snapshot (None until the first refresh lands).
    pub fn subscribe_snapshot(&self) -> watch::Receiver<Option<Arc<PanelSnapshot>>> {
        self.inner.snapshot_tx.subscribe()
    }

    /// Observe device reachability.
    pub fn subscribe_reachable(&self) -> watch::Receiver<bool> {
        self.inner.reachable_tx.subscribe()
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Refresh every entity class concurrently and publish the result.
    ///
    /// Per-entity failures isolate to a placeholder; the panel counts as
    /// unreachable only when a class hits a transport-level failure
    /// (connection refused, timeout) rather than a per-entity rejection.
    /// Overlapping passes are tolerated; the snapshot channel is
    /// last-writer-wins.
    pub async fn refresh_all(&self) -> Arc<PanelSnapshot> {
        let (
            (relays, relays_ok),
            (inputs, inputs_ok),
            (sensors, sensors_ok),
            ((learned_status, slots), texts_ok),
            ((numbers, selects), params_ok),
        ) = tokio::join!(
            self.refresh_relays(),
            self.refresh_inputs(),
            self.refresh_sensors(),
            self.refresh_texts(),
            self.refresh_params(),
        );

        let reachable = relays_ok && inputs_ok && sensors_ok && texts_ok && params_ok;

        // Remember observed relay states for optimistic-toggle reverts.
        {
            let mut cache = self.inner.relay_cache.lock().await;
            for relay in &relays {
                if let Some(on) = relay.on {
                    cache.insert(relay.id, on);
                }
            }
        }

        let snapshot = Arc::new(PanelSnapshot {
            relays,
            inputs,
            sensors,
            learned_status,
            slots,
            numbers,
            selects,
            reachable,
            fetched_at: Utc::now(),
        });

        let _ = self.inner.snapshot_tx.send(Some(Arc::clone(&snapshot)));
        let _ = self.inner.reachable_tx.send(reachable);

        debug!(reachable, "panel refresh complete");
        snapshot
    }

    async fn refresh_relays(&self) -> (Vec<RelayState>, bool) {
        let mut ok = true;
        let mut relays = Vec::with_capacity(entity_map::SWITCHES.len());
        for id in entity_map::SWITCHES {
            let on = match self.inner.client.switch_state(id).await {
                Ok(on) => Some(on),
                Err(e) => {
                    note_entity_failure("switch", id, &e, &mut ok);
                    None
                }
            };
            relays.push(RelayState { id, on });
        }
        (relays, ok)
    }

    async fn refresh_inputs(&self) -> (Vec<InputState>, bool) {
        let mut ok = true;
        let mut inputs = Vec::with_capacity(entity_map::BINARY_SENSORS.len());
        for id in entity_map::BINARY_SENSORS {
            let state = match self.inner.client.binary_sensor_state(id).await {
                Ok(s) => s.state.or_else(|| {
                    s.value.map(|v| on_off(v).to_owned())
                }),
                Err(e) => {
                    note_entity_failure("binary_sensor", id, &e, &mut ok);
                    None
                }
            };
            inputs.push(InputState { id, state });
        }
        (inputs, ok)
    }

    async fn refresh_sensors(&self) -> (Vec<SensorReading>, bool) {
        let mut ok = true;
        let mut sensors = Vec::with_capacity(entity_map::SENSORS.len());
        for spec in entity_map::SENSORS {
            let raw = match self.inner.client.sensor_state(spec.id).await {
                Ok(raw) => raw,
                Err(e) => {
                    note_entity_failure("sensor", spec.id, &e, &mut ok);
                    None
                }
            };
            sensors.push(SensorReading {
                id: spec.id,
                label: spec.label,
                unit: spec.unit,
                precision: spec.precision,
                raw,
            });
        }
        (sensors, ok)
    }

    /// Fetch `learned_status` and rebuild all 16 slot entries.
    async fn refresh_texts(&self) -> ((Option<String>, Vec<SlotState>), bool) {
        let mut ok = true;

        let learned_status = match self
            .inner
            .client
            .text_sensor_state(entity_map::LEARNED_STATUS)
            .await
        {
            Ok(state) => state,
            Err(e) => {
                note_entity_failure("text_sensor", entity_map::LEARNED_STATUS, &e, &mut ok);
                None
            }
        };

        let mut slots = Vec::with_capacity(usize::from(entity_map::SLOT_COUNT));
        for (index, id) in (1..=entity_map::SLOT_COUNT).zip(entity_map::slot_ids()) {
            let value = match self.inner.client.text_sensor_state(&id).await {
                Ok(state) => state,
                Err(e) => {
                    note_entity_failure("text_sensor", &id, &e, &mut ok);
                    None
                }
            };
            slots.push(SlotState { index, id, value });
        }

        ((learned_status, slots), ok)
    }

    async fn refresh_params(&self) -> ((Vec<ParamState>, Vec<ParamState>), bool) {
        let mut ok = true;

        let mut numbers = Vec::with_capacity(entity_map::NUMBERS.len());
        for id in entity_map::NUMBERS {
            let value = match self.inner.client.number_state(id).await {
                Ok(v) => v,
                Err(e) => {
                    note_entity_failure("number", id, &e, &mut ok);
                    None
                }
            };
            numbers.push(ParamState { id, value });
        }

        let mut selects = Vec::with_capacity(entity_map::SELECTS.len());
        for id in entity_map::SELECTS {
            let value = match self.inner.client.select_state(id).await {
                Ok(v) => v,
                Err(e) => {
                    note_entity_failure("select", id, &e, &mut ok);
                    None
                }
            };
            selects.push(ParamState { id, value });
        }

        ((numbers, selects), ok)
    }

    /// Re-fetch just the text pane (learned status + slots), as done after
    /// slot-mutating button presses.
    pub async fn refresh_slots(&self) -> (Option<String>, Vec<SlotState>) {
        let ((learned_status, slots), _) = self.refresh_texts().await;
        (learned_status, slots)
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Write a relay state, optimistically.
    ///
    /// The caller's control already shows the intended state. On failure
    /// the error carries the state to revert to: the last state this
    /// panel observed for the relay, or the opposite of the intent when
    /// nothing was ever observed.
    pub async fn set_relay(&self, id: &str, on: bool) -> Result<(), CoreError> {
        let id = known_switch(id)?;

        match self.inner.client.set_switch(id, on).await {
            Ok(()) => {
                self.inner.relay_cache.lock().await.insert(id, on);
                Ok(())
            }
            Err(source) => {
                let reverted_to = self
                    .inner
                    .relay_cache
                    .lock()
                    .await
                    .get(id)
                    .copied()
                    .unwrap_or(!on);
                Err(CoreError::ToggleFailed {
                    id: id.to_owned(),
                    reverted_to,
                    source,
                })
            }
        }
    }

    /// Read the current relay state, flip it, and return the new state.
    pub async fn toggle_relay(&self, id: &str) -> Result<bool, CoreError> {
        let id = known_switch(id)?;
        let current = self.inner.client.switch_state(id).await?;
        self.inner.relay_cache.lock().await.insert(id, current);
        self.set_relay(id, !current).await?;
        Ok(!current)
    }

    /// Write an RF parameter. No rollback: the entered value stands
    /// regardless of outcome, only the result reports success or failure.
    pub async fn set_number(&self, name: &str, value: f64) -> Result<(), CoreError> {
        let id = known_entity(&entity_map::NUMBERS, "number", name)?;
        Ok(self.inner.client.set_number(id, value).await?)
    }

    pub async fn number_value(&self, name: &str) -> Result<Option<String>, CoreError> {
        let id = known_entity(&entity_map::NUMBERS, "number", name)?;
        Ok(self.inner.client.number_state(id).await?)
    }

    /// Write a select option. Same write-through policy as numbers.
    pub async fn set_select(&self, name: &str, option: &str) -> Result<(), CoreError> {
        let id = known_entity(&entity_map::SELECTS, "select", name)?;
        Ok(self.inner.client.set_select(id, option).await?)
    }

    pub async fn select_value(&self, name: &str) -> Result<Option<String>, CoreError> {
        let id = known_entity(&entity_map::SELECTS, "select", name)?;
        Ok(self.inner.client.select_state(id).await?)
    }

    /// Press a template button, trying every candidate identifier.
    pub async fn press(&self, action: ButtonAction) -> Result<(), CoreError> {
        Ok(self
            .inner
            .client
            .press_button_with_fallback(action.candidates())
            .await?)
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Per-entity failure bookkeeping: transport-level errors mark the whole
/// class (and thus the panel) unreachable; entity-level rejections only
/// blank the one entity.
fn note_entity_failure(class: &str, id: &str, error: &ApiError, class_ok: &mut bool) {
    if matches!(error, ApiError::Transport(_)) {
        *class_ok = false;
    }
    debug!(class, id, error = %error, "entity fetch failed");
}

fn known_switch(name: &str) -> Result<&'static str, CoreError> {
    known_entity(&entity_map::SWITCHES, "switch", name)
}

fn known_entity(
    table: &'static [&'static str],
    class: &'static str,
    name: &str,
) -> Result<&'static str, CoreError> {
    table
        .iter()
        .find(|id| **id == name)
        .copied()
        .ok_or_else(|| CoreError::UnknownEntity {
            class,
            name: name.to_owned(),
        })
}

/// Periodically refresh the panel until cancelled.
async fn refresh_task(panel: Panel, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let snapshot = panel.refresh_all().await;
                if !snapshot.reachable {
                    warn!("periodic refresh: device unreachable");
                }
            }
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn panel_for(server: &MockServer) -> Panel {
        Panel::new(PanelConfig::new(server.uri()).oneshot()).unwrap()
    }

    async fn mount_get(server: &MockServer, p: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn refresh_isolates_per_entity_failures() {
        let server = MockServer::start().await;
        let panel = panel_for(&server).await;

        // relay2 is left unmocked (404); the rest of the class and the
        // other classes must still refresh.
        mount_get(&server, "/switch/relay1", json!({ "value": true })).await;
        mount_get(&server, "/switch/relay3", json!({ "value": false })).await;
        mount_get(&server, "/sensor/a1_volts", json!({ "state": "3.14159" })).await;
        mount_get(&server, "/binary_sensor/input5", json!({ "value": true })).await;
        mount_get(&server, "/text_sensor/slot_02", json!({ "state": "EV1527 24b" })).await;

        let snap = panel.refresh_all().await;

        assert_eq!(snap.relays[0].on, Some(true));
        assert_eq!(snap.relays[1].on, None);
        assert_eq!(snap.relays[2].on, Some(false));
        assert_eq!(snap.sensors[0].display(), "3.142 V");
        assert_eq!(snap.inputs[4].display(), "ON");
        assert_eq!(snap.slots.len(), 16);
        assert_eq!(snap.slots[1].value.as_deref(), Some("EV1527 24b"));
        assert_eq!(snap.slots[0].display(), "Empty / unavailable");

        // Entity-level rejections don't make the device unreachable.
        assert!(snap.reachable);
    }

    #[tokio::test]
    async fn refresh_reports_unreachable_on_transport_failure() {
        // Bind a port, then release it: connecting to it afterwards is
        // refused, a transport-level failure rather than an HTTP rejection.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let panel = Panel::new(
            PanelConfig::new(format!("http://{addr}"))
                .oneshot()
                .with_timeout(Duration::from_millis(250)),
        )
        .unwrap();

        let snap = panel.refresh_all().await;

        assert!(!snap.reachable);
        assert!(snap.relays.iter().all(|r| r.on.is_none()));
        assert!(snap.slots.iter().all(|s| s.value.is_none()));
        assert_eq!(snap.slots.len(), 16);
    }

    #[tokio::test]
    async fn toggle_write_failure_reports_prior_state() {
        let server = MockServer::start().await;
        let panel = panel_for(&server).await;

        // Observe relay1 ON, then fail the write turning it OFF.
        mount_get(&server, "/switch/relay1", json!({ "value": true })).await;
        Mock::given(method("POST"))
            .and(path("/switch/relay1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        panel.refresh_all().await;

        match panel.set_relay("relay1", false).await {
            Err(CoreError::ToggleFailed {
                ref id,
                reverted_to,
                ..
            }) => {
                assert_eq!(id, "relay1");
                assert!(reverted_to, "must revert to the last observed state (ON)");
            }
            other => panic!("expected ToggleFailed, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn toggle_failure_without_history_reverts_to_opposite_of_intent() {
        let server = MockServer::start().await;
        let panel = panel_for(&server).await;

        Mock::given(method("POST"))
            .and(path("/switch/relay4"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        match panel.set_relay("relay4", true).await {
            Err(CoreError::ToggleFailed { reverted_to, .. }) => {
                assert!(!reverted_to);
            }
            other => panic!("expected ToggleFailed, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn number_write_failure_has_no_revert_semantics() {
        let server = MockServer::start().await;
        let panel = panel_for(&server).await;

        Mock::given(method("POST"))
            .and(path("/number/rf_repeat"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        // Plain API error -- no revert target, the entered value stands.
        match panel.set_number("rf_repeat", 5.0).await {
            Err(CoreError::Api(ApiError::Http { status, .. })) => assert_eq!(status, 500),
            other => panic!("expected Api(Http), got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_parameter_is_rejected_locally() {
        let server = MockServer::start().await;
        let panel = panel_for(&server).await;

        match panel.set_number("rf_bogus", 1.0).await {
            Err(CoreError::UnknownEntity { class, ref name }) => {
                assert_eq!(class, "number");
                assert_eq!(name, "rf_bogus");
            }
            other => panic!("expected UnknownEntity, got: {other:?}"),
        }
        // Nothing was sent to the device.
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn press_exhausts_candidates_in_order() {
        let server = MockServer::start().await;
        let panel = panel_for(&server).await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        match panel.press(ButtonAction::SaveSlot).await {
            Err(CoreError::Api(ApiError::ButtonNotFound { ref tried })) => {
                assert_eq!(
                    tried,
                    &[
                        "save_learned_slot",
                        "save_learned_→_slot",
                        "save_learned___slot",
                    ]
                );
            }
            other => panic!("expected ButtonNotFound, got: {other:?}"),
        }
    }
}
