//! End-to-end tests for the REST surface
//!
//! Each test builds a coordinator over a scripted vehicle API, serves the
//! router on an ephemeral port and talks to it over real HTTP.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use psacc_api::{create_router, AppState};
use psacc_client::testing::{wait_for, TestServer};
use psacc_coordinator::{Coordinator, CoordinatorMode};
use psacc_core::testing::{Call, MockVehicleApi};
use psacc_core::ApiError as ClientError;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::sync::watch;

const VIN: &str = "VF1AAA";

fn scripted_api() -> Arc<MockVehicleApi> {
    let api = Arc::new(MockVehicleApi::new());
    api.set_listing(Ok(vec![
        json!({"vin": VIN, "brand": "Peugeot", "model": "e-208"}),
    ]));
    api.set_status(
        VIN,
        Ok(json!({
            "energy": [{
                "level": 72,
                "autonomy": 210,
                "charging": {"status": "InProgress", "plugged": true, "mode": "now", "rate": 7.4}
            }],
            "odometer": {"mileage": 12034.5},
            "doorsState": {"lockedState": ["Locked"]}
        })),
    );
    api
}

struct Harness {
    server: TestServer,
    api: Arc<MockVehicleApi>,
    coordinator: Arc<Coordinator>,
    http: reqwest::Client,
}

impl Harness {
    async fn start() -> Self {
        let api = scripted_api();
        let coordinator = Arc::new(Coordinator::new(
            api.clone(),
            CoordinatorMode::Discovery,
            Duration::from_secs(3600),
        ));
        coordinator.first_refresh().await.unwrap();
        api.clear_calls();
        Self::serve(api, coordinator).await
    }

    async fn serve(api: Arc<MockVehicleApi>, coordinator: Arc<Coordinator>) -> Self {
        let state = AppState::new(api.clone(), coordinator.clone());
        let server = TestServer::start(create_router(state))
            .await
            .expect("Failed to start test server");
        Self {
            server,
            api,
            coordinator,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.server.base_url(), path)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let response = self.http.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap_or(Value::Null))
    }

    async fn post(&self, path: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = self.http.post(self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap_or(Value::Null))
    }

    async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let response = self.http.put(self.url(path)).json(&body).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap_or(Value::Null))
    }
}

// =============================================================================
// Read Tests
// =============================================================================

#[tokio::test]
async fn test_health() {
    let h = Harness::start().await;
    let body = h
        .http
        .get(h.url("/health"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_vehicle_snapshot() {
    let h = Harness::start().await;

    let (status, body) = h.get("/api/vehicles").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[VIN]["brand"], "Peugeot");
    assert_eq!(body[VIN]["energy"][0]["level"], 72);

    let (_, record) = h.get("/api/vehicles/VF1AAA").await;
    assert_eq!(record["model"], "e-208");

    let (status, unknown) = h.get("/api/vehicles/VF1ZZZ").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unknown, json!({}));
}

#[tokio::test]
async fn test_entities() {
    let h = Harness::start().await;

    let (status, body) = h.get("/api/vehicles/VF1AAA/entities").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["device"]["name"], "Peugeot e-208");
    assert_eq!(body["device"]["identifiers"], json!([["psacc", VIN]]));

    let entities = body["entities"].as_array().unwrap();
    let find = |id: &str| {
        entities
            .iter()
            .find(|e| e["unique_id"] == id)
            .cloned()
            .unwrap()
    };
    assert_eq!(find("VF1AAA_battery_level")["state"], 72);
    assert_eq!(find("VF1AAA_charging_power")["state"], 7.4);
    assert_eq!(find("VF1AAA_doors_locked")["state"], true);
    assert_eq!(find("VF1AAA_charge_mode")["state"], "immediate");
    assert_eq!(find("VF1AAA_charging_switch")["available"], true);

    let (status, body) = h.get("/api/vehicles/VF1ZZZ/entities").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

// =============================================================================
// Entity Action Tests
// =============================================================================

#[tokio::test]
async fn test_switch_actions() {
    let h = Harness::start().await;

    let (status, body) = h.post("/api/vehicles/VF1AAA/switches/charging/off", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(h.api.calls(), vec![Call::StopCharge(VIN.to_string())]);

    let (status, _) = h.post("/api/vehicles/VF1AAA/switches/charging/toggle", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = h.post("/api/vehicles/VF1AAA/switches/sunroof/on", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = h.post("/api/vehicles/VF1ZZZ/switches/climate/on", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(h.api.calls().len(), 1);
}

#[tokio::test]
async fn test_button_press() {
    let h = Harness::start().await;
    h.api.set_command_result(false);

    let (status, body) = h.post("/api/vehicles/VF1AAA/buttons/horn/press", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(h.api.calls(), vec![Call::Horn(VIN.to_string(), 1)]);
}

#[tokio::test]
async fn test_number_bounds() {
    let h = Harness::start().await;

    let (status, body) = h
        .put("/api/vehicles/VF1AAA/numbers/charge_threshold", json!({"value": 40}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    assert!(h.api.calls().is_empty());

    let (status, _) = h
        .put("/api/vehicles/VF1AAA/numbers/climate_temperature", json!({"value": 20.5}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(h.api.calls(), vec![Call::StartClimate(VIN.to_string(), 20.5)]);
}

#[tokio::test]
async fn test_select_is_local_only() {
    let h = Harness::start().await;

    let (status, body) = h
        .put("/api/vehicles/VF1AAA/selects/charge_mode", json!({"option": "economic"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(h.api.calls().is_empty());

    let (status, _) = h
        .put("/api/vehicles/VF1AAA/selects/charge_mode", json!({"option": "fast"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Service Tests
// =============================================================================

#[tokio::test]
async fn test_threshold_service_coerces_and_validates() {
    let h = Harness::start().await;

    let (status, body) = h
        .post(
            "/api/services/set_charge_threshold",
            Some(json!({"vin": VIN, "threshold": "80"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "service": "set_charge_threshold",
            "vin": VIN,
            "success": true,
            "refresh_requested": true
        })
    );
    assert_eq!(h.api.calls(), vec![Call::SetChargeThreshold(VIN.to_string(), 80)]);

    h.api.clear_calls();
    let (status, _) = h
        .post(
            "/api/services/set_charge_threshold",
            Some(json!({"vin": VIN, "threshold": 150})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(h.api.calls().is_empty());
}

#[tokio::test]
async fn test_climate_service() {
    let h = Harness::start().await;

    let (status, _) = h
        .post("/api/services/start_climate", Some(json!({"vin": VIN})))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = h
        .post(
            "/api/services/start_climate",
            Some(json!({"vin": VIN, "temperature": 30})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = h
        .post("/api/services/stop_climate", Some(json!({"vin": VIN})))
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(
        h.api.calls(),
        vec![
            Call::StartClimate(VIN.to_string(), 21.0),
            Call::StopClimate(VIN.to_string()),
        ]
    );
}

#[tokio::test]
async fn test_horn_and_lights_services() {
    let h = Harness::start().await;

    let (_, body) = h.post("/api/services/horn", Some(json!({"vin": VIN}))).await;
    assert_eq!(body["refresh_requested"], false);

    let (status, _) = h
        .post("/api/services/lights", Some(json!({"vin": VIN, "count": 3.0})))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = h
        .post("/api/services/lights", Some(json!({"vin": VIN, "count": 9})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(
        h.api.calls(),
        vec![
            Call::Horn(VIN.to_string(), 1),
            Call::FlashLights(VIN.to_string(), 3),
        ]
    );
}

#[tokio::test]
async fn test_schedule_service() {
    let h = Harness::start().await;

    let (status, _) = h
        .post(
            "/api/services/set_charge_schedule",
            Some(json!({"vin": VIN, "start_time": "22:30", "end_time": "06:00"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        h.api.calls(),
        vec![Call::SetChargeSchedule(
            VIN.to_string(),
            "22:30".to_string(),
            "06:00".to_string()
        )]
    );
}

#[tokio::test]
async fn test_bad_service_requests() {
    let h = Harness::start().await;

    let (status, body) = h
        .post("/api/services/open_sunroof", Some(json!({"vin": VIN})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let response = h
        .http
        .post(h.url("/api/services/wakeup"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, _) = h.post("/api/services/wakeup", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(h.api.calls().is_empty());

    let (_, services) = h.get("/api/services").await;
    assert_eq!(services["items"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_service_triggers_refresh_cycle() {
    let h = Harness::start().await;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let coordinator = h.coordinator.clone();
    let handle = tokio::spawn(async move { coordinator.run(shutdown_rx).await });

    let (status, _) = h.post("/api/services/wakeup", Some(json!({"vin": VIN}))).await;
    assert_eq!(status, StatusCode::OK);

    let api = h.api.clone();
    assert!(
        wait_for(
            move || {
                let api = api.clone();
                async move { api.status_calls(VIN) == 1 }
            },
            Duration::from_secs(2)
        )
        .await
    );

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();
}

// =============================================================================
// Coordinator Tests
// =============================================================================

#[tokio::test]
async fn test_refresh_and_status() {
    let api = Arc::new(MockVehicleApi::new());
    api.set_listing(Err(ClientError::connection("refused")));
    let coordinator = Arc::new(Coordinator::new(
        api.clone(),
        CoordinatorMode::Discovery,
        Duration::from_secs(300),
    ));
    let h = Harness::serve(api, coordinator).await;

    let (status, body) = h.post("/api/refresh?wait=true", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "bad_gateway");

    let (_, status_body) = h.get("/api/status").await;
    assert_eq!(status_body["last_update_success"], false);
    assert_eq!(status_body["mode"], "discovery");
    assert_eq!(status_body["update_interval_secs"], 300);
    assert!(status_body["last_error"]
        .as_str()
        .unwrap()
        .contains("refused"));

    let (status, body) = h.post("/api/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"requested": true}));
}

#[tokio::test]
async fn test_update_options() {
    let h = Harness::start().await;

    let (status, body) = h.put("/api/options", json!({"update_interval": 10})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["update_interval_secs"], 600);
    assert_eq!(h.coordinator.update_interval(), Duration::from_secs(600));

    for minutes in [0, 61] {
        let (status, _) = h
            .put("/api/options", json!({"update_interval": minutes}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    assert_eq!(h.coordinator.update_interval(), Duration::from_secs(600));
}
