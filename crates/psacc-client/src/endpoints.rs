//! Endpoint paths of the remote PSA Car Controller service.
//!
//! Paths are appended verbatim to the configured base URL.

/// List vehicles with their static metadata
pub const VEHICLES: &str = "/get_vehicles";

/// Set the charge threshold, body `{vin, percentage}`
pub const CHARGE_THRESHOLD: &str = "/charge_control";

/// Set the charge schedule, body `{vin, start, end}`
pub const CHARGE_HOUR: &str = "/charge_hour";

/// Percent-encode a VIN so it stays a single path segment
fn segment(vin: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(vin)
}

/// Vehicle status snapshot
pub fn status(vin: &str) -> String {
    format!("/get_vehicleinfo/{}", segment(vin))
}

/// Start (`true`) or stop (`false`) charging immediately
pub fn charge_now(vin: &str, charge: bool) -> String {
    format!("/charge_now/{}/{}", segment(vin), u8::from(charge))
}

/// Start climate preconditioning at `temperature` °C
pub fn climate_start(vin: &str, temperature: f64) -> String {
    format!("/preconditioning/{}/1?temperature={}", segment(vin), temperature)
}

/// Stop climate preconditioning
pub fn climate_stop(vin: &str) -> String {
    format!("/preconditioning/{}/0", segment(vin))
}

/// Wake the vehicle up
pub fn wakeup(vin: &str) -> String {
    format!("/wakeup/{}", segment(vin))
}

/// Sound the horn
pub fn horn(vin: &str, count: u8) -> String {
    format!("/horn/{}/{}", segment(vin), count)
}

/// Flash the lights
pub fn lights(vin: &str, count: u8) -> String {
    format!("/lights/{}/{}", segment(vin), count)
}

/// Lock the doors
pub fn lock(vin: &str) -> String {
    format!("/lock_door/{}/1", segment(vin))
}

/// Unlock the doors
pub fn unlock(vin: &str) -> String {
    format!("/lock_door/{}/0", segment(vin))
}
