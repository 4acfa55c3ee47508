//! Vehicle records and the per-VIN cache shape

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// One vehicle's merged state: static listing metadata overlaid with the
/// latest status snapshot.
pub type VehicleRecord = serde_json::Map<String, Value>;

/// VIN -> record, in vehicle-listing order
pub type VehicleMap = IndexMap<String, VehicleRecord>;

/// Merge a status payload over static metadata.
///
/// Status keys win on collision. The merge is shallow: a nested object in the
/// status replaces the metadata's object of the same name wholesale.
///
/// A status payload that is not a JSON object cannot be merged and is
/// reported as [`ApiError::Generic`].
pub fn merge_record(metadata: &VehicleRecord, status: Value) -> ApiResult<VehicleRecord> {
    let Value::Object(status) = status else {
        return Err(ApiError::generic(format!(
            "vehicle status is not an object: {}",
            json_type_name(&status)
        )));
    };

    let mut record = metadata.clone();
    record.extend(status);
    Ok(record)
}

/// Extract the VIN from one vehicle-listing entry
pub fn listing_vin(entry: &Value) -> Option<&str> {
    entry
        .get("vin")
        .and_then(Value::as_str)
        .filter(|vin| !vin.is_empty())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
