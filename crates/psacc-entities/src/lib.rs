//! psacc-entities - Entity views over cached vehicle records
//!
//! Every entity is a pure function of one [`VehicleRecord`]: reading a
//! state never performs I/O and never fails, missing or malformed fields
//! simply yield no value. Actionable entities (switches, buttons, numbers,
//! selects) send their command through the [`VehicleApi`] in a
//! [`VehicleContext`] and then ask the coordinator for a refresh.
//!
//! | Platform       | Entities                                                   |
//! |----------------|------------------------------------------------------------|
//! | sensor         | battery, ranges, mileage, charging, consumption, ...       |
//! | binary_sensor  | charging, plugged, locks, doors, hood, trunk, climate      |
//! | device_tracker | location                                                   |
//! | switch         | charging, climate                                          |
//! | button         | lock, unlock, horn, lights, wake up, refresh               |
//! | number         | charge threshold, climate temperature                      |
//! | select         | charge mode                                                |
//!
//! [`VehicleRecord`]: psacc_core::VehicleRecord
//! [`VehicleApi`]: psacc_core::VehicleApi

pub mod binary_sensor;
pub mod button;
mod context;
pub mod device;
pub mod device_tracker;
mod error;
pub mod number;
pub mod select;
pub mod sensor;
mod state;
pub mod switch;

pub use binary_sensor::BinarySensorKind;
pub use button::ButtonKind;
pub use context::VehicleContext;
pub use device::DeviceInfo;
pub use error::{EntityError, EntityResult};
pub use number::NumberKind;
pub use select::SelectKind;
pub use sensor::SensorKind;
pub use state::{EntityState, Platform};
pub use switch::SwitchKind;

/// Render every entity of one vehicle, in platform order
pub fn vehicle_entities(ctx: &VehicleContext, vin: &str) -> Vec<EntityState> {
    let record = ctx.record(vin);
    let available = ctx.is_available(vin);

    let mut entities = Vec::new();
    entities.extend(
        SensorKind::ALL
            .iter()
            .map(|kind| kind.render(vin, &record, available)),
    );
    entities.extend(
        BinarySensorKind::ALL
            .iter()
            .map(|kind| kind.render(vin, &record, available)),
    );
    entities.push(device_tracker::render(vin, &record, available));
    entities.extend(
        SwitchKind::ALL
            .iter()
            .map(|kind| kind.render(vin, &record, available)),
    );
    entities.extend(ButtonKind::ALL.iter().map(|kind| kind.render(vin, available)));
    entities.extend(
        NumberKind::ALL
            .iter()
            .map(|kind| kind.render(vin, &record, available)),
    );
    entities.extend(
        SelectKind::ALL
            .iter()
            .map(|kind| kind.render(vin, &record, available)),
    );
    entities
}

