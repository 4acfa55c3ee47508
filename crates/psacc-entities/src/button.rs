//! Button entities

use std::str::FromStr;

use tracing::info;

use crate::context::VehicleContext;
use crate::error::{EntityError, EntityResult};
use crate::state::{EntityState, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Lock,
    Unlock,
    Horn,
    FlashLights,
    Wakeup,
    Refresh,
}

impl ButtonKind {
    pub const ALL: [ButtonKind; 6] = [
        ButtonKind::Lock,
        ButtonKind::Unlock,
        ButtonKind::Horn,
        ButtonKind::FlashLights,
        ButtonKind::Wakeup,
        ButtonKind::Refresh,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ButtonKind::Lock => "lock",
            ButtonKind::Unlock => "unlock",
            ButtonKind::Horn => "horn",
            ButtonKind::FlashLights => "lights",
            ButtonKind::Wakeup => "wakeup",
            ButtonKind::Refresh => "refresh",
        }
    }

    pub fn render(&self, vin: &str, available: bool) -> EntityState {
        let (suffix, name, icon) = match self {
            ButtonKind::Lock => ("lock_doors", "Lock doors", "mdi:car-door-lock"),
            ButtonKind::Unlock => ("unlock_doors", "Unlock doors", "mdi:lock-open-variant"),
            ButtonKind::Horn => ("horn", "Horn", "mdi:bullhorn"),
            ButtonKind::FlashLights => ("lights", "Flash lights", "mdi:car-light-high"),
            ButtonKind::Wakeup => ("wakeup", "Wake up", "mdi:alarm"),
            ButtonKind::Refresh => ("refresh", "Refresh data", "mdi:refresh"),
        };
        EntityState::new(Platform::Button, vin, suffix, self.key(), name, icon).available(available)
    }

    /// Send the button's command.
    ///
    /// Lock, unlock and wake up change vehicle state and are followed by a
    /// refresh; horn and lights are not. The refresh button only refreshes.
    pub async fn press(&self, ctx: &VehicleContext, vin: &str) -> EntityResult<bool> {
        ctx.require_vehicle(vin)?;
        info!(vin = %vin, button = self.key(), "Button pressed");

        let sent = match self {
            ButtonKind::Lock => ctx.api.lock_doors(vin).await,
            ButtonKind::Unlock => ctx.api.unlock_doors(vin).await,
            ButtonKind::Wakeup => ctx.api.wakeup(vin).await,
            ButtonKind::Horn => return Ok(ctx.api.horn(vin, 1).await),
            ButtonKind::FlashLights => return Ok(ctx.api.flash_lights(vin, 1).await),
            ButtonKind::Refresh => true,
        };
        ctx.refresh.request_refresh();
        Ok(sent)
    }
}

impl FromStr for ButtonKind {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| EntityError::UnknownEntity {
                platform: "button",
                key: s.to_string(),
            })
    }
}
