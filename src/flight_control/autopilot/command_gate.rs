use crate::flight_control::{
    frame::DestinationRef,
    ship_interface::{DestinationRegistry, NavigationEngine, ShipTelemetry},
};
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// Reason an autopilot command was refused. All rejections are recoverable: the
/// caller may retry once the condition clears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRejection {
    ManualOverride,
    NotPowered,
    NavigationDamaged,
    ShipDestroyed,
    UnknownDestination { name: String, valid: Vec<String> },
    DestinationUnavailable { name: String, reason: String },
    NoLock { name: String },
    NoTakeOffLocation,
    NoLandingLocation,
    AlreadyLanded,
    OrientWhileLanded,
    NotEngaged,
}

impl Display for CommandRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandRejection::ManualOverride => {
                write!(f, "Manual override is engaged. The operator is currently flying the ship.")
            }
            CommandRejection::NotPowered => {
                write!(f, "Autopilot cannot be engaged until the ship has been powered on.")
            }
            CommandRejection::NavigationDamaged => write!(
                f,
                "Autopilot module is damaged and cannot be engaged until it is repaired manually."
            ),
            CommandRejection::ShipDestroyed => {
                write!(f, "The ship has been destroyed. Autopilot is unavailable.")
            }
            CommandRejection::UnknownDestination { name, valid } => write!(
                f,
                "Destination '{name}' not found. Valid destinations are: {}",
                valid.iter().join(", ")
            ),
            CommandRejection::DestinationUnavailable { name, reason } => {
                write!(f, "Destination '{name}' is not currently available: {reason}")
            }
            CommandRejection::NoLock { name } => {
                write!(f, "Cannot acquire a lock on destination '{name}'.")
            }
            CommandRejection::NoTakeOffLocation => {
                write!(f, "Cannot take off because the ship is not currently landed at a location.")
            }
            CommandRejection::NoLandingLocation => write!(
                f,
                "Cannot land because the ship is not currently in a valid location to land at."
            ),
            CommandRejection::AlreadyLanded => {
                write!(f, "The ship is already landed. No need to land again.")
            }
            CommandRejection::OrientWhileLanded => {
                write!(f, "Cannot turn the ship while it is landed.")
            }
            CommandRejection::NotEngaged => write!(f, "Autopilot is not currently engaged."),
        }
    }
}

impl std::error::Error for CommandRejection {}

/// Shared precondition gate run before every command, first failure wins.
///
/// # Order
/// 1. manual override with the operator at the console
/// 2. ship not powered
/// 3. navigation module damaged
/// 4. ship destroyed
pub fn check_gate(
    telemetry: &impl ShipTelemetry,
    engine: &impl NavigationEngine,
) -> Result<(), CommandRejection> {
    if telemetry.manual_override() && telemetry.operator_at_console() {
        return Err(CommandRejection::ManualOverride);
    }
    if !telemetry.is_powered() {
        return Err(CommandRejection::NotPowered);
    }
    if engine.is_damaged() {
        return Err(CommandRejection::NavigationDamaged);
    }
    if telemetry.is_destroyed() {
        return Err(CommandRejection::ShipDestroyed);
    }
    Ok(())
}

/// Resolves `name` to a destination that can be targeted right now.
///
/// # Returns
/// - `Err` if the name is unknown, the destination reports itself unavailable (its
///   reason is echoed) or its frame cannot be resolved.
pub fn resolve_destination(
    registry: &impl DestinationRegistry,
    name: &str,
) -> Result<DestinationRef, CommandRejection> {
    let Some(dest) = registry.by_name(name) else {
        return Err(CommandRejection::UnknownDestination {
            name: name.to_string(),
            valid: registry.available_names(),
        });
    };
    if let Err(reason) = dest.is_available() {
        return Err(CommandRejection::DestinationUnavailable { name: dest.name(), reason });
    }
    if dest.frame().is_none() {
        return Err(CommandRejection::NoLock { name: dest.name() });
    }
    Ok(dest)
}
