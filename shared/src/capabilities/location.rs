//! Device location: foreground permission, current position and reverse
//! geocoding, all performed by the shell.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    #[default]
    NotDetermined,
    Granted,
    Denied,
    Restricted,
}

impl PermissionStatus {
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Accuracy {
    Lowest,
    Low,
    Balanced,
    #[default]
    High,
    Highest,
}

/// One reverse-geocoding match. Every field is best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GeocodedAddress {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

impl GeocodedAddress {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data")]
pub enum LocationOperation {
    RequestForegroundPermission,
    GetCurrentPosition { accuracy: Accuracy },
    ReverseGeocode { coordinate: Coordinate },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum LocationOutput {
    Permission(PermissionStatus),
    Position(Coordinate),
    Addresses(Vec<GeocodedAddress>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location services disabled")]
    ServiceDisabled,

    #[error("location request timed out")]
    Timeout,

    #[error("location not available")]
    NotAvailable,

    #[error("reverse geocoding failed: {reason}")]
    GeocodeFailed { reason: String },

    #[error("unknown error: {message}")]
    Unknown { message: String },
}

impl LocationError {
    fn unexpected(output: &LocationOutput) -> Self {
        Self::Unknown {
            message: format!("unexpected shell output: {output:?}"),
        }
    }
}

pub type LocationResult = Result<LocationOutput, LocationError>;

impl Operation for LocationOperation {
    type Output = LocationResult;
}

#[derive(Clone)]
pub struct Location<E> {
    context: CapabilityContext<LocationOperation, E>,
}

impl<Ev> Capability<Ev> for Location<Ev> {
    type Operation = LocationOperation;
    type MappedSelf<MappedEv> = Location<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Location::new(self.context.map_event(f))
    }
}

impl<E> Location<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<LocationOperation, E>) -> Self {
        Self { context }
    }

    /// Prompts for foreground location access. A shell failure is reported
    /// as `Denied`.
    pub fn request_permission<F>(&self, callback: F)
    where
        F: FnOnce(PermissionStatus) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let status = match ctx
                .request_from_shell(LocationOperation::RequestForegroundPermission)
                .await
            {
                Ok(LocationOutput::Permission(status)) => status,
                Ok(_) | Err(_) => PermissionStatus::Denied,
            };
            ctx.update_app(callback(status));
        });
    }

    pub fn current_position<F>(&self, accuracy: Accuracy, callback: F)
    where
        F: FnOnce(Result<Coordinate, LocationError>) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx
                .request_from_shell(LocationOperation::GetCurrentPosition { accuracy })
                .await
                .and_then(|output| match output {
                    LocationOutput::Position(coordinate) => Ok(coordinate),
                    other => Err(LocationError::unexpected(&other)),
                });
            ctx.update_app(callback(result));
        });
    }

    pub fn reverse_geocode<F>(&self, coordinate: Coordinate, callback: F)
    where
        F: FnOnce(Result<Vec<GeocodedAddress>, LocationError>) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx
                .request_from_shell(LocationOperation::ReverseGeocode { coordinate })
                .await
                .and_then(|output| match output {
                    LocationOutput::Addresses(addresses) => Ok(addresses),
                    other => Err(LocationError::unexpected(&other)),
                });
            ctx.update_app(callback(result));
        });
    }
}
