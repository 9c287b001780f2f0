//! Location selection for the search form.
//!
//! [`LocationPicker`] owns everything the map picker shows while it is open:
//! the chosen origin, the user's own position, the radius slider and the
//! reverse-geocoded label. It is a plain reducer. Handlers mutate the picker
//! and hand back [`PickerEffect`]s, which the app turns into capability
//! requests tagged with the picker's [`PickerSessionId`]. Results for a
//! closed session or a superseded geocode request are dropped.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::capabilities::{Accuracy, GeocodedAddress, LocationError, PermissionStatus};
use crate::geo::{Coordinate, Region, SearchRadius};

pub const PERMISSION_DENIED_MESSAGE: &str = "Permission to access location was denied";
pub const POSITION_UNAVAILABLE_MESSAGE: &str = "Unable to determine your current location";

/// Identifies one open/close cycle of the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PickerSessionId(pub u64);

impl PickerSessionId {
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for PickerSessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "picker-{}", self.0)
    }
}

/// Receiver of a confirmed selection; the hosting form implements this.
pub trait PickerSink {
    fn set_location(&mut self, coordinate: Coordinate);
    fn set_radius(&mut self, radius: SearchRadius);
    fn set_open(&mut self, open: bool);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PickerEffect {
    RequestPermission,
    FetchPosition { accuracy: Accuracy },
    AnimateCamera { center: Coordinate, duration_ms: u64 },
    ReverseGeocode { coordinate: Coordinate, generation: u64 },
}

/// Place details as delivered by the places-autocomplete widget. Only the
/// geometry is read; the rest is kept for the shell's own label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlaceDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub geometry: Option<PlaceGeometry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlaceGeometry {
    #[serde(default)]
    pub location: Option<PlaceLocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PlaceLocation {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl PlaceDetails {
    #[must_use]
    pub fn at(lat: f64, lng: f64) -> Self {
        Self {
            geometry: Some(PlaceGeometry {
                location: Some(PlaceLocation {
                    lat: Some(lat),
                    lng: Some(lng),
                }),
            }),
            ..Self::default()
        }
    }

    /// Any missing piece of the geometry reads as 0.
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        let location = self
            .geometry
            .as_ref()
            .and_then(|g| g.location)
            .unwrap_or_default();
        Coordinate::unchecked(location.lat.unwrap_or(0.0), location.lng.unwrap_or(0.0))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationPicker {
    session: PickerSessionId,
    region: Region,
    camera_center: Coordinate,
    camera_animation_ms: u64,
    mounted: bool,
    permission: PermissionStatus,
    origin: Option<Coordinate>,
    user_location: Option<Coordinate>,
    live_radius: SearchRadius,
    committed_radius: SearchRadius,
    decoded_address: Option<String>,
    error_msg: Option<String>,
    loading: bool,
    geocode_generation: u64,
}

impl LocationPicker {
    #[must_use]
    pub fn new(
        session: PickerSessionId,
        region: Region,
        radius: SearchRadius,
        camera_animation_ms: u64,
    ) -> Self {
        Self {
            session,
            region,
            camera_center: region.center,
            camera_animation_ms,
            mounted: false,
            permission: PermissionStatus::NotDetermined,
            origin: None,
            user_location: None,
            live_radius: radius,
            committed_radius: radius,
            decoded_address: None,
            error_msg: None,
            loading: false,
            geocode_generation: 0,
        }
    }

    #[must_use]
    pub const fn session(&self) -> PickerSessionId {
        self.session
    }

    #[must_use]
    pub const fn region(&self) -> Region {
        self.region
    }

    #[must_use]
    pub const fn camera_center(&self) -> Coordinate {
        self.camera_center
    }

    #[must_use]
    pub const fn permission(&self) -> PermissionStatus {
        self.permission
    }

    #[must_use]
    pub const fn origin(&self) -> Option<Coordinate> {
        self.origin
    }

    #[must_use]
    pub const fn user_location(&self) -> Option<Coordinate> {
        self.user_location
    }

    #[must_use]
    pub const fn live_radius(&self) -> SearchRadius {
        self.live_radius
    }

    #[must_use]
    pub const fn committed_radius(&self) -> SearchRadius {
        self.committed_radius
    }

    #[must_use]
    pub fn decoded_address(&self) -> Option<&str> {
        self.decoded_address.as_deref()
    }

    #[must_use]
    pub fn error_msg(&self) -> Option<&str> {
        self.error_msg.as_deref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn geocode_generation(&self) -> u64 {
        self.geocode_generation
    }

    /// Starts the permission → position chain. Runs once per picker.
    pub fn mount(&mut self) -> Vec<PickerEffect> {
        if self.mounted {
            return Vec::new();
        }
        self.mounted = true;
        vec![PickerEffect::RequestPermission]
    }

    pub fn permission_resolved(&mut self, status: PermissionStatus) -> Vec<PickerEffect> {
        self.permission = status;

        if !status.is_granted() {
            self.error_msg = Some(PERMISSION_DENIED_MESSAGE.to_string());
            return Vec::new();
        }

        // a second grant must not start a second fetch
        if self.loading || self.user_location.is_some() {
            return Vec::new();
        }

        self.loading = true;
        vec![PickerEffect::FetchPosition {
            accuracy: Accuracy::High,
        }]
    }

    pub fn position_resolved(
        &mut self,
        result: Result<Coordinate, LocationError>,
    ) -> Vec<PickerEffect> {
        self.loading = false;

        match result {
            Ok(position) => {
                self.user_location = Some(position);
                self.move_camera(position)
            }
            Err(e) => {
                warn!(session = %self.session, error = %e, "current position unavailable");
                self.error_msg = Some(POSITION_UNAVAILABLE_MESSAGE.to_string());
                Vec::new()
            }
        }
    }

    pub fn select_place(&mut self, position: Option<Coordinate>) -> Vec<PickerEffect> {
        self.origin = position;
        match position {
            Some(center) => self.move_camera(center),
            None => Vec::new(),
        }
    }

    pub fn long_press(&mut self, coordinate: Coordinate) -> Vec<PickerEffect> {
        let mut effects = self.select_place(Some(coordinate));
        self.geocode_generation += 1;
        effects.push(PickerEffect::ReverseGeocode {
            coordinate,
            generation: self.geocode_generation,
        });
        effects
    }

    /// The place already carries its own label, so there is no geocoding.
    /// Any geocode still in flight belongs to an older origin and is
    /// invalidated.
    pub fn autocomplete_select(&mut self, details: &PlaceDetails) -> Vec<PickerEffect> {
        self.geocode_generation += 1;
        self.select_place(Some(details.coordinate()))
    }

    /// Returns `true` when the result was applied.
    pub fn geocode_resolved(
        &mut self,
        generation: u64,
        result: Result<Vec<GeocodedAddress>, LocationError>,
    ) -> bool {
        if generation != self.geocode_generation {
            debug!(
                session = %self.session,
                generation,
                latest = self.geocode_generation,
                "dropping stale geocode result"
            );
            return false;
        }

        match result {
            Ok(addresses) => match addresses.into_iter().next() {
                Some(first) => {
                    self.decoded_address = first.name;
                    true
                }
                None => false,
            },
            Err(e) => {
                warn!(
                    session = %self.session,
                    origin = ?self.origin,
                    error = %e,
                    "reverse geocoding failed"
                );
                false
            }
        }
    }

    pub fn set_radius_live(&mut self, raw: f64) {
        self.live_radius = SearchRadius::snap(raw);
    }

    pub fn commit_radius(&mut self, raw: f64) {
        let radius = SearchRadius::snap(raw);
        self.live_radius = radius;
        self.committed_radius = radius;
    }

    pub fn confirm<S: PickerSink>(&self, sink: &mut S) {
        sink.set_location(self.origin.unwrap_or(Coordinate::ORIGIN));
        sink.set_radius(self.committed_radius);
        sink.set_open(false);
    }

    pub fn cancel<S: PickerSink>(&self, sink: &mut S) {
        sink.set_open(false);
    }

    fn move_camera(&mut self, center: Coordinate) -> Vec<PickerEffect> {
        self.camera_center = center;
        vec![PickerEffect::AnimateCamera {
            center,
            duration_ms: self.camera_animation_ms,
        }]
    }
}
