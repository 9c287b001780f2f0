//! Everything the shells render. View structs are plain data, rebuilt from
//! the model on every `view` call.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorSeverity};
use crate::feed::{BountyCardView, BountyDetailView};
use crate::geo::{Coordinate, Region};
use crate::model::{ToastKind, ToastMessage};
use crate::picker::LocationPicker;

pub const LOADING_LOCATION_LABEL: &str = "Loading current location";
pub const CIRCLE_FILL_COLOR: &str = "rgba(255, 0, 0, 0.2)";
pub const CIRCLE_STROKE_COLOR: &str = "rgba(255, 0, 0, 0.5)";
pub const ORIGIN_PIN_COLOR: &str = "green";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Origin,
    UserLocation,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MapMarker {
    pub kind: MarkerKind,
    pub coordinate: Coordinate,
    /// `None` leaves the platform's default pin.
    pub pin_color: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CircleOverlay {
    pub center: Coordinate,
    pub radius_m: u32,
    pub fill_color: String,
    pub stroke_color: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LocationPickerView {
    pub session_id: u64,
    pub region: Region,
    pub camera_center: Coordinate,
    pub markers: Vec<MapMarker>,
    pub circle: CircleOverlay,
    pub radius_m: u32,
    pub radius_label: String,
    pub min_radius_m: u32,
    pub max_radius_m: u32,
    pub radius_step_m: u32,
    pub decoded_address: Option<String>,
    pub loading_label: Option<String>,
    pub error_label: Option<String>,
}

impl From<&LocationPicker> for LocationPickerView {
    fn from(picker: &LocationPicker) -> Self {
        let mut markers = Vec::with_capacity(2);
        if let Some(origin) = picker.origin() {
            markers.push(MapMarker {
                kind: MarkerKind::Origin,
                coordinate: origin,
                pin_color: Some(ORIGIN_PIN_COLOR.to_string()),
            });
        }
        if let Some(user) = picker.user_location() {
            markers.push(MapMarker {
                kind: MarkerKind::UserLocation,
                coordinate: user,
                pin_color: None,
            });
        }

        let live = picker.live_radius();

        Self {
            session_id: picker.session().0,
            region: picker.region(),
            camera_center: picker.camera_center(),
            markers,
            // drawn even before a selection, around (0, 0)
            circle: CircleOverlay {
                center: picker.origin().unwrap_or(Coordinate::ORIGIN),
                radius_m: live.meters(),
                fill_color: CIRCLE_FILL_COLOR.to_string(),
                stroke_color: CIRCLE_STROKE_COLOR.to_string(),
            },
            radius_m: live.meters(),
            radius_label: live.label(),
            min_radius_m: crate::MIN_RADIUS_M,
            max_radius_m: crate::MAX_RADIUS_M,
            radius_step_m: crate::RADIUS_STEP_M,
            decoded_address: picker.decoded_address().map(str::to_string),
            loading_label: picker
                .is_loading()
                .then(|| LOADING_LOCATION_LABEL.to_string()),
            error_label: picker
                .error_msg()
                .map(|msg| format!("Error getting current location: {msg}")),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchAreaView {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: u32,
    pub radius_label: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FeedView {
    pub cards: Vec<BountyCardView>,
    pub is_refreshing: bool,
    pub search_area: Option<SearchAreaView>,
    pub selected: Option<BountyDetailView>,
    pub picker: Option<LocationPickerView>,
    pub user_email: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SignupView {
    pub email: String,
    pub newsletter_opt_in: bool,
    pub submitting: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SigninView {
    pub email: String,
    pub submitting: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScreenView {
    Loading,
    Signin(SigninView),
    Signup(SignupView),
    Feed(Box<FeedView>),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserFacingError {
    pub message: String,
    pub is_transient: bool,
    pub is_retryable: bool,
    pub error_code: String,
}

impl From<&AppError> for UserFacingError {
    fn from(e: &AppError) -> Self {
        Self {
            message: e.user_facing_message(),
            is_transient: e.severity == ErrorSeverity::Transient,
            is_retryable: e.is_retryable(),
            error_code: e.code().to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToastView {
    pub message: String,
    pub kind: ToastKind,
    pub duration_ms: u64,
}

impl From<&ToastMessage> for ToastView {
    fn from(t: &ToastMessage) -> Self {
        Self {
            message: t.message.clone(),
            kind: t.kind,
            duration_ms: t.duration_ms,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub screen: ScreenView,
    pub error: Option<UserFacingError>,
    pub toast: Option<ToastView>,
    pub is_authenticated: bool,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self {
            screen: ScreenView::Loading,
            error: None,
            toast: None,
            is_authenticated: false,
        }
    }
}
