use serde::{Deserialize, Serialize};

use crate::auth::{SigninField, SignupField};
use crate::capabilities::{AuthResult, GeocodedAddress, LocationError, PermissionStatus};
use crate::config::AppConfig;
use crate::feed::BountyRecord;
use crate::geo::{Coordinate, Viewport};
use crate::picker::{PickerSessionId, PlaceDetails};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub enum Event {
    #[default]
    Noop,

    AppStarted {
        config: Option<AppConfig>,
        viewport: Viewport,
    },
    SessionResolved(AuthResult),

    // auth screens
    ShowSignup,
    ShowSignin,
    SignupFieldChanged {
        field: SignupField,
        value: String,
    },
    NewsletterToggled(bool),
    SigninFieldChanged {
        field: SigninField,
        value: String,
    },
    SignupSubmitted,
    SignupResponse(AuthResult),
    SigninSubmitted,
    SigninResponse(AuthResult),
    SignOutRequested,
    SignedOut(AuthResult),

    // feed
    RefreshFeed,
    FeedResponse(Result<Vec<BountyRecord>, String>),
    SelectBounty {
        id: String,
    },
    DismissBounty,
    ClearSearchArea,

    // location picker
    OpenLocationPicker,
    LocationPermissionResolved {
        session: PickerSessionId,
        status: PermissionStatus,
    },
    PositionResolved {
        session: PickerSessionId,
        result: Result<Coordinate, LocationError>,
    },
    MapLongPressed {
        coordinate: Coordinate,
    },
    PlaceSelected(PlaceDetails),
    GeocodeResolved {
        session: PickerSessionId,
        generation: u64,
        result: Result<Vec<GeocodedAddress>, LocationError>,
    },
    RadiusChanged {
        meters: f64,
    },
    RadiusCommitted {
        meters: f64,
    },
    ConfirmLocation,
    CancelLocation,

    DismissToast,
    DismissError,
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::AppStarted { .. } => "app_started",
            Self::SessionResolved(_) => "session_resolved",
            Self::ShowSignup => "show_signup",
            Self::ShowSignin => "show_signin",
            Self::SignupFieldChanged { .. } => "signup_field_changed",
            Self::NewsletterToggled(_) => "newsletter_toggled",
            Self::SigninFieldChanged { .. } => "signin_field_changed",
            Self::SignupSubmitted => "signup_submitted",
            Self::SignupResponse(_) => "signup_response",
            Self::SigninSubmitted => "signin_submitted",
            Self::SigninResponse(_) => "signin_response",
            Self::SignOutRequested => "sign_out_requested",
            Self::SignedOut(_) => "signed_out",
            Self::RefreshFeed => "refresh_feed",
            Self::FeedResponse(_) => "feed_response",
            Self::SelectBounty { .. } => "select_bounty",
            Self::DismissBounty => "dismiss_bounty",
            Self::ClearSearchArea => "clear_search_area",
            Self::OpenLocationPicker => "open_location_picker",
            Self::LocationPermissionResolved { .. } => "location_permission_resolved",
            Self::PositionResolved { .. } => "position_resolved",
            Self::MapLongPressed { .. } => "map_long_pressed",
            Self::PlaceSelected(_) => "place_selected",
            Self::GeocodeResolved { .. } => "geocode_resolved",
            Self::RadiusChanged { .. } => "radius_changed",
            Self::RadiusCommitted { .. } => "radius_committed",
            Self::ConfirmLocation => "confirm_location",
            Self::CancelLocation => "cancel_location",
            Self::DismissToast => "dismiss_toast",
            Self::DismissError => "dismiss_error",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::ShowSignup
                | Self::ShowSignin
                | Self::SignupSubmitted
                | Self::SigninSubmitted
                | Self::SignOutRequested
                | Self::RefreshFeed
                | Self::SelectBounty { .. }
                | Self::DismissBounty
                | Self::ClearSearchArea
                | Self::OpenLocationPicker
                | Self::MapLongPressed { .. }
                | Self::PlaceSelected(_)
                | Self::RadiusCommitted { .. }
                | Self::ConfirmLocation
                | Self::CancelLocation
                | Self::DismissToast
                | Self::DismissError
        )
    }
}
