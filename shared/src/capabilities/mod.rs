mod auth;
mod location;
mod map;

pub use self::auth::{Auth, AuthError, AuthOperation, AuthOutput, AuthResult, AuthUser};
pub use self::location::{
    Accuracy, GeocodedAddress, Location, LocationError, LocationOperation, LocationOutput,
    LocationResult, PermissionStatus,
};
pub use self::map::{MapOperation, MapView};

// Render and HTTP come straight from Crux; the rest are shell services
// declared in this module.
pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::event::Event;
use crate::App;

// The effect derive reads the event type from each field's generic
// argument, so fields spell out `Capability<Event>` in full.
#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub http: Http<Event>,
    pub location: Location<Event>,
    pub map: MapView<Event>,
    pub auth: Auth<Event>,
}
