#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod app;
pub mod auth;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod event;
pub mod feed;
pub mod geo;
pub mod model;
pub mod picker;
pub mod view;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::AppConfig;
pub use error::{AppError, ErrorKind, ErrorSeverity};
pub use event::Event;
pub use geo::{Coordinate, Region, SearchRadius, Viewport};
pub use model::{Model, Screen, ToastKind, ToastMessage};
pub use picker::{LocationPicker, PickerSessionId, PickerSink, PlaceDetails};
pub use view::ViewModel;

pub const MIN_RADIUS_M: u32 = 0;
pub const MAX_RADIUS_M: u32 = 2000;
pub const RADIUS_STEP_M: u32 = 100;
pub const DEFAULT_RADIUS_M: u32 = 200;
pub const CAMERA_ANIMATION_MS: u64 = 1000;
pub const DEFAULT_LATITUDE_DELTA: f64 = 0.02;
pub const INITIAL_LATITUDE: f64 = 40.76711;
pub const INITIAL_LONGITUDE: f64 = -73.979_704;
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
pub const DEFAULT_API_BASE_URL: &str = "https://api.bountyhunt.app";
pub const DESCRIPTION_PREVIEW_LENGTH: usize = 80;

#[must_use]
pub fn format_time_ago(timestamp_ms: u64, now_ms: u64) -> String {
    if timestamp_ms > now_ms {
        let future_diff_secs = (timestamp_ms.saturating_sub(now_ms)) / 1000;
        return if future_diff_secs < 60 {
            "Just now".into()
        } else {
            "Upcoming".into()
        };
    }

    let diff_secs = now_ms.saturating_sub(timestamp_ms) / 1000;

    if diff_secs < 5 {
        return "Just now".into();
    }
    if diff_secs < 60 {
        return format!("{diff_secs}s ago");
    }

    let diff_mins = diff_secs / 60;
    if diff_mins < 60 {
        return format!("{diff_mins}m ago");
    }

    let diff_hours = diff_mins / 60;
    if diff_hours < 24 {
        return format!("{diff_hours}h ago");
    }

    let diff_days = diff_hours / 24;
    if diff_days < 7 {
        return format!("{diff_days}d ago");
    }
    if diff_days < 30 {
        return format!("{}w ago", diff_days / 7);
    }
    if diff_days < 365 {
        return format!("{}mo ago", diff_days / 30);
    }

    format!("{}y ago", diff_days / 365)
}

/// Calendar date in the `Mon Oct 19 2026` form (UTC).
#[must_use]
pub fn format_date(timestamp_ms: u64) -> String {
    i64::try_from(timestamp_ms)
        .ok()
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map(|date| date.format("%a %b %d %Y").to_string())
        .unwrap_or_default()
}

#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn get_current_time_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
