use serde::{Deserialize, Serialize};

use crate::auth::{Session, SigninForm, SignupForm};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::feed::{FeedState, SearchFilter};
use crate::geo::Region;
use crate::get_current_time_ms;
use crate::picker::{LocationPicker, PickerSessionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Waiting for the provider to report the current user.
    #[default]
    Loading,
    Signin,
    Signup,
    Feed,
}

impl Screen {
    #[must_use]
    pub const fn requires_session(self) -> bool {
        matches!(self, Self::Feed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastMessage {
    pub message: String,
    pub kind: ToastKind,
    pub created_at_ms: u64,
    pub duration_ms: u64,
}

impl ToastMessage {
    #[must_use]
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            created_at_ms: get_current_time_ms(),
            duration_ms: kind.default_duration_ms(),
        }
    }

    #[must_use]
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.created_at_ms) > self.duration_ms
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    #[must_use]
    pub const fn default_duration_ms(self) -> u64 {
        match self {
            Self::Info => 3000,
            Self::Success => 2000,
            Self::Warning => 4000,
            Self::Error => 5000,
        }
    }
}

#[derive(Debug)]
pub struct Model {
    pub screen: Screen,
    pub config: AppConfig,
    pub initial_region: Region,
    pub session: Option<Session>,
    pub signup: SignupForm,
    pub signin: SigninForm,
    pub feed: FeedState,
    pub search: SearchFilter,
    /// Present only while the picker is open.
    pub picker: Option<LocationPicker>,
    pub last_picker_session: PickerSessionId,
    pub active_error: Option<AppError>,
    pub active_toast: Option<ToastMessage>,
    pub view_timestamp_ms: u64,
}

impl Default for Model {
    fn default() -> Self {
        let config = AppConfig::default();
        let search = SearchFilter {
            radius: config.default_radius_m,
            ..SearchFilter::default()
        };
        Self {
            screen: Screen::default(),
            initial_region: Region::default(),
            config,
            session: None,
            signup: SignupForm::default(),
            signin: SigninForm::default(),
            feed: FeedState::default(),
            search,
            picker: None,
            last_picker_session: PickerSessionId::default(),
            active_error: None,
            active_toast: None,
            view_timestamp_ms: get_current_time_ms(),
        }
    }
}

impl Model {
    pub fn update_timestamp(&mut self) {
        self.view_timestamp_ms = get_current_time_ms();
    }

    pub fn set_error(&mut self, error: AppError) {
        self.active_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.active_error = None;
    }

    pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.active_toast = Some(ToastMessage::new(message, kind));
    }

    pub fn clear_toast(&mut self) {
        self.active_toast = None;
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Hands out the id for the next picker; ids are never reused within a
    /// model's lifetime.
    pub fn next_picker_session(&mut self) -> PickerSessionId {
        self.last_picker_session = self.last_picker_session.next();
        self.last_picker_session
    }

    /// The open picker, if it belongs to `session`.
    pub fn picker_for(&mut self, session: PickerSessionId) -> Option<&mut LocationPicker> {
        self.picker.as_mut().filter(|p| p.session() == session)
    }

    pub fn sign_out_locally(&mut self) {
        self.session = None;
        self.picker = None;
        self.search = SearchFilter {
            radius: self.config.default_radius_m,
            ..SearchFilter::default()
        };
        self.feed = FeedState::default();
        self.signin.clear();
        self.signup.clear();
        self.screen = Screen::Signin;
    }
}
