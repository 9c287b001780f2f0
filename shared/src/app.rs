use tracing::{debug, info, instrument, warn};

use crate::auth::Session;
use crate::capabilities::{AuthOutput, AuthResult, Capabilities};
use crate::config::AppConfig;
use crate::error::{AppError, ErrorKind};
use crate::event::Event;
use crate::feed::{build_cards, build_detail, BountyId, BountyRecord};
use crate::model::{Model, Screen, ToastKind};
use crate::picker::{LocationPicker, PickerEffect, PickerSessionId, PickerSink};
use crate::view::{
    FeedView, LocationPickerView, ScreenView, SearchAreaView, SigninView, SignupView, ToastView,
    UserFacingError, ViewModel,
};

pub const SIGNUP_SUCCESS_MESSAGE: &str = "Account created successfully";
pub const REFRESH_FAILED_MESSAGE: &str = "Error refreshing bounties";

#[derive(Default)]
pub struct App;

impl App {
    /// Turns picker effects into shell requests. Every result event carries
    /// `session` so answers for a closed picker can be recognised.
    fn run_picker_effects(session: PickerSessionId, effects: Vec<PickerEffect>, caps: &Capabilities) {
        for effect in effects {
            match effect {
                PickerEffect::RequestPermission => {
                    caps.location.request_permission(move |status| {
                        Event::LocationPermissionResolved { session, status }
                    });
                }
                PickerEffect::FetchPosition { accuracy } => {
                    caps.location.current_position(accuracy, move |result| {
                        Event::PositionResolved { session, result }
                    });
                }
                PickerEffect::AnimateCamera {
                    center,
                    duration_ms,
                } => {
                    caps.map.animate_camera(center, duration_ms);
                }
                PickerEffect::ReverseGeocode {
                    coordinate,
                    generation,
                } => {
                    caps.location.reverse_geocode(coordinate, move |result| {
                        Event::GeocodeResolved {
                            session,
                            generation,
                            result,
                        }
                    });
                }
            }
        }
    }

    #[instrument(skip_all, fields(url = %model.config.bounties_url()))]
    fn send_refresh_request(model: &mut Model, caps: &Capabilities) {
        model.feed.is_refreshing = true;
        let url = model.config.bounties_url();
        debug!("refreshing bounty feed");

        caps.http
            .get(&url)
            .expect_json::<Vec<BountyRecord>>()
            .send(|result| Event::FeedResponse(Self::feed_result(result)));
    }

    fn feed_result(
        result: crux_http::Result<crux_http::Response<Vec<BountyRecord>>>,
    ) -> Result<Vec<BountyRecord>, String> {
        match result {
            Ok(mut response) => response
                .take_body()
                .ok_or_else(|| "bounty feed response had no body".to_string()),
            Err(e) => Err(e.to_string()),
        }
    }

    fn resolve_config(config: Option<AppConfig>, model: &mut Model) -> AppConfig {
        let Some(config) = config else {
            return AppConfig::default();
        };
        match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!(error = %e, "shell config rejected, using defaults");
                model.set_error(AppError::from(e));
                AppConfig::default()
            }
        }
    }

    fn enter_feed(model: &mut Model, session: Session, caps: &Capabilities) {
        info!(uid = %session.uid, "signed in");
        model.session = Some(session);
        model.screen = Screen::Feed;
        model.clear_error();
        Self::send_refresh_request(model, caps);
    }

    /// Shared handling for the provider's answer to sign-up or sign-in.
    fn handle_auth_response(
        result: AuthResult,
        model: &mut Model,
        caps: &Capabilities,
    ) -> Option<Session> {
        match result {
            Ok(AuthOutput::User(Some(user))) => {
                let session = Session::from(user);
                Self::enter_feed(model, session.clone(), caps);
                Some(session)
            }
            Ok(other) => {
                warn!(output = ?other, "provider returned no user");
                model.set_error(AppError::new(
                    ErrorKind::InvalidState,
                    "No user returned after authentication",
                ));
                None
            }
            Err(e) => {
                warn!(code = %e.code, "authentication failed");
                model.set_error(AppError::from(e));
                None
            }
        }
    }

    #[instrument(skip_all)]
    fn open_picker(model: &mut Model, caps: &Capabilities) {
        if model.picker.is_some() {
            debug!("location picker already open");
            return;
        }

        let session = model.next_picker_session();
        let mut picker = LocationPicker::new(
            session,
            model.initial_region,
            model.config.default_radius_m,
            model.config.camera_animation_ms,
        );
        model.search.set_open(true);
        let effects = picker.mount();
        model.picker = Some(picker);

        info!(%session, "location picker opened");
        Self::run_picker_effects(session, effects, caps);
    }

    /// Applies `close` to the open picker and drops the picker once the form
    /// reports it closed.
    fn close_picker<F>(model: &mut Model, close: F)
    where
        F: FnOnce(&LocationPicker, &mut crate::feed::SearchFilter),
    {
        let Some(picker) = model.picker.take() else {
            debug!("no location picker to close");
            return;
        };
        close(&picker, &mut model.search);
        if model.search.picker_open {
            model.picker = Some(picker);
        } else {
            info!(session = %picker.session(), "location picker closed");
        }
    }

    fn build_screen(model: &Model) -> ScreenView {
        let screen = if model.screen.requires_session() && !model.is_authenticated() {
            Screen::Signin
        } else {
            model.screen
        };

        match screen {
            Screen::Loading => ScreenView::Loading,
            Screen::Signin => ScreenView::Signin(SigninView {
                email: model.signin.email.clone(),
                submitting: model.signin.submitting,
            }),
            Screen::Signup => ScreenView::Signup(SignupView {
                email: model.signup.email.clone(),
                newsletter_opt_in: model.signup.newsletter_opt_in,
                submitting: model.signup.submitting,
            }),
            Screen::Feed => {
                let now_ms = model.view_timestamp_ms;
                let search_area = model.search.location.map(|center| SearchAreaView {
                    latitude: center.latitude,
                    longitude: center.longitude,
                    radius_m: model.search.radius.meters(),
                    radius_label: model.search.radius.label(),
                });

                ScreenView::Feed(Box::new(FeedView {
                    cards: build_cards(&model.feed, &model.search, now_ms),
                    is_refreshing: model.feed.is_refreshing,
                    search_area,
                    selected: model
                        .feed
                        .selected_bounty()
                        .map(|b| build_detail(b, now_ms)),
                    picker: model.picker.as_ref().map(LocationPickerView::from),
                    user_email: model.session.as_ref().and_then(|s| s.email.clone()),
                }))
            }
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        model.update_timestamp();
        debug!(
            event = event.name(),
            user_initiated = event.is_user_initiated(),
            "handling event"
        );

        match event {
            Event::Noop => {}

            Event::AppStarted { config, viewport } => {
                let config = Self::resolve_config(config, model);
                model.initial_region = config.initial_region(viewport);
                model.search.radius = config.default_radius_m;
                model.config = config;
                model.screen = Screen::Loading;

                caps.auth.current_user(Event::SessionResolved);
                caps.render.render();
            }

            Event::SessionResolved(result) => {
                match result {
                    Ok(AuthOutput::User(Some(user))) => {
                        Self::enter_feed(model, Session::from(user), caps);
                    }
                    Ok(_) => model.screen = Screen::Signin,
                    Err(e) => {
                        warn!(code = %e.code, "could not read current user");
                        model.screen = Screen::Signin;
                    }
                }
                caps.render.render();
            }

            Event::ShowSignup => {
                model.screen = Screen::Signup;
                model.clear_error();
                caps.render.render();
            }

            Event::ShowSignin => {
                model.screen = Screen::Signin;
                model.clear_error();
                caps.render.render();
            }

            Event::SignupFieldChanged { field, value } => {
                model.signup.set_field(field, value);
                caps.render.render();
            }

            Event::NewsletterToggled(opt_in) => {
                model.signup.newsletter_opt_in = opt_in;
                caps.render.render();
            }

            Event::SigninFieldChanged { field, value } => {
                model.signin.set_field(field, value);
                caps.render.render();
            }

            Event::SignupSubmitted => {
                if model.signup.submitting {
                    return;
                }
                match model.signup.validate() {
                    Ok(credentials) => {
                        let (email, password) = credentials.into_parts();
                        model.signup.submitting = true;
                        model.clear_error();
                        caps.auth.create_user(email, password, Event::SignupResponse);
                    }
                    Err(e) => model.set_error(AppError::from(e)),
                }
                caps.render.render();
            }

            Event::SignupResponse(result) => {
                model.signup.submitting = false;
                if Self::handle_auth_response(result, model, caps).is_some() {
                    model.signup.clear();
                    model.show_toast(SIGNUP_SUCCESS_MESSAGE, ToastKind::Success);
                }
                caps.render.render();
            }

            Event::SigninSubmitted => {
                if model.signin.submitting {
                    return;
                }
                match model.signin.validate() {
                    Ok(credentials) => {
                        let (email, password) = credentials.into_parts();
                        model.signin.submitting = true;
                        model.clear_error();
                        caps.auth.sign_in(email, password, Event::SigninResponse);
                    }
                    Err(e) => model.set_error(AppError::from(e)),
                }
                caps.render.render();
            }

            Event::SigninResponse(result) => {
                model.signin.submitting = false;
                if Self::handle_auth_response(result, model, caps).is_some() {
                    model.signin.clear();
                }
                caps.render.render();
            }

            Event::SignOutRequested => {
                caps.auth.sign_out(Event::SignedOut);
            }

            Event::SignedOut(result) => {
                match result {
                    Ok(_) => {
                        info!("signed out");
                        model.sign_out_locally();
                    }
                    Err(e) => {
                        warn!(code = %e.code, "sign-out failed");
                        model.set_error(AppError::from(e));
                    }
                }
                caps.render.render();
            }

            Event::RefreshFeed => {
                if !model.is_authenticated() || model.feed.is_refreshing {
                    return;
                }
                Self::send_refresh_request(model, caps);
                caps.render.render();
            }

            Event::FeedResponse(result) => {
                if !(model.is_authenticated() && model.feed.is_refreshing) {
                    debug!("dropping bounty feed response with no refresh in flight");
                    return;
                }
                model.feed.is_refreshing = false;
                match result {
                    Ok(bounties) => {
                        info!(count = bounties.len(), "bounty feed refreshed");
                        model.feed.replace(bounties, model.view_timestamp_ms);
                    }
                    Err(e) => {
                        let error = AppError::new(ErrorKind::Network, REFRESH_FAILED_MESSAGE)
                            .with_internal(e);
                        warn!(
                            error = %error,
                            retryable = error.is_retryable(),
                            "bounty feed refresh failed"
                        );
                        model.show_toast(error.message, ToastKind::Error);
                    }
                }
                caps.render.render();
            }

            Event::SelectBounty { id } => {
                let id = BountyId::new(id);
                if model.feed.find(&id).is_some() {
                    model.feed.selected = Some(id);
                    caps.render.render();
                } else {
                    debug!(%id, "selected bounty is not in the feed");
                }
            }

            Event::DismissBounty => {
                model.feed.selected = None;
                caps.render.render();
            }

            Event::ClearSearchArea => {
                model.search.clear_location();
                caps.render.render();
            }

            Event::OpenLocationPicker => {
                Self::open_picker(model, caps);
                caps.render.render();
            }

            Event::LocationPermissionResolved { session, status } => {
                let Some(picker) = model.picker_for(session) else {
                    debug!(%session, "dropping permission result for closed picker");
                    return;
                };
                let effects = picker.permission_resolved(status);
                Self::run_picker_effects(session, effects, caps);
                caps.render.render();
            }

            Event::PositionResolved { session, result } => {
                let Some(picker) = model.picker_for(session) else {
                    debug!(%session, "dropping position for closed picker");
                    return;
                };
                let effects = picker.position_resolved(result);
                Self::run_picker_effects(session, effects, caps);
                caps.render.render();
            }

            Event::MapLongPressed { coordinate } => {
                let Some(picker) = model.picker.as_mut() else {
                    debug!("long press without an open picker");
                    return;
                };
                let session = picker.session();
                let effects = picker.long_press(coordinate);
                Self::run_picker_effects(session, effects, caps);
                caps.render.render();
            }

            Event::PlaceSelected(details) => {
                let Some(picker) = model.picker.as_mut() else {
                    debug!("place selected without an open picker");
                    return;
                };
                let session = picker.session();
                let effects = picker.autocomplete_select(&details);
                Self::run_picker_effects(session, effects, caps);
                caps.render.render();
            }

            Event::GeocodeResolved {
                session,
                generation,
                result,
            } => {
                let Some(picker) = model.picker_for(session) else {
                    debug!(%session, "dropping geocode result for closed picker");
                    return;
                };
                if picker.geocode_resolved(generation, result) {
                    caps.render.render();
                }
            }

            Event::RadiusChanged { meters } => {
                if let Some(picker) = model.picker.as_mut() {
                    picker.set_radius_live(meters);
                    caps.render.render();
                }
            }

            Event::RadiusCommitted { meters } => {
                if let Some(picker) = model.picker.as_mut() {
                    picker.commit_radius(meters);
                    caps.render.render();
                }
            }

            Event::ConfirmLocation => {
                Self::close_picker(model, |picker, search| picker.confirm(search));
                if let Some(location) = model.search.location {
                    info!(
                        latitude = location.latitude,
                        longitude = location.longitude,
                        radius_m = model.search.radius.meters(),
                        "search area set"
                    );
                }
                caps.render.render();
            }

            Event::CancelLocation => {
                Self::close_picker(model, |picker, search| picker.cancel(search));
                caps.render.render();
            }

            Event::DismissToast => {
                model.clear_toast();
                caps.render.render();
            }

            Event::DismissError => {
                model.clear_error();
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        let now_ms = model.view_timestamp_ms;

        ViewModel {
            screen: Self::build_screen(model),
            error: model.active_error.as_ref().map(UserFacingError::from),
            toast: model
                .active_toast
                .as_ref()
                .filter(|t| !t.is_expired(now_ms))
                .map(ToastView::from),
            is_authenticated: model.is_authenticated(),
        }
    }
}
