use bounty_shared::auth::{SigninField, SignupField};
use bounty_shared::capabilities::{AuthError, AuthOperation, AuthOutput, AuthUser};
use bounty_shared::view::ScreenView;
use bounty_shared::{App, Effect, Event, Model, Screen, ToastKind, Viewport};
use crux_core::testing::AppTester;
use crux_core::Request;

fn take_auth(effects: &mut Vec<Effect>) -> Request<AuthOperation> {
    let index = effects
        .iter()
        .position(|e| matches!(e, Effect::Auth(_)))
        .expect("expected an auth request");
    match effects.remove(index) {
        Effect::Auth(request) => request,
        _ => unreachable!(),
    }
}

fn user() -> AuthUser {
    AuthUser {
        uid: "user-1".into(),
        email: Some("hunter@example.com".into()),
    }
}

fn start(app: &AppTester<App, Effect>, model: &mut Model) -> Request<AuthOperation> {
    let mut update = app.update(
        Event::AppStarted {
            config: None,
            viewport: Viewport::new(390.0, 844.0),
        },
        model,
    );
    let request = take_auth(&mut update.effects);
    assert_eq!(request.operation, AuthOperation::CurrentUser);
    request
}

fn fill_signup(app: &AppTester<App, Effect>, model: &mut Model, password: &str, confirm: &str) {
    app.update(Event::ShowSignup, model);
    app.update(
        Event::SignupFieldChanged {
            field: SignupField::Email,
            value: "hunter@example.com".into(),
        },
        model,
    );
    app.update(
        Event::SignupFieldChanged {
            field: SignupField::Password,
            value: password.into(),
        },
        model,
    );
    app.update(
        Event::SignupFieldChanged {
            field: SignupField::ConfirmPassword,
            value: confirm.into(),
        },
        model,
    );
}

#[test]
fn test_startup_without_user_routes_to_signin() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let mut request = start(&app, &mut model);
    assert_eq!(model.screen, Screen::Loading);

    let update = app
        .resolve(&mut request, Ok(AuthOutput::User(None)))
        .expect("current user resolves");
    for event in update.events {
        app.update(event, &mut model);
    }

    assert_eq!(model.screen, Screen::Signin);
    assert!(matches!(app.view(&model).screen, ScreenView::Signin(_)));
}

#[test]
fn test_startup_with_user_loads_feed() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let mut request = start(&app, &mut model);
    let update = app
        .resolve(&mut request, Ok(AuthOutput::User(Some(user()))))
        .expect("current user resolves");

    let mut effects = Vec::new();
    for event in update.events {
        effects.extend(app.update(event, &mut model).effects);
    }

    assert_eq!(model.screen, Screen::Feed);
    assert!(model.feed.is_refreshing);
    assert!(effects.iter().any(|e| matches!(e, Effect::Http(_))));
}

#[test]
fn test_startup_uses_viewport_for_region() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    start(&app, &mut model);

    let region = model.initial_region;
    assert!((region.longitude_delta - region.latitude_delta * 390.0 / 844.0).abs() < 1e-12);
}

#[test]
fn test_invalid_config_falls_back_to_defaults() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let config = bounty_shared::AppConfig {
        api_base_url: "not a url".into(),
        ..bounty_shared::AppConfig::default()
    };
    app.update(
        Event::AppStarted {
            config: Some(config),
            viewport: Viewport::default(),
        },
        &mut model,
    );

    assert_eq!(model.config, bounty_shared::AppConfig::default());
    assert!(model.active_error.is_some());
}

#[test]
fn test_signup_with_mismatched_passwords() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    fill_signup(&app, &mut model, "secret1", "secret2");

    let update = app.update(Event::SignupSubmitted, &mut model);

    assert!(!update.effects.iter().any(|e| matches!(e, Effect::Auth(_))));
    let error = app.view(&model).error.expect("error shown");
    assert_eq!(error.message, "Passwords do not match");
}

#[test]
fn test_signup_with_empty_fields() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    app.update(Event::ShowSignup, &mut model);

    app.update(Event::SignupSubmitted, &mut model);

    let error = app.view(&model).error.expect("error shown");
    assert_eq!(error.message, "Please fill in all fields");
}

#[test]
fn test_signup_success_shows_toast_and_opens_feed() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    fill_signup(&app, &mut model, "secret1", "secret1");

    let mut update = app.update(Event::SignupSubmitted, &mut model);
    assert!(model.signup.submitting);
    let mut request = take_auth(&mut update.effects);
    assert_eq!(
        request.operation,
        AuthOperation::CreateUser {
            email: "hunter@example.com".into(),
            password: "secret1".into(),
        }
    );

    let resolved = app
        .resolve(&mut request, Ok(AuthOutput::User(Some(user()))))
        .expect("create user resolves");
    for event in resolved.events {
        app.update(event, &mut model);
    }

    assert_eq!(model.screen, Screen::Feed);
    assert!(!model.signup.submitting);
    assert!(model.signup.email.is_empty());
    let toast = model.active_toast.as_ref().expect("toast shown");
    assert_eq!(toast.message, "Account created successfully");
    assert_eq!(toast.kind, ToastKind::Success);
}

#[test]
fn test_signup_provider_error_maps_to_message() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    fill_signup(&app, &mut model, "secret1", "secret1");

    let mut update = app.update(Event::SignupSubmitted, &mut model);
    let mut request = take_auth(&mut update.effects);
    let resolved = app
        .resolve(
            &mut request,
            Err(AuthError::new(AuthError::EMAIL_IN_USE, "already registered")),
        )
        .expect("create user resolves");
    for event in resolved.events {
        app.update(event, &mut model);
    }

    assert_eq!(model.screen, Screen::Signup);
    assert!(!model.signup.submitting);
    let error = app.view(&model).error.expect("error shown");
    assert_eq!(error.message, "That email address is already in use!");
}

#[test]
fn test_signin_then_sign_out() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    app.update(Event::ShowSignin, &mut model);
    app.update(
        Event::SigninFieldChanged {
            field: SigninField::Email,
            value: "hunter@example.com".into(),
        },
        &mut model,
    );
    app.update(
        Event::SigninFieldChanged {
            field: SigninField::Password,
            value: "secret1".into(),
        },
        &mut model,
    );

    let mut update = app.update(Event::SigninSubmitted, &mut model);
    let mut request = take_auth(&mut update.effects);
    let resolved = app
        .resolve(&mut request, Ok(AuthOutput::User(Some(user()))))
        .expect("sign in resolves");
    for event in resolved.events {
        app.update(event, &mut model);
    }
    assert_eq!(model.screen, Screen::Feed);
    assert!(model.is_authenticated());

    let mut update = app.update(Event::SignOutRequested, &mut model);
    let mut request = take_auth(&mut update.effects);
    assert_eq!(request.operation, AuthOperation::SignOut);
    let resolved = app
        .resolve(&mut request, Ok(AuthOutput::SignedOut))
        .expect("sign out resolves");
    for event in resolved.events {
        app.update(event, &mut model);
    }

    assert_eq!(model.screen, Screen::Signin);
    assert!(!model.is_authenticated());
}
