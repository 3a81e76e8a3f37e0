use super::*;
use crux_core::testing::AppTester;

fn network(ssid: &str, security_type: SecurityType) -> Network {
    Network {
        ssid: ssid.to_string(),
        security_type,
        connected: ConnectedType::Disconnected,
        strength: 80,
        known: false,
    }
}

fn press(app: &AppTester<App>, label: &str, model: &mut Model) {
    let _command = app.update(
        Event::Keyboard(KeyboardEvent::KeyPressed {
            label: label.to_string(),
        }),
        model,
    );
}

#[test]
fn test_networks_refreshed() {
    let app = AppTester::<App>::default();
    let mut model = Model::default();
    let networks = vec![network("home", SecurityType::Wpa)];

    let _command = app.update(
        Event::Wifi(WifiEvent::NetworksRefreshed(networks.clone())),
        &mut model,
    );

    assert_eq!(model.networks, networks);
}

#[test]
fn test_password_typed_on_keyboard_connects() {
    let app = AppTester::<App>::default();
    let mut model = Model {
        networks: vec![network("home", SecurityType::Wpa)],
        ..Default::default()
    };

    let _command = app.update(
        Event::Wifi(WifiEvent::Select {
            ssid: "home".to_string(),
        }),
        &mut model,
    );
    assert!(model.prompt.is_some());

    press(&app, SHIFT_UP_KEY, &mut model);
    press(&app, "P", &mut model);
    for key in ["a", "s", "s", "w", "o", "r", "d"] {
        press(&app, key, &mut model);
    }
    press(&app, NUMBERS_KEY, &mut model);
    press(&app, "1", &mut model);

    assert_eq!(
        model.prompt.as_ref().map(|p| p.text.as_str()),
        Some("Password1")
    );
    assert_eq!(model.keyboard.mode, KeyboardMode::Numbers);

    press(&app, ENTER_KEY, &mut model);

    assert!(model.prompt.is_none());
    assert_eq!(model.keyboard.mode, KeyboardMode::Lower);
}

#[test]
fn test_wrong_password_reprompts() {
    let app = AppTester::<App>::default();
    let mut model = Model {
        networks: vec![network("home", SecurityType::Wpa)],
        ..Default::default()
    };

    let _command = app.update(
        Event::Wifi(WifiEvent::ConnectionFailed {
            ssid: "home".to_string(),
        }),
        &mut model,
    );

    assert_eq!(
        model.prompt.map(|p| p.title),
        Some("Wrong password".to_string())
    );
}

#[test]
fn test_view_lists_rows() {
    let app = App;
    let model = Model {
        networks: vec![
            network("home", SecurityType::Wpa),
            network("cafe", SecurityType::Open),
        ],
        ..Default::default()
    };

    let view = crux_core::App::view(&app, &model);

    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.rows[0].status_icon, StatusIcon::Lock);
    assert_eq!(view.rows[1].status_icon, StatusIcon::None);
    assert_eq!(view.keyboard_rows[0][0], "q");
}

#[test]
fn test_clear_error() {
    let app = AppTester::<App>::default();
    let mut model = Model {
        error_message: Some("Some error".to_string()),
        ..Default::default()
    };

    let _command = app.update(Event::Ui(UiEvent::ClearError), &mut model);

    assert_eq!(model.error_message, None);
}
