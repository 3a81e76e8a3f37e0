use crux_core::{render::render, Command};
use log::debug;

use crate::events::{Event, PromptEvent};
use crate::model::Model;
use crate::types::{complete_password, PromptOutcome, SelectionError};
use crate::{Effect, WifiCmd};

use super::wifi::perform;

/// Handle password prompt events
pub fn handle(event: PromptEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        PromptEvent::Confirm => confirm_prompt(model),
        PromptEvent::Cancel => {
            if model.prompt.take().is_some() {
                render()
            } else {
                Command::done()
            }
        }
        PromptEvent::Edit { text } => match model.prompt.as_mut() {
            Some(prompt) if prompt.text != text => {
                prompt.text = text;
                render()
            }
            _ => Command::done(),
        },
    }
}

/// Close the prompt if its text is acceptable and act on it.
///
/// Always renders: the keyboard may have switched pages on the way here.
pub(crate) fn confirm_prompt(model: &mut Model) -> Command<Effect, Event> {
    let Some(prompt) = model.prompt.take() else {
        return Command::done();
    };

    let text = match prompt.confirm() {
        PromptOutcome::Pending => {
            model.prompt = Some(prompt);
            return render();
        }
        PromptOutcome::Cancelled => {
            debug!("prompt \"{}\" cancelled", prompt.title);
            return render();
        }
        PromptOutcome::Submitted(text) => text,
    };

    let Some(ssid) = prompt.ssid().map(str::to_string) else {
        model.wifi_status.tethering_password = text.clone();
        return Command::all([render(), WifiCmd::set_tethering_password(text)]);
    };

    match complete_password(&ssid, &text) {
        Ok(action) => Command::all([render(), perform(action, model)]),
        Err(SelectionError::TooShort) => {
            model.prompt = Some(prompt);
            render()
        }
        Err(e) => {
            debug!("no connection to {ssid}: {e}");
            render()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PasswordPrompt;
    use crate::update::test_support::issued;
    use crate::WifiOperation;

    fn model_with_prompt(prompt: PasswordPrompt, text: &str) -> Model {
        let mut prompt = prompt;
        prompt.text = text.to_string();
        Model {
            prompt: Some(prompt),
            ..Default::default()
        }
    }

    #[test]
    fn long_password_connects() {
        let mut model = model_with_prompt(PasswordPrompt::connect("home"), "password1");

        let issued = issued(handle(PromptEvent::Confirm, &mut model));

        assert!(model.prompt.is_none());
        assert_eq!(
            issued.wifi,
            vec![WifiOperation::ConnectWithPassword {
                ssid: "home".to_string(),
                password: "password1".to_string(),
            }]
        );
    }

    #[test]
    fn retry_prompt_connects_the_same_way() {
        let mut model = model_with_prompt(PasswordPrompt::retry("home"), "password2");

        let issued = issued(handle(PromptEvent::Confirm, &mut model));

        assert_eq!(
            issued.wifi,
            vec![WifiOperation::ConnectWithPassword {
                ssid: "home".to_string(),
                password: "password2".to_string(),
            }]
        );
    }

    #[test]
    fn empty_password_aborts_silently() {
        let mut model = model_with_prompt(PasswordPrompt::connect("home"), "");

        let issued = issued(handle(PromptEvent::Confirm, &mut model));

        assert!(model.prompt.is_none());
        assert!(issued.wifi.is_empty());
        assert!(model.error_message.is_none());
    }

    #[test]
    fn short_password_keeps_prompt_open() {
        let mut model = model_with_prompt(PasswordPrompt::connect("home"), "short");

        let issued = issued(handle(PromptEvent::Confirm, &mut model));

        assert!(model.prompt.is_some());
        assert!(issued.wifi.is_empty());
        assert_eq!(issued.renders, 1);
    }

    #[test]
    fn cancel_discards_prompt() {
        let mut model = model_with_prompt(PasswordPrompt::connect("home"), "password1");

        let issued = issued(handle(PromptEvent::Cancel, &mut model));

        assert!(model.prompt.is_none());
        assert!(issued.wifi.is_empty());
    }

    #[test]
    fn tethering_password_is_stored_and_sent() {
        let mut model = model_with_prompt(PasswordPrompt::tethering_password("old"), "newsecret");

        let issued = issued(handle(PromptEvent::Confirm, &mut model));

        assert_eq!(model.wifi_status.tethering_password, "newsecret");
        assert_eq!(
            issued.wifi,
            vec![WifiOperation::SetTetheringPassword {
                password: "newsecret".to_string()
            }]
        );
    }

    #[test]
    fn edit_replaces_text() {
        let mut model = model_with_prompt(PasswordPrompt::connect("home"), "abc");

        let _ = handle(
            PromptEvent::Edit {
                text: "abcdef".to_string(),
            },
            &mut model,
        );

        assert_eq!(model.prompt.map(|p| p.text), Some("abcdef".to_string()));
    }
}
