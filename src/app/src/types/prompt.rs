use serde::{Deserialize, Serialize};

use super::keyboard::KeyCommand;
use super::selection::MIN_PASSWORD_LENGTH;

/// What the entered text will be used for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PromptPurpose {
    Connect { ssid: String },
    /// Re-entry after the network manager rejected the passphrase
    RetryConnect { ssid: String },
    TetheringPassword,
}

/// Result of confirming a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// Text is non-empty but shorter than the minimum, the prompt stays open
    Pending,
    Cancelled,
    Submitted(String),
}

/// The single outstanding text prompt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordPrompt {
    pub purpose: PromptPurpose,
    pub title: String,
    pub subtitle: String,
    pub text: String,
    pub min_length: usize,
}

impl PasswordPrompt {
    pub fn connect(ssid: impl Into<String>) -> Self {
        let ssid = ssid.into();
        Self::new(
            "Enter password",
            format!("for \"{ssid}\""),
            PromptPurpose::Connect { ssid },
        )
    }

    pub fn retry(ssid: impl Into<String>) -> Self {
        let ssid = ssid.into();
        Self::new(
            "Wrong password",
            format!("for \"{ssid}\""),
            PromptPurpose::RetryConnect { ssid },
        )
    }

    /// Prompt for a new tethering password, pre-filled with the current one
    pub fn tethering_password(current: impl Into<String>) -> Self {
        let mut prompt = Self::new(
            "Enter new tethering password",
            String::new(),
            PromptPurpose::TetheringPassword,
        );
        prompt.text = current.into();
        prompt
    }

    fn new(title: &str, subtitle: String, purpose: PromptPurpose) -> Self {
        Self {
            purpose,
            title: title.to_string(),
            subtitle,
            text: String::new(),
            min_length: MIN_PASSWORD_LENGTH,
        }
    }

    /// Network this prompt connects to, if any
    pub fn ssid(&self) -> Option<&str> {
        match &self.purpose {
            PromptPurpose::Connect { ssid } | PromptPurpose::RetryConnect { ssid } => Some(ssid),
            PromptPurpose::TetheringPassword => None,
        }
    }

    /// Edit the buffer with a forwarded key.
    ///
    /// Returns true when the key asks to confirm the prompt.
    pub fn apply(&mut self, command: &KeyCommand) -> bool {
        match command {
            KeyCommand::Text(text) => {
                self.text.push_str(text);
                false
            }
            KeyCommand::Backspace => {
                self.text.pop();
                false
            }
            KeyCommand::Enter => true,
        }
    }

    pub fn confirm(&self) -> PromptOutcome {
        if self.text.is_empty() {
            PromptOutcome::Cancelled
        } else if self.text.chars().count() < self.min_length {
            PromptOutcome::Pending
        } else {
            PromptOutcome::Submitted(self.text.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_prompt_names_the_network() {
        let prompt = PasswordPrompt::connect("home");

        assert_eq!(prompt.title, "Enter password");
        assert_eq!(prompt.subtitle, "for \"home\"");
        assert_eq!(prompt.ssid(), Some("home"));
        assert_eq!(prompt.min_length, 8);
    }

    #[test]
    fn tethering_prompt_is_prefilled() {
        let prompt = PasswordPrompt::tethering_password("swordfish");

        assert_eq!(prompt.text, "swordfish");
        assert_eq!(prompt.ssid(), None);
    }

    #[test]
    fn keys_edit_the_buffer() {
        let mut prompt = PasswordPrompt::connect("home");

        assert!(!prompt.apply(&KeyCommand::Text("a".to_string())));
        assert!(!prompt.apply(&KeyCommand::Text("b".to_string())));
        assert!(!prompt.apply(&KeyCommand::Backspace));
        assert!(prompt.apply(&KeyCommand::Enter));
        assert_eq!(prompt.text, "a");
    }

    #[test]
    fn backspace_on_empty_buffer_is_harmless() {
        let mut prompt = PasswordPrompt::retry("home");

        prompt.apply(&KeyCommand::Backspace);

        assert_eq!(prompt.text, "");
    }

    #[test]
    fn confirm_enforces_minimum_length() {
        let mut prompt = PasswordPrompt::connect("home");
        assert_eq!(prompt.confirm(), PromptOutcome::Cancelled);

        prompt.text = "short".to_string();
        assert_eq!(prompt.confirm(), PromptOutcome::Pending);

        prompt.text = "longenough".to_string();
        assert_eq!(
            prompt.confirm(),
            PromptOutcome::Submitted("longenough".to_string())
        );
    }

    #[test]
    fn minimum_length_counts_characters_not_bytes() {
        let mut prompt = PasswordPrompt::connect("home");
        prompt.text = "ääää".to_string();

        assert_eq!(prompt.confirm(), PromptOutcome::Pending);
    }
}
