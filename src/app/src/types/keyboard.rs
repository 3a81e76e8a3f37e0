//! On-screen keyboard pages and the rules for switching between them.

use serde::{Deserialize, Serialize};

pub const SHIFT_UP_KEY: &str = "↑";
pub const SHIFT_DOWN_KEY: &str = "↓";
pub const LETTERS_KEY: &str = "ABC";
pub const NUMBERS_KEY: &str = "123";
pub const SYMBOLS_KEY: &str = "#+=";
pub const BACKSPACE_KEY: &str = "⌫";
pub const ENTER_KEY: &str = "⏎";
/// The wide space bar is labelled with two spaces
pub const SPACE_KEY: &str = "  ";

/// Keys that switch pages and are never forwarded as input
pub const MODE_MARKERS: [&str; 5] = [
    SHIFT_UP_KEY,
    SHIFT_DOWN_KEY,
    LETTERS_KEY,
    SYMBOLS_KEY,
    NUMBERS_KEY,
];

type Layout = &'static [&'static [&'static str]];

const LOWER: Layout = &[
    &["q", "w", "e", "r", "t", "y", "u", "i", "o", "p"],
    &["a", "s", "d", "f", "g", "h", "j", "k", "l"],
    &[SHIFT_UP_KEY, "z", "x", "c", "v", "b", "n", "m", BACKSPACE_KEY],
    &[NUMBERS_KEY, SPACE_KEY, ".", ENTER_KEY],
];

const UPPER: Layout = &[
    &["Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P"],
    &["A", "S", "D", "F", "G", "H", "J", "K", "L"],
    &[SHIFT_DOWN_KEY, "Z", "X", "C", "V", "B", "N", "M", BACKSPACE_KEY],
    &[NUMBERS_KEY, SPACE_KEY, ".", ENTER_KEY],
];

const NUMBERS: Layout = &[
    &["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"],
    &["-", "/", ":", ";", "(", ")", "$", "&", "@", "\""],
    &[SYMBOLS_KEY, ".", ",", "?", "!", "`", BACKSPACE_KEY],
    &[LETTERS_KEY, SPACE_KEY, ".", ENTER_KEY],
];

const SYMBOLS: Layout = &[
    &["[", "]", "{", "}", "#", "%", "^", "*", "+", "="],
    &["_", "\\", "|", "~", "<", ">", "€", "£", "¥", "•"],
    &[NUMBERS_KEY, ".", ",", "?", "!", "`", BACKSPACE_KEY],
    &[LETTERS_KEY, SPACE_KEY, ".", ENTER_KEY],
];

/// Currently displayed key page
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum KeyboardMode {
    #[default]
    Lower,
    Upper,
    Numbers,
    Symbols,
}

impl KeyboardMode {
    /// Page shown after pressing `label` on this page.
    ///
    /// A single capital letter drops back to lowercase; there is no caps lock.
    pub fn next(self, label: &str) -> Self {
        match label {
            SHIFT_UP_KEY => KeyboardMode::Upper,
            SHIFT_DOWN_KEY | LETTERS_KEY | ENTER_KEY => KeyboardMode::Lower,
            NUMBERS_KEY => KeyboardMode::Numbers,
            SYMBOLS_KEY => KeyboardMode::Symbols,
            _ if is_capital_letter(label) => KeyboardMode::Lower,
            _ => self,
        }
    }

    /// Rows of key labels for this page, top to bottom
    pub fn layout(self) -> Layout {
        match self {
            KeyboardMode::Lower => LOWER,
            KeyboardMode::Upper => UPPER,
            KeyboardMode::Numbers => NUMBERS,
            KeyboardMode::Symbols => SYMBOLS,
        }
    }
}

fn is_capital_letter(label: &str) -> bool {
    let mut chars = label.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_uppercase())
}

pub fn is_mode_marker(label: &str) -> bool {
    MODE_MARKERS.contains(&label)
}

/// Input delivered to the text sink for a forwarded key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum KeyCommand {
    Text(String),
    Backspace,
    Enter,
}

impl KeyCommand {
    pub fn from_label(label: &str) -> Self {
        match label {
            BACKSPACE_KEY => KeyCommand::Backspace,
            ENTER_KEY => KeyCommand::Enter,
            SPACE_KEY => KeyCommand::Text(" ".to_string()),
            other => KeyCommand::Text(other.to_string()),
        }
    }
}

/// Keyboard state: only the current page survives between presses
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Keyboard {
    pub mode: KeyboardMode,
}

impl Keyboard {
    /// Apply a key press; returns the command to forward, if any
    pub fn press(&mut self, label: &str) -> Option<KeyCommand> {
        self.mode = self.mode.next(label);

        if is_mode_marker(label) {
            None
        } else {
            Some(KeyCommand::from_label(label))
        }
    }

    /// Key rows of the current page, owned for the view model
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.mode
            .layout()
            .iter()
            .map(|row| row.iter().map(|key| key.to_string()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyboard(mode: KeyboardMode) -> Keyboard {
        Keyboard { mode }
    }

    mod transitions {
        use super::*;

        #[test]
        fn shift_up_switches_to_uppercase() {
            let mut kb = Keyboard::default();

            assert_eq!(kb.press(SHIFT_UP_KEY), None);
            assert_eq!(kb.mode, KeyboardMode::Upper);
        }

        #[test]
        fn capital_letter_is_forwarded_and_reverts_to_lowercase() {
            let mut kb = keyboard(KeyboardMode::Upper);

            assert_eq!(kb.press("A"), Some(KeyCommand::Text("A".to_string())));
            assert_eq!(kb.mode, KeyboardMode::Lower);
        }

        #[test]
        fn numbers_key_switches_page_without_forwarding() {
            let mut kb = Keyboard::default();

            assert_eq!(kb.press(NUMBERS_KEY), None);
            assert_eq!(kb.mode, KeyboardMode::Numbers);
        }

        #[test]
        fn digit_is_forwarded_and_keeps_page() {
            let mut kb = keyboard(KeyboardMode::Numbers);

            assert_eq!(kb.press("5"), Some(KeyCommand::Text("5".to_string())));
            assert_eq!(kb.mode, KeyboardMode::Numbers);
        }

        #[test]
        fn marker_keys_select_their_pages() {
            assert_eq!(KeyboardMode::Upper.next(SHIFT_DOWN_KEY), KeyboardMode::Lower);
            assert_eq!(KeyboardMode::Symbols.next(LETTERS_KEY), KeyboardMode::Lower);
            assert_eq!(KeyboardMode::Numbers.next(SYMBOLS_KEY), KeyboardMode::Symbols);
            assert_eq!(KeyboardMode::Symbols.next(NUMBERS_KEY), KeyboardMode::Numbers);
        }

        #[test]
        fn enter_is_forwarded_and_resets_to_lowercase() {
            let mut kb = keyboard(KeyboardMode::Symbols);

            assert_eq!(kb.press(ENTER_KEY), Some(KeyCommand::Enter));
            assert_eq!(kb.mode, KeyboardMode::Lower);
        }

        #[test]
        fn multi_letter_labels_are_not_capitals() {
            assert_eq!(KeyboardMode::Numbers.next("AB"), KeyboardMode::Numbers);
            assert_eq!(KeyboardMode::Numbers.next("a"), KeyboardMode::Numbers);
            assert_eq!(KeyboardMode::Numbers.next("Ä"), KeyboardMode::Numbers);
        }

        #[test]
        fn lowercase_letter_keeps_page() {
            let mut kb = Keyboard::default();

            assert_eq!(kb.press("q"), Some(KeyCommand::Text("q".to_string())));
            assert_eq!(kb.mode, KeyboardMode::Lower);
        }
    }

    mod commands {
        use super::*;

        #[test]
        fn special_keys_map_to_commands() {
            assert_eq!(KeyCommand::from_label(BACKSPACE_KEY), KeyCommand::Backspace);
            assert_eq!(KeyCommand::from_label(ENTER_KEY), KeyCommand::Enter);
            assert_eq!(
                KeyCommand::from_label(SPACE_KEY),
                KeyCommand::Text(" ".to_string())
            );
        }
    }

    mod layouts {
        use super::*;

        #[test]
        fn every_page_can_reach_letters_and_enter() {
            for mode in [
                KeyboardMode::Lower,
                KeyboardMode::Upper,
                KeyboardMode::Numbers,
                KeyboardMode::Symbols,
            ] {
                let keys: Vec<&str> = mode.layout().iter().flat_map(|r| r.iter().copied()).collect();

                assert!(keys.contains(&ENTER_KEY), "{mode:?} lacks enter");
                assert!(keys.contains(&BACKSPACE_KEY), "{mode:?} lacks backspace");
            }
        }

        #[test]
        fn rows_follow_the_current_page() {
            let kb = keyboard(KeyboardMode::Upper);

            assert_eq!(kb.rows()[0][0], "Q");
            assert_eq!(kb.rows()[2][0], SHIFT_DOWN_KEY);
        }
    }
}
