//! Key-cap tables for the built-in layers.
//!
//! Each layer is four rows; each row is either one key group (centred) or
//! three (left, middle, right). Row 2 is laid out as the shift row and row 3
//! as the space-bar row.

use crate::types::{CaseState, KeyboardAction, KeyboardType};

/// Rows of key groups, ready for `KeyRow::set_up`.
pub type KeyCapRows = Vec<Vec<Vec<KeyboardAction>>>;

fn chars(keys: &[&str]) -> Vec<KeyboardAction> {
    keys.iter().map(|&key| KeyboardAction::from(key)).collect()
}

fn widened_symbols() -> Vec<KeyboardAction> {
    chars(&[".", ",", "?", "!", "'"])
}

fn space_bar_row(layer_key: KeyboardType) -> Vec<Vec<KeyboardAction>> {
    vec![
        vec![KeyboardAction::KeyboardType(layer_key), KeyboardAction::NextKeyboard],
        vec![KeyboardAction::Space],
        vec![".".into(), KeyboardAction::NewLine],
    ]
}

pub fn letters() -> KeyCapRows {
    vec![
        vec![chars(&["q", "w", "e", "r", "t", "y", "u", "i", "o", "p"])],
        vec![chars(&["a", "s", "d", "f", "g", "h", "j", "k", "l"])],
        vec![
            vec![KeyboardAction::Shift],
            chars(&["z", "x", "c", "v", "b", "n", "m"]),
            vec![KeyboardAction::Backspace],
        ],
        space_bar_row(KeyboardType::Numeric),
    ]
}

pub fn numbers() -> KeyCapRows {
    vec![
        vec![chars(&["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"])],
        vec![chars(&["-", "/", ":", ";", "(", ")", "$", "&", "@", "\""])],
        vec![
            vec![KeyboardAction::KeyboardType(KeyboardType::Symbolic)],
            widened_symbols(),
            vec![KeyboardAction::Backspace],
        ],
        space_bar_row(KeyboardType::Alphabetic(CaseState::Lowercased)),
    ]
}

pub fn symbols() -> KeyCapRows {
    vec![
        vec![chars(&["[", "]", "{", "}", "#", "%", "^", "*", "+", "="])],
        vec![chars(&["_", "\\", "|", "~", "<", ">", "€", "£", "¥", "•"])],
        vec![
            vec![KeyboardAction::KeyboardType(KeyboardType::Numeric)],
            widened_symbols(),
            vec![KeyboardAction::Backspace],
        ],
        space_bar_row(KeyboardType::Alphabetic(CaseState::Lowercased)),
    ]
}

/// Map a lower-case letter layer to the given case.
fn apply_case(action: KeyboardAction, case: CaseState) -> KeyboardAction {
    match (action, case) {
        (action, CaseState::Lowercased) => action,
        (KeyboardAction::Character(text), _) => KeyboardAction::Character(text.to_uppercase()),
        (KeyboardAction::Shift, CaseState::CapsLocked) => KeyboardAction::CapsLock,
        (KeyboardAction::Shift, _) => KeyboardAction::ShiftDown,
        (action, _) => action,
    }
}

/// Key caps for a keyboard type. `Emojis` has no built-in table.
pub fn key_caps(keyboard_type: KeyboardType) -> Option<KeyCapRows> {
    match keyboard_type {
        KeyboardType::Alphabetic(case) => Some(
            letters()
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|group| group.into_iter().map(|action| apply_case(action, case)).collect())
                        .collect()
                })
                .collect(),
        ),
        KeyboardType::Numeric => Some(numbers()),
        KeyboardType::Symbolic => Some(symbols()),
        KeyboardType::Emojis => None,
    }
}
