//! Chord parsing: held modifiers plus one key

use std::fmt;

use crate::error::{Error, Result};
use crate::types::{Keycode, ModMask};

/// A key pressed while a set of modifiers is held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    /// Live modifiers, one bit per physical modifier key
    pub mods: ModMask,
    pub key: Keycode,
}

impl KeyChord {
    /// Parse a chord string like "RALT+RSFT+LBRC" or "lalt kc_rbrc"
    ///
    /// # Examples
    /// ```
    /// use keyrouter_core::chord::KeyChord;
    /// use keyrouter_core::types::{Keycode, ModMask};
    ///
    /// let chord = KeyChord::parse("RALT+RSFT+LBRC").unwrap();
    /// assert_eq!(chord.mods, ModMask::RALT | ModMask::RSFT);
    /// assert_eq!(chord.key, Keycode::LBRC);
    /// ```
    pub fn parse(chord_str: &str) -> Result<Self> {
        if chord_str.trim().is_empty() {
            return Err(Error::ParseError("Empty chord string".to_string()));
        }

        // Split by + or space, trim each part, convert to uppercase
        let parts: Vec<String> = chord_str
            .split(|c| c == '+' || c == ' ')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();

        if parts.is_empty() {
            return Err(Error::ParseError("No valid components in chord string".to_string()));
        }

        let mut mods = ModMask::NONE;
        let mut key: Option<Keycode> = None;

        for part in parts {
            if let Some(mask) = parse_modifier(&part) {
                mods |= mask;
                continue;
            }
            if key.is_some() {
                return Err(Error::ParseError(format!("Multiple keys specified: {:?}", part)));
            }
            key = Some(parse_key(&part)?);
        }

        match key {
            Some(key) => Ok(KeyChord { mods, key }),
            None => Err(Error::ParseError("No key specified in chord".to_string())),
        }
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in self.mods.bit_names() {
            write!(f, "{}+", name)?;
        }
        write!(f, "{}", self.key)
    }
}

/// Generic names stand for the left-hand key
fn parse_modifier(part: &str) -> Option<ModMask> {
    match part {
        "CTRL" | "CONTROL" => Some(ModMask::LCTL),
        "SHIFT" => Some(ModMask::LSFT),
        "ALT" | "OPTION" => Some(ModMask::LALT),
        "GUI" | "CMD" | "COMMAND" | "WIN" | "SUPER" => Some(ModMask::LGUI),
        // A lone "S" is a key here, not the shift shorthand
        "S" => None,
        _ => ModMask::from_name(part),
    }
}

fn parse_key(part: &str) -> Result<Keycode> {
    Keycode::from_name(part)
        .or_else(|| Keycode::from_name(&format!("KC_{}", part)))
        .ok_or_else(|| Error::ParseError(format!("Unknown key: {}", part)))
}
