//! Key override rules and the first-match matcher

use std::fmt;

use crate::types::{Keycode, Layer, LayerState, ModMask};

/// Substitutes `replacement` for `trigger` while `mods` are held on one of `layers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOverride {
    /// Modifiers that must be held (see [`ModMask::satisfied_by`])
    pub mods: ModMask,
    /// Key that triggers the override
    pub trigger: Keycode,
    /// Keycode sent instead, modifiers included
    pub replacement: Keycode,
    /// Layers on which the override applies
    pub layers: LayerState,
}

impl KeyOverride {
    pub fn new(mods: ModMask, trigger: Keycode, replacement: Keycode, layers: LayerState) -> Self {
        Self {
            mods,
            trigger,
            replacement,
            layers,
        }
    }

    /// Convenience for rules bound to the given named layers
    pub fn on_layers(mods: ModMask, trigger: Keycode, replacement: Keycode, layers: &[Layer]) -> Self {
        Self::new(mods, trigger, replacement, LayerState::from_layers(layers))
    }

    /// Checks all three match conditions against a live event
    pub fn matches(&self, keycode: Keycode, mods: ModMask, active_layers: LayerState) -> bool {
        self.trigger == keycode
            && self.mods.satisfied_by(mods)
            && self.layers.intersects(active_layers)
    }

    /// Whether this rule matches every event that `later` would match.
    ///
    /// When true and `self` comes first, `later` can never fire.
    pub fn shadows(&self, later: &KeyOverride) -> bool {
        self.trigger == later.trigger
            && self.mods.implied_by(later.mods)
            && self.layers.contains(later.layers)
    }
}

impl fmt::Display for KeyOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} + {} => {} @ {}",
            self.mods, self.trigger, self.replacement, self.layers
        )
    }
}

/// A matched override, as reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideMatch {
    /// Position of the rule in its table
    pub index: usize,
    /// Keycode to send, modifiers included
    pub replacement: Keycode,
    /// Held trigger modifiers the host should release while sending
    pub suppressed_mods: ModMask,
}

/// Ordered override table.
///
/// Order is significant: compound-modifier rules must come before the rules
/// whose modifiers are a subset of theirs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    rules: Vec<KeyOverride>,
}

impl OverrideTable {
    pub fn new(rules: Vec<KeyOverride>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[KeyOverride] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Finds the first rule matching the event
    pub fn find_match(
        &self,
        keycode: Keycode,
        mods: ModMask,
        active_layers: LayerState,
    ) -> Option<OverrideMatch> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(keycode, mods, active_layers))
            .map(|(index, rule)| OverrideMatch {
                index,
                replacement: rule.replacement,
                suppressed_mods: rule.mods & mods,
            })
    }

    /// Pairs `(shadowed, shadowing)` of rules that can never fire
    pub fn shadowed_rules(&self) -> Vec<(usize, usize)> {
        let mut shadowed = Vec::new();
        for (later_idx, later) in self.rules.iter().enumerate() {
            if let Some(earlier_idx) = self.rules[..later_idx]
                .iter()
                .position(|earlier| earlier.shadows(later))
            {
                shadowed.push((later_idx, earlier_idx));
            }
        }
        shadowed
    }
}

impl From<Vec<KeyOverride>> for OverrideTable {
    fn from(rules: Vec<KeyOverride>) -> Self {
        Self::new(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bracket_rules() -> OverrideTable {
        let mac = [Layer::MacBase];
        OverrideTable::new(vec![
            KeyOverride::on_layers(
                ModMask::RALT | ModMask::RSFT,
                Keycode::LBRC,
                Keycode::N8.with_mods(ModMask::RALT),
                &mac,
            ),
            KeyOverride::on_layers(
                ModMask::ALT,
                Keycode::LBRC,
                Keycode::N5.with_mods(ModMask::RALT),
                &mac,
            ),
        ])
    }

    #[test]
    fn test_compound_rule_wins_when_listed_first() {
        let table = bracket_rules();
        let found = table
            .find_match(Keycode::LBRC, ModMask::RALT | ModMask::RSFT, Layer::MacBase.mask())
            .unwrap();
        assert_eq!(found.index, 0);
        assert_eq!(found.replacement, Keycode::N8.with_mods(ModMask::RALT));
        assert_eq!(found.suppressed_mods, ModMask::RALT | ModMask::RSFT);
    }

    #[test]
    fn test_single_modifier_rule() {
        let table = bracket_rules();
        let found = table
            .find_match(Keycode::LBRC, ModMask::LALT, Layer::MacBase.mask())
            .unwrap();
        assert_eq!(found.index, 1);
        assert_eq!(found.suppressed_mods, ModMask::LALT);
    }

    #[test]
    fn test_reversed_order_shadows_compound_rule() {
        let mut rules = bracket_rules().rules().to_vec();
        rules.reverse();
        let table = OverrideTable::new(rules);

        let found = table
            .find_match(Keycode::LBRC, ModMask::RALT | ModMask::RSFT, Layer::MacBase.mask())
            .unwrap();
        assert_eq!(found.replacement, Keycode::N5.with_mods(ModMask::RALT));
        assert_eq!(table.shadowed_rules(), vec![(1, 0)]);
    }

    #[test]
    fn test_layer_mask_must_intersect() {
        let table = bracket_rules();
        assert!(table
            .find_match(Keycode::LBRC, ModMask::LALT, Layer::WinBase.mask())
            .is_none());
    }

    #[test]
    fn test_no_match_without_modifiers() {
        let table = bracket_rules();
        assert!(table
            .find_match(Keycode::LBRC, ModMask::NONE, Layer::MacBase.mask())
            .is_none());
        assert!(table.shadowed_rules().is_empty());
    }
}
