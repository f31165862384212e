use crate::parser::{KeyExpr, KlsFile, LayerDecl, LayerRef, LedDecl, LedValue, OverrideDecl};
use keyrouter_core::*;
use keyrouter_core::engine::{KeyOverride, OverrideTable};
use std::collections::HashMap;

pub struct Compiler {
    keycode_map: HashMap<&'static str, Keycode>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            keycode_map: create_keycode_map(),
        }
    }

    pub fn compile(self, ast: KlsFile) -> std::result::Result<KlbFile, KlsError> {
        if ast.layers.is_empty() {
            return Err(KlsError::Parse {
                line: 1,
                message: "No layers declared".to_string(),
            });
        }

        // Index every declared layer
        let mut declared: Vec<(u8, &LayerDecl)> = Vec::new();
        for decl in &ast.layers {
            let index = self.resolve_layer(&decl.layer)?;
            if declared.iter().any(|(existing, _)| *existing == index) {
                return Err(KlsError::DuplicateLayer(layer_label(&decl.layer)));
            }
            declared.push((index, decl));
        }

        let (rows, cols) = Self::dimensions(&ast.layers)?;
        let layer_count = declared.iter().map(|(index, _)| *index as usize + 1).max().unwrap_or(1);

        // Compile keymaps, filling undeclared layers with KC_TRNS
        let cells = rows * cols;
        let mut layers: Vec<Option<Vec<Keycode>>> = vec![None; layer_count];
        for (index, decl) in &declared {
            let mut keys = Vec::with_capacity(cells);
            for row in &decl.rows {
                for expr in row {
                    keys.push(self.resolve_key(expr)?);
                }
            }
            layers[*index as usize] = Some(keys);
        }

        let leds = match &ast.leds {
            Some(decl) => Self::compile_leds(decl, rows, cols)?,
            None => Self::derive_leds(&layers, rows, cols),
        };

        let mut keymap = Vec::with_capacity(layer_count * cells);
        for (index, keys) in layers.into_iter().enumerate() {
            let keys = keys.unwrap_or_else(|| {
                log::warn!("Layer {} not declared, filled with KC_TRNS", index);
                vec![Keycode::TRNS; cells]
            });
            keymap.extend(keys.iter().map(|key| key.raw()));
        }

        let overrides = self.compile_overrides(&ast.overrides)?;

        let mut klb = KlbFile::new(layer_count as u8, rows as u8, cols as u8);
        klb.keymap = keymap;
        klb.leds = leds;
        for rule in overrides.rules() {
            klb.add_override(rule.into());
        }
        self.add_info_entries(&mut klb, &ast.options)?;

        Ok(klb)
    }

    fn resolve_layer(&self, layer: &LayerRef) -> std::result::Result<u8, KlsError> {
        let index = match layer {
            LayerRef::Named(name) => Layer::from_name(name)
                .map(|layer| layer.index() as u32)
                .ok_or_else(|| KlsError::UnknownLayer(name.clone()))?,
            LayerRef::Index(index) => *index,
        };

        if index >= LayerState::MAX_LAYERS as u32 {
            return Err(KlsError::TooManyLayers(index as usize + 1));
        }
        Ok(index as u8)
    }

    /// Shared matrix size; every row of every layer must match the first
    fn dimensions(layers: &[LayerDecl]) -> std::result::Result<(usize, usize), KlsError> {
        let first = &layers[0];
        let rows = first.rows.len();
        let cols = first.rows[0].len();

        if cols == 0 {
            return Err(KlsError::EmptyRow {
                layer: layer_label(&first.layer),
                row: 0,
            });
        }

        if rows > u8::MAX as usize || cols > u8::MAX as usize {
            return Err(KlsError::RaggedLayout {
                layer: layer_label(&first.layer),
                row: 0,
                found: cols,
                expected: u8::MAX as usize,
            });
        }

        for decl in layers {
            if decl.rows.len() != rows {
                return Err(KlsError::RowCountMismatch {
                    layer: layer_label(&decl.layer),
                    found: decl.rows.len(),
                    expected: rows,
                });
            }
            for (row, keys) in decl.rows.iter().enumerate() {
                if keys.len() != cols {
                    return Err(KlsError::RaggedLayout {
                        layer: layer_label(&decl.layer),
                        row,
                        found: keys.len(),
                        expected: cols,
                    });
                }
            }
        }

        Ok((rows, cols))
    }

    fn resolve_key(&self, expr: &KeyExpr) -> std::result::Result<Keycode, KlsError> {
        match expr {
            KeyExpr::Name(name) => self
                .keycode_map
                .get(name.as_str())
                .copied()
                .ok_or_else(|| KlsError::UnknownKeycode(name.clone())),
            KeyExpr::Raw(raw) => u16::try_from(*raw)
                .map(Keycode)
                .map_err(|_| KlsError::UnknownKeycode(format!("{:#X}", raw))),
            KeyExpr::Call(func, arg) => match func.as_str() {
                "MO" | "TG" | "TO" | "DF" => {
                    let layer = self.resolve_layer(&Self::layer_arg(arg)?)?;
                    Ok(match func.as_str() {
                        "MO" => Keycode::momentary(layer),
                        "TG" => Keycode::toggle(layer),
                        "TO" => Keycode::to_layer(layer),
                        _ => Keycode::default_layer(layer),
                    })
                }
                wrapper => {
                    let mods = ModMask::from_name(wrapper)
                        .ok_or_else(|| KlsError::UnknownKeycode(format!("{}(...)", wrapper)))?;
                    let inner = self.resolve_key(arg)?;
                    if !inner.is_basic() && !inner.is_modified() {
                        return Err(KlsError::UnknownKeycode(format!(
                            "{}({}) wraps a non-basic keycode",
                            wrapper, inner
                        )));
                    }
                    Ok(inner.with_mods(inner.mods() | mods))
                }
            },
        }
    }

    fn layer_arg(arg: &KeyExpr) -> std::result::Result<LayerRef, KlsError> {
        match arg {
            KeyExpr::Name(name) => Ok(LayerRef::Named(name.clone())),
            KeyExpr::Raw(index) => Ok(LayerRef::Index(*index)),
            KeyExpr::Call(func, _) => Err(KlsError::UnknownLayer(format!("{}(...)", func))),
        }
    }

    fn compile_leds(decl: &LedDecl, rows: usize, cols: usize) -> std::result::Result<Vec<u8>, KlsError> {
        if decl.rows.len() != rows || decl.rows.iter().any(|row| row.len() != cols) {
            return Err(KlsError::InvalidLedMatrix(format!(
                "line {}: expected {} rows of {} entries",
                decl.line, rows, cols
            )));
        }

        let mut leds = Vec::with_capacity(rows * cols);
        for value in decl.rows.iter().flatten() {
            match value {
                LedValue::NoLed => leds.push(NO_LED),
                LedValue::Index(index) if *index < NO_LED as u32 => leds.push(*index as u8),
                LedValue::Index(index) => {
                    return Err(KlsError::InvalidLedMatrix(format!("LED index {} out of range", index)));
                }
            }
        }
        Ok(leds)
    }

    /// Numbers positions bound on any declared layer, row-major
    fn derive_leds(layers: &[Option<Vec<Keycode>>], rows: usize, cols: usize) -> Vec<u8> {
        let mut next = 0u8;
        (0..rows * cols)
            .map(|cell| {
                let populated = layers
                    .iter()
                    .flatten()
                    .any(|keys| keys[cell] != Keycode::NO);
                if populated && next < NO_LED {
                    next += 1;
                    next - 1
                } else {
                    NO_LED
                }
            })
            .collect()
    }

    fn compile_overrides(&self, decls: &[OverrideDecl]) -> std::result::Result<OverrideTable, KlsError> {
        let mut rules = Vec::with_capacity(decls.len());

        for decl in decls {
            let mut mods = ModMask::NONE;
            for name in &decl.mods {
                mods |= ModMask::from_name(name).ok_or_else(|| KlsError::UnknownModifier(name.clone()))?;
            }

            let mut layers = LayerState::EMPTY;
            for layer in &decl.layers {
                layers = layers.with(self.resolve_layer(layer)?);
            }

            rules.push(KeyOverride::new(
                mods,
                self.resolve_key(&decl.trigger)?,
                self.resolve_key(&decl.replacement)?,
                layers,
            ));
        }

        let table = OverrideTable::new(rules);
        if let Some(&(shadowed, shadowing)) = table.shadowed_rules().first() {
            log::warn!(
                "override at line {} is shadowed by the one at line {}",
                decls[shadowed].line,
                decls[shadowing].line
            );
            return Err(KlsError::ShadowedOverride {
                shadowed: shadowed + 1,
                shadowing: shadowing + 1,
            });
        }

        Ok(table)
    }

    fn add_info_entries(&self, klb: &mut KlbFile, options: &HashMap<String, String>) -> std::result::Result<(), KlsError> {
        if let Some(name) = options.get("NAME") {
            klb.add_info(INFO_NAME, name.as_bytes().to_vec());
        }
        if let Some(desc) = options.get("DESCRIPTION") {
            klb.add_info(INFO_DESCRIPTION, desc.as_bytes().to_vec());
        }
        if let Some(interval) = options.get("DEBUG_INTERVAL") {
            let value: u16 = interval.parse().map_err(|_| KlsError::InvalidOption {
                name: "DEBUG_INTERVAL".to_string(),
                value: interval.clone(),
            })?;
            klb.add_info(INFO_DEBUG_INTERVAL, value.to_le_bytes().to_vec());
        }
        Ok(())
    }
}

fn layer_label(layer: &LayerRef) -> String {
    match layer {
        LayerRef::Named(name) => name.clone(),
        LayerRef::Index(index) => index.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn compile(input: &str) -> std::result::Result<KlbFile, KlsError> {
        let ast = Parser::new(input).parse()?;
        Compiler::new().compile(ast)
    }

    #[test]
    fn test_undeclared_layers_are_transparent() {
        let klb = compile("layer 2 { [ KC_A KC_B ] }").unwrap();
        assert_eq!(klb.header.layer_count, 3);
        assert_eq!(&klb.keymap[..4], &[1, 1, 1, 1]);
        assert_eq!(&klb.keymap[4..], &[0x04, 0x05]);
    }

    #[test]
    fn test_wrappers_nest() {
        let klb = compile("layer 0 { [ RALT(LSFT(KC_8)) MO(NUMPAD) ] }").unwrap();
        assert_eq!(klb.keymap[0], 0x1625);
        assert_eq!(klb.keymap[1], 0x5225);
    }

    #[test]
    fn test_derived_leds_skip_unbound() {
        let klb = compile("layer 0 { [ KC_A XXXXXXX KC_B ] }").unwrap();
        assert_eq!(klb.leds, vec![0, NO_LED, 1]);
    }

    #[test]
    fn test_shadowed_override_rejected() {
        let input = "layer 0 { [ KC_LBRC ] }\n\
                     override MOD_MASK_ALT + KC_LBRC => RALT(KC_5) @ MAC_BASE\n\
                     override MOD_BIT_RALT | MOD_BIT_RSHIFT + KC_LBRC => RALT(KC_8) @ MAC_BASE";
        assert!(matches!(
            compile(input),
            Err(KlsError::ShadowedOverride { shadowed: 2, shadowing: 1 })
        ));
    }

    #[test]
    fn test_debug_interval_option() {
        let klb = compile("// @DEBUG_INTERVAL = \"250\"\nlayer 0 { [ KC_A ] }").unwrap();
        assert_eq!(klb.info_u16(INFO_DEBUG_INTERVAL), Some(250));
    }
}
