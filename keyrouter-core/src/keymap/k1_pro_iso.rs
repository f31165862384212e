use crate::{
    engine::{CustomKeyAction, KeyOverride, OverrideTable},
    types::{Keycode as K, Layer, ModMask},
};

use super::Keymap;

pub const MATRIX_ROWS: usize = 6;
pub const MATRIX_COLS: usize = 17;

/// Populated positions per row, packed from column 0
const ROW_LENGTHS: [usize; MATRIX_ROWS] = [16, 17, 16, 14, 14, 11];

type Grid = [[K; MATRIX_COLS]; MATRIX_ROWS];

const ___: K = K::TRNS;
const XXX: K = K::NO;

const MOFN: K = CustomKeyAction::MomentaryFn.keycode();
const MOF_HL: K = CustomKeyAction::MomentaryOffHighest.keycode();

const MAC_BASE: Grid = [
    [K::ESC, K::BRID, K::BRIU, K::MCTL, K::LPAD, K::RGB_VAD, K::RGB_VAI, K::MPRV, K::MPLY, K::MNXT, K::MUTE, K::VOLD, K::VOLU, K::SNAP, K::SIRI, K::RGB_MOD, XXX],
    [K::GRV, K::N1, K::N2, K::N3, K::N4, K::N5, K::N6, K::N7, K::N8, K::N9, K::N0, K::MINS, K::EQL, K::BSPC, K::INS, K::HOME, K::PGUP],
    [K::TAB, K::Q, K::W, K::E, K::R, K::T, K::Y, K::U, K::I, K::O, K::P, K::LBRC, K::RBRC, K::DEL, K::END, K::PGDN, XXX],
    [K::CAPS, K::A, K::S, K::D, K::F, K::G, K::H, K::J, K::K, K::L, K::SCLN, K::QUOT, K::NUHS, K::ENT, XXX, XXX, XXX],
    [K::LSFT, K::NUBS, K::Z, K::X, K::C, K::V, K::B, K::N, K::M, K::COMM, K::DOT, K::SLSH, K::RSFT, K::UP, XXX, XXX, XXX],
    [K::LCTL, K::LOPTN, K::LCMMD, K::SPC, K::RCMMD, K::ROPTN, MOFN, K::RCTL, K::LEFT, K::DOWN, K::RGHT, XXX, XXX, XXX, XXX, XXX, XXX],
];

const WIN_BASE: Grid = [
    [K::ESC, K::F1, K::F2, K::F3, K::F4, K::F5, K::F6, K::F7, K::F8, K::F9, K::F10, K::F11, K::F12, K::PSCR, K::CTANA, K::RGB_MOD, XXX],
    MAC_BASE[1],
    MAC_BASE[2],
    MAC_BASE[3],
    MAC_BASE[4],
    [K::LCTL, K::LGUI, K::LALT, K::SPC, K::RALT, K::RGUI, MOFN, K::RCTL, K::LEFT, K::DOWN, K::RGHT, XXX, XXX, XXX, XXX, XXX, XXX],
];

/// Every populated position transparent
fn transparent() -> Grid {
    let mut grid = [[XXX; MATRIX_COLS]; MATRIX_ROWS];
    for (row, &len) in ROW_LENGTHS.iter().enumerate() {
        for key in grid[row].iter_mut().take(len) {
            *key = ___;
        }
    }
    grid
}

fn set_row(grid: &mut Grid, row: usize, from_col: usize, keys: &[K]) {
    grid[row][from_col..from_col + keys.len()].copy_from_slice(keys);
}

/// Rows shared by both OS fn layers below the top row
fn fn_common(grid: &mut Grid) {
    set_row(grid, 1, 1, &[K::BT_HST1, K::BT_HST2, K::BT_HST3]);
    set_row(grid, 2, 0, &[K::RGB_TOG, K::RGB_MOD, K::RGB_VAI, K::RGB_HUI, K::RGB_SAI, K::RGB_SPI]);
    set_row(grid, 3, 1, &[K::RGB_RMOD, K::RGB_VAD, K::RGB_HUD, K::RGB_SAD, K::RGB_SPD]);
    set_row(grid, 4, 6, &[K::BAT_LVL, K::NK_TOGG]);
}

fn mac_fn() -> Grid {
    let mut grid = transparent();
    set_row(&mut grid, 0, 1, &[K::F1, K::F2, K::F3, K::F4, K::F5, K::F6, K::F7, K::F8, K::F9, K::F10, K::F11, K::F12]);
    grid[0][15] = K::RGB_TOG;
    fn_common(&mut grid);
    grid
}

fn win_fn() -> Grid {
    let mut grid = transparent();
    set_row(
        &mut grid,
        0,
        1,
        &[K::BRID, K::BRIU, K::TASK, K::FILE, K::RGB_VAD, K::RGB_VAI, K::MPRV, K::MPLY, K::MNXT, K::MUTE, K::VOLD, K::VOLU],
    );
    grid[0][15] = K::RGB_TOG;
    fn_common(&mut grid);
    grid
}

fn common_fn() -> Grid {
    let mut grid = transparent();
    grid[0][0] = CustomKeyAction::ToggleOffAll.keycode();
    grid[1][13] = CustomKeyAction::MomentaryOffAll.keycode();
    grid[1][14] = CustomKeyAction::HardReset.keycode();
    grid[2][13] = CustomKeyAction::SoftReset.keycode();
    grid[3][3] = CustomKeyAction::ToggleDebug.keycode();
    grid[3][7] = K::toggle(Layer::Numpad as u8);
    grid[4][8] = K::toggle(Layer::Mouse as u8);
    grid
}

fn numpad() -> Grid {
    let mut grid = transparent();
    set_row(&mut grid, 1, 7, &[K::P7, K::P8, K::P9, K::PAST, K::PMNS]);
    set_row(&mut grid, 2, 7, &[K::P4, K::P5, K::P6, K::PPLS]);
    set_row(&mut grid, 3, 7, &[K::P1, K::P2, K::P3, K::PENT]);
    grid[3][0] = MOF_HL;
    grid[4][8] = K::P0;
    grid[4][10] = K::PDOT;
    grid
}

fn mouse() -> Grid {
    let mut grid = transparent();
    set_row(&mut grid, 2, 7, &[K::WH_U, K::MS_U, K::WH_D]);
    set_row(&mut grid, 3, 7, &[K::MS_L, K::MS_D, K::MS_R]);
    grid[3][0] = MOF_HL;
    set_row(&mut grid, 5, 3, &[K::BTN1, K::BTN2]);
    grid
}

fn flatten(grid: &Grid) -> Vec<K> {
    grid.iter().flat_map(|row| row.iter().copied()).collect()
}

/// Seven layers in `Layer` order
pub fn k1_pro_iso_keymap() -> Keymap {
    let grids = [MAC_BASE, mac_fn(), WIN_BASE, win_fn(), common_fn(), numpad(), mouse()];
    Keymap {
        rows: MATRIX_ROWS,
        cols: MATRIX_COLS,
        layers: grids.iter().map(flatten).collect(),
    }
}

/// Bracket remaps for ISO layouts. Alt+Shift rules precede their Alt-only
/// counterparts on each base layer.
pub fn k1_pro_iso_overrides() -> OverrideTable {
    let mac = [Layer::MacBase];
    let win = [Layer::WinBase];
    let ralt = |key: K| key.with_mods(ModMask::RALT);

    OverrideTable::new(vec![
        KeyOverride::on_layers(ModMask::RALT | ModMask::RSFT, K::LBRC, ralt(K::N8), &mac),
        KeyOverride::on_layers(ModMask::RALT | ModMask::RSFT, K::RBRC, ralt(K::N9), &mac),
        KeyOverride::on_layers(ModMask::ALT, K::LBRC, ralt(K::N5), &mac),
        KeyOverride::on_layers(ModMask::ALT, K::RBRC, ralt(K::N6), &mac),
        KeyOverride::on_layers(ModMask::RALT | ModMask::SHIFT, K::LBRC, ralt(K::N7), &win),
        KeyOverride::on_layers(ModMask::RALT | ModMask::SHIFT, K::RBRC, ralt(K::N0), &win),
        KeyOverride::on_layers(ModMask::RALT, K::LBRC, ralt(K::N8), &win),
        KeyOverride::on_layers(ModMask::RALT, K::RBRC, ralt(K::N9), &win),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_layers_share_alpha_rows() {
        let keymap = k1_pro_iso_keymap();
        assert_eq!(keymap.layer_count(), Layer::COUNT);
        for col in 0..MATRIX_COLS {
            assert_eq!(
                keymap.keycode(Layer::MacBase as u8, 2, col),
                keymap.keycode(Layer::WinBase as u8, 2, col)
            );
        }
    }

    #[test]
    fn test_fn_key_position() {
        let keymap = k1_pro_iso_keymap();
        assert_eq!(keymap.keycode(Layer::MacBase as u8, 5, 6), MOFN);
        assert_eq!(keymap.keycode(Layer::WinBase as u8, 5, 6), MOFN);
    }

    #[test]
    fn test_built_in_overrides_have_no_shadowing() {
        let table = k1_pro_iso_overrides();
        assert_eq!(table.len(), 8);
        assert!(table.shadowed_rules().is_empty());
    }

    #[test]
    fn test_overlay_holes_stay_unbound() {
        let keymap = k1_pro_iso_keymap();
        for layer in [Layer::MacFn, Layer::CommonFn, Layer::Numpad, Layer::Mouse] {
            assert_eq!(keymap.keycode(layer as u8, 5, 11), K::NO);
            assert_eq!(keymap.keycode(layer as u8, 0, 16), K::NO);
        }
    }
}
