//! Foreign Function Interface for the key router
//!
//! This module provides a C-compatible API so firmware shims and test
//! harnesses written in C can drive the router. Every callback writes the
//! effects to perform into a caller-provided array.

use crate::engine::{DebugSnapshot, Effect, KeyEventRouter, Outcome, OsVariant, UsbDeviceState};
use crate::keymap::Layout;
use crate::types::{Keycode, LayerState, ModMask};
use std::os::raw::{c_char, c_int};
use std::ptr;
use std::sync::Mutex;

/// Opaque handle to a router instance
pub struct RouterHandle {
    router: Mutex<KeyEventRouter>,
}

/// Result codes for FFI functions
#[repr(C)]
#[derive(Debug, PartialEq)]
pub enum KeyRouterResult {
    Success = 0,
    ErrorInvalidHandle = -1,
    ErrorInvalidParameter = -2,
    ErrorRouterFailure = -3,
    ErrorBufferTooSmall = -4,
}

pub const EFFECT_LAYER_ON: c_int = 1;
pub const EFFECT_LAYER_OFF: c_int = 2;
pub const EFFECT_LAYER_CLEAR: c_int = 3;
pub const EFFECT_LAYER_STATE_SET: c_int = 4;
pub const EFFECT_DEFAULT_LAYER_SET: c_int = 5;
pub const EFFECT_HARD_RESET: c_int = 6;
pub const EFFECT_SOFT_RESET: c_int = 7;
pub const EFFECT_SET_COLOR: c_int = 8;
pub const EFFECT_PAINT_LED: c_int = 9;

/// One effect in C layout
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyRouterEffect {
    /// One of the `EFFECT_*` constants
    pub kind: c_int,
    /// Layer index, layer mask or LED index depending on `kind`
    pub arg: u32,
    pub hue: u8,
    pub sat: u8,
    pub val: u8,
    /// 1 when a color should be persisted
    pub persist: u8,
}

impl From<&Effect> for KeyRouterEffect {
    fn from(effect: &Effect) -> Self {
        let plain = |kind: c_int, arg: u32| KeyRouterEffect {
            kind,
            arg,
            ..Default::default()
        };
        match *effect {
            Effect::LayerOn(layer) => plain(EFFECT_LAYER_ON, layer as u32),
            Effect::LayerOff(layer) => plain(EFFECT_LAYER_OFF, layer as u32),
            Effect::LayerClear => plain(EFFECT_LAYER_CLEAR, 0),
            Effect::LayerStateSet(state) => plain(EFFECT_LAYER_STATE_SET, state.bits()),
            Effect::DefaultLayerSet(state) => plain(EFFECT_DEFAULT_LAYER_SET, state.bits()),
            Effect::HardReset => plain(EFFECT_HARD_RESET, 0),
            Effect::SoftReset => plain(EFFECT_SOFT_RESET, 0),
            Effect::SetColor { hsv, persist } => KeyRouterEffect {
                kind: EFFECT_SET_COLOR,
                arg: 0,
                hue: hsv.h,
                sat: hsv.s,
                val: hsv.v,
                persist: persist as u8,
            },
            Effect::PaintLed { index, hsv } => KeyRouterEffect {
                kind: EFFECT_PAINT_LED,
                arg: index as u32,
                hue: hsv.h,
                sat: hsv.s,
                val: hsv.v,
                persist: 0,
            },
        }
    }
}

/// Effects produced by one callback
#[repr(C)]
pub struct KeyRouterOutput {
    /// Caller-owned array of `capacity` entries
    pub effects: *mut KeyRouterEffect,
    pub capacity: usize,
    /// Number of effects produced; may exceed `capacity`
    pub count: usize,
    /// Whether the event was handled (0=false, 1=true)
    pub handled: c_int,
}

fn write_output(outcome: &Outcome, output: &mut KeyRouterOutput) -> KeyRouterResult {
    output.count = outcome.effects.len();
    output.handled = if outcome.handled { 1 } else { 0 };

    if output.effects.is_null() {
        return if outcome.effects.is_empty() {
            KeyRouterResult::Success
        } else {
            KeyRouterResult::ErrorBufferTooSmall
        };
    }

    let slots = unsafe { std::slice::from_raw_parts_mut(output.effects, output.capacity) };
    for (slot, effect) in slots.iter_mut().zip(&outcome.effects) {
        *slot = effect.into();
    }

    if outcome.effects.len() > output.capacity {
        KeyRouterResult::ErrorBufferTooSmall
    } else {
        KeyRouterResult::Success
    }
}

/// Internal function shared by every callback entry point
fn with_router<F>(handle: *mut RouterHandle, output: *mut KeyRouterOutput, f: F) -> KeyRouterResult
where
    F: FnOnce(&mut KeyEventRouter) -> Outcome,
{
    if handle.is_null() {
        return KeyRouterResult::ErrorInvalidHandle;
    }
    if output.is_null() {
        return KeyRouterResult::ErrorInvalidParameter;
    }

    let handle = unsafe { &*handle };
    let output_ref = unsafe { &mut *output };

    match handle.router.lock() {
        Ok(mut router) => {
            let outcome = f(&mut router);
            write_output(&outcome, output_ref)
        }
        Err(_) => KeyRouterResult::ErrorRouterFailure,
    }
}

fn into_handle(router: KeyEventRouter) -> *mut RouterHandle {
    Box::into_raw(Box::new(RouterHandle {
        router: Mutex::new(router),
    }))
}

/// Creates a router for the built-in layout
#[no_mangle]
pub extern "C" fn keyrouter_new() -> *mut RouterHandle {
    into_handle(KeyEventRouter::new())
}

/// Creates a router from a KLB layout in memory; null when the data is invalid
#[no_mangle]
pub extern "C" fn keyrouter_new_from_klb(data: *const u8, data_len: usize) -> *mut RouterHandle {
    if data.is_null() || data_len == 0 {
        return ptr::null_mut();
    }

    let data_slice = unsafe { std::slice::from_raw_parts(data, data_len) };
    match Layout::load(data_slice) {
        Ok(layout) => into_handle(KeyEventRouter::with_layout(layout)),
        Err(e) => {
            log::error!("Failed to load layout: {}", e);
            ptr::null_mut()
        }
    }
}

/// Frees a router instance
#[no_mangle]
pub extern "C" fn keyrouter_free(handle: *mut RouterHandle) {
    if !handle.is_null() {
        unsafe {
            let _ = Box::from_raw(handle);
        }
    }
}

/// Key press (`pressed` != 0) or release
#[no_mangle]
pub extern "C" fn keyrouter_process_record(
    handle: *mut RouterHandle,
    keycode: u16,
    pressed: c_int,
    output: *mut KeyRouterOutput,
) -> KeyRouterResult {
    with_router(handle, output, |router| {
        router.process_record(Keycode(keycode), pressed != 0)
    })
}

/// Layer state notification; returns the state to keep
#[no_mangle]
pub extern "C" fn keyrouter_layer_state_set(handle: *mut RouterHandle, state: u32) -> u32 {
    if handle.is_null() {
        return state;
    }

    let handle = unsafe { &*handle };
    match handle.router.lock() {
        Ok(mut router) => router.layer_state_set(LayerState(state)).bits(),
        Err(_) => state,
    }
}

#[no_mangle]
pub extern "C" fn keyrouter_default_layer_state_set(
    handle: *mut RouterHandle,
    state: u32,
    output: *mut KeyRouterOutput,
) -> KeyRouterResult {
    with_router(handle, output, |router| {
        let outcome = router.default_layer_state_set(LayerState(state));
        Outcome::unhandled_with(outcome.effects)
    })
}

/// OS detection result, using the firmware's `os_variant_t` numbering
#[no_mangle]
pub extern "C" fn keyrouter_process_detected_host_os(
    handle: *mut RouterHandle,
    os: u8,
    output: *mut KeyRouterOutput,
) -> KeyRouterResult {
    let Some(os) = OsVariant::from_raw(os) else {
        return KeyRouterResult::ErrorInvalidParameter;
    };
    with_router(handle, output, |router| router.process_detected_host_os(os))
}

#[no_mangle]
pub extern "C" fn keyrouter_usb_device_state_changed(
    handle: *mut RouterHandle,
    usb_state: u8,
    output: *mut KeyRouterOutput,
) -> KeyRouterResult {
    let Some(usb_state) = UsbDeviceState::from_raw(usb_state) else {
        return KeyRouterResult::ErrorInvalidParameter;
    };
    with_router(handle, output, |router| {
        Outcome::unhandled_with(router.usb_device_state_changed(usb_state))
    })
}

#[no_mangle]
pub extern "C" fn keyrouter_suspend_power_down(
    handle: *mut RouterHandle,
    output: *mut KeyRouterOutput,
) -> KeyRouterResult {
    with_router(handle, output, |router| {
        Outcome::unhandled_with(router.suspend_power_down())
    })
}

#[no_mangle]
pub extern "C" fn keyrouter_rgb_indicators(
    handle: *mut RouterHandle,
    led_min: u8,
    led_max: u8,
    output: *mut KeyRouterOutput,
) -> KeyRouterResult {
    with_router(handle, output, |router| router.rgb_indicators(led_min, led_max))
}

/// Layer masks captured by a debug dump
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyRouterDebugDump {
    pub layer_state: u32,
    pub default_layer_state: u32,
    pub highest_layer: u8,
    pub highest_default_layer: u8,
}

impl From<&DebugSnapshot> for KeyRouterDebugDump {
    fn from(snapshot: &DebugSnapshot) -> Self {
        Self {
            layer_state: snapshot.layer_state.bits(),
            default_layer_state: snapshot.default_layer_state.bits(),
            highest_layer: snapshot.highest_layer(),
            highest_default_layer: snapshot.highest_default_layer(),
        }
    }
}

/// Periodic tick; returns 1 when a debug dump was logged.
///
/// When a dump is due and `dump` is not null, the captured masks are written
/// to it. `dump` is left untouched otherwise.
#[no_mangle]
pub extern "C" fn keyrouter_matrix_scan(
    handle: *mut RouterHandle,
    now_ms: u16,
    dump: *mut KeyRouterDebugDump,
) -> c_int {
    if handle.is_null() {
        return 0;
    }

    let handle = unsafe { &*handle };
    let snapshot = match handle.router.lock() {
        Ok(mut router) => router.matrix_scan(now_ms),
        Err(_) => return 0,
    };

    match snapshot {
        Some(snapshot) => {
            if !dump.is_null() {
                unsafe { *dump = KeyRouterDebugDump::from(&snapshot) };
            }
            1
        }
        None => 0,
    }
}

/// Looks up a key override.
///
/// Returns 1 and fills `replacement` and `suppressed_mods` on a match, 0 when
/// no rule matches, and -1 on invalid arguments.
#[no_mangle]
pub extern "C" fn keyrouter_key_override(
    handle: *mut RouterHandle,
    keycode: u16,
    mods: u8,
    replacement: *mut u16,
    suppressed_mods: *mut u8,
) -> c_int {
    if handle.is_null() || replacement.is_null() || suppressed_mods.is_null() {
        return -1;
    }

    let handle = unsafe { &*handle };
    let router = match handle.router.lock() {
        Ok(router) => router,
        Err(_) => return -1,
    };

    match router.key_override(Keycode(keycode), ModMask(mods)) {
        Some(found) => {
            unsafe {
                *replacement = found.replacement.raw();
                *suppressed_mods = found.suppressed_mods.bits();
            }
            1
        }
        None => 0,
    }
}

/// Get library version
#[no_mangle]
pub extern "C" fn keyrouter_get_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}
