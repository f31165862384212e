//! Periodic layer-state dump

use std::fmt;

use crate::types::LayerState;

/// Formats the low 16 bits as two groups of eight, most significant first.
pub fn format_binary(value: u16) -> String {
    format!("{:08b} {:08b}", value >> 8, value & 0xFF)
}

/// Layer state captured by a debug dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugSnapshot {
    pub layer_state: LayerState,
    pub default_layer_state: LayerState,
}

impl DebugSnapshot {
    pub fn highest_layer(&self) -> u8 {
        self.layer_state.highest()
    }

    pub fn highest_default_layer(&self) -> u8 {
        self.default_layer_state.highest()
    }
}

impl fmt::Display for DebugSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "        layer_state {}", format_binary(self.layer_state.bits() as u16))?;
        writeln!(f, "default_layer_state {}", format_binary(self.default_layer_state.bits() as u16))?;
        writeln!(f, "highest layer_state {:2}", self.highest_layer())?;
        writeln!(f, "hst def_layer_state {:2}", self.highest_default_layer())?;
        write!(f, "----")
    }
}

/// Decides when the next dump is due on a free-running 16-bit millisecond tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpThrottle {
    pub interval_ms: u16,
}

impl DumpThrottle {
    pub fn new(interval_ms: u16) -> Self {
        Self { interval_ms }
    }

    /// Whether a dump is due; `last` is the tick of the previous dump.
    pub fn is_due(&self, last: u16, now: u16) -> bool {
        now.wrapping_sub(last) > self.interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_binary() {
        assert_eq!(format_binary(0x0005), "00000000 00000101");
        assert_eq!(format_binary(0x8001), "10000000 00000001");
    }

    #[test]
    fn test_throttle_wraps() {
        let throttle = DumpThrottle::new(500);
        assert!(!throttle.is_due(100, 600));
        assert!(throttle.is_due(100, 601));
        assert!(throttle.is_due(65_000, 600));
        assert!(!throttle.is_due(65_500, 400));
    }

    #[test]
    fn test_snapshot_lines() {
        let snapshot = DebugSnapshot {
            layer_state: LayerState(0b10010),
            default_layer_state: LayerState(0b1),
        };
        let text = snapshot.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "        layer_state 00000000 00010010");
        assert_eq!(lines[1], "default_layer_state 00000000 00000001");
        assert_eq!(lines[2], "highest layer_state  4");
        assert_eq!(lines[3], "hst def_layer_state  0");
        assert_eq!(lines[4], "----");
    }
}
