//! Color constants for the desktop shell

use egui::Color32;

/// Top bar background - Deep navy
pub const TOP_BAR_BG: Color32 = Color32::from_rgb(0x1E, 0x29, 0x3B);

/// Sidebar background - Slate
pub const SIDEBAR_BG: Color32 = Color32::from_rgb(0xF1, 0xF5, 0xF9);

/// Highlighted sidebar entry
pub const SIDEBAR_ACTIVE: Color32 = Color32::from_rgb(0xDB, 0xEA, 0xFE);

/// Primary action buttons - Campus blue
pub const ACCENT: Color32 = Color32::from_rgb(0x25, 0x63, 0xEB);

/// Text on dark backgrounds
pub const TEXT_LIGHT: Color32 = Color32::from_rgb(0xF8, 0xFA, 0xFC);

/// Secondary text
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(0x64, 0x74, 0x8B);

pub const ERROR: Color32 = Color32::from_rgb(0xDC, 0x26, 0x26);

pub const SUCCESS: Color32 = Color32::from_rgb(0x16, 0xA3, 0x4A);
