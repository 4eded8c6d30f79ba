//! Fixed colour tables. Lookups never fail; unknown keys get a neutral pair.

use crate::color::Color;

pub const BACKGROUND: Color = Color::hex(0xfdf7f2);
pub const BODY_TEXT: Color = Color::hex(0x1f1f1f);
pub const FRAME: Color = Color::hex(0xd4cdc3);
pub const DIVIDER: Color = Color::hex(0xd9cbbd);
pub const FUNNY_TEXT: Color = Color::hex(0x5c4d40);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorPair {
    pub background: Color,
    pub foreground: Color,
}

const fn pair(background: u32, foreground: u32) -> ColorPair {
    ColorPair {
        background: Color::hex(background),
        foreground: Color::hex(foreground),
    }
}

/// Feature badge colours by upper-cased category label.
pub fn feature_category(label: &str) -> ColorPair {
    match label.trim().to_uppercase().as_str() {
        "DESIGN" => pair(0xffe3f3, 0xa32c68),
        "TECH" => pair(0xd9f5ff, 0x005d8f),
        "MARKETING" => pair(0xfff2d6, 0xa35a00),
        _ => pair(0xedf2f7, 0x2d3748),
    }
}

/// Ticket border and pill colours by upper-cased category label.
pub fn ticket_category(label: &str) -> ColorPair {
    match label.trim().to_uppercase().as_str() {
        "TECH" => pair(0xdbf1ff, 0x4298ce),
        "MARKETING" => pair(0xffe49a, 0xc99320),
        "DESIGN" => pair(0xffc5e1, 0xc9208b),
        _ => pair(0xe8edf3, 0x5f6b7a),
    }
}

/// Milestone tier accent; tiers outside 0..=3 use tier 0.
pub fn tier(tier: i64) -> Color {
    match tier {
        1 => Color::hex(0x6dd19c),
        2 => Color::hex(0xffb169),
        3 => Color::hex(0xff6b6b),
        _ => Color::hex(0xb4bcc6),
    }
}
