//! 3GPP timed text (tx3g) and QuickTime text payloads.
//!
//! The record types are shared with the text sample decoder in
//! [`crate::text`], which yields the same modifier structures.

use super::IsoBox;

/// Text box geometry in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoxRecord {
    pub top: i16,
    pub left: i16,
    pub bottom: i16,
    pub right: i16,
}

/// Style flag bits of [`StyleRecord::style_flags`].
pub const STYLE_BOLD: u8 = 1;
pub const STYLE_ITALIC: u8 = 2;
pub const STYLE_UNDERLINED: u8 = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StyleRecord {
    pub start_char: u16,
    pub end_char: u16,
    pub font_id: u16,
    pub style_flags: u8,
    pub font_size: u8,
    /// ARGB
    pub text_color: u32,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontRecord {
    pub font_id: u16,
    pub font_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontTable {
    pub fonts: Vec<FontRecord>,
}

/// Display flag bits shared by tx3g and text entries.
pub mod display_flags {
    pub const SCROLL_IN: u32 = 0x0000_0020;
    pub const SCROLL_OUT: u32 = 0x0000_0040;
    pub const SCROLL_DIRECTION: u32 = 0x0000_0180;
    pub const KARAOKE: u32 = 0x0000_0800;
    pub const VERTICAL: u32 = 0x0002_0000;
    pub const FILL_REGION: u32 = 0x0004_0000;
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Tx3gSampleEntry {
    pub data_reference_index: u16,
    pub display_flags: u32,
    pub horizontal_justification: i8,
    pub vertical_justification: i8,
    /// ARGB
    pub back_color: u32,
    pub default_box: BoxRecord,
    pub default_style: StyleRecord,
    pub font_table: Option<Box<IsoBox>>,
}

impl Tx3gSampleEntry {
    pub fn fonts(&self) -> &[FontRecord] {
        match self.font_table.as_deref().map(|b| &b.body) {
            Some(super::BoxBody::FontTable(t)) => &t.fonts,
            _ => &[],
        }
    }
}

/// QuickTime `text` sample entry.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextSampleEntry {
    pub data_reference_index: u16,
    pub display_flags: u32,
    pub text_justification: i32,
    pub background_color: [u16; 3],
    pub foreground_color: [u16; 3],
    pub default_box: BoxRecord,
    pub text_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub styles: Vec<StyleRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextHighlight {
    pub start_char: u16,
    pub end_char: u16,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextHighlightColor {
    pub hil_color: u32,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct KaraokeRecord {
    pub highlight_endtime: u32,
    pub start_char: u16,
    pub end_char: u16,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextKaraoke {
    pub highlight_starttime: u32,
    pub records: Vec<KaraokeRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextScrollDelay {
    pub scroll_delay: u32,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextHyperText {
    pub start_char: u16,
    pub end_char: u16,
    pub url: Option<String>,
    pub url_hint: Option<String>,
}

/// tbox
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextBoxRecord {
    pub text_box: BoxRecord,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextBlink {
    pub start_char: u16,
    pub end_char: u16,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextWrap {
    pub wrap_flag: u8,
}
