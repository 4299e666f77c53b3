//! 3GPP timed text sample entries and text modifier boxes.

use super::opt_str;
use crate::boxes::{BoxRecord, IsoBox, STYLE_BOLD, STYLE_ITALIC, STYLE_UNDERLINED, StyleRecord};
use crate::dump::{Result, Trace};
use crate::util::xml_escape;
use std::io::Write;

/// `r g b a` in lowercase hex from an ARGB word.
pub(crate) fn rgba(col: u32) -> String {
    format!(
        "{:x} {:x} {:x} {:x}",
        (col >> 16) & 0xFF,
        (col >> 8) & 0xFF,
        col & 0xFF,
        (col >> 24) & 0xFF
    )
}

/// Space terminated style names, or `Normal`.
pub(crate) fn style_names(flags: u8) -> String {
    if flags == 0 {
        return "Normal".to_string();
    }
    let mut s = String::new();
    for (bit, name) in [(STYLE_BOLD, "Bold "), (STYLE_ITALIC, "Italic "), (STYLE_UNDERLINED, "Underlined ")] {
        if flags & bit != 0 {
            s.push_str(name);
        }
    }
    s
}

pub(crate) fn box_record(t: &mut Trace<'_>, r: &BoxRecord) -> Result<()> {
    writeln!(
        t,
        "<BoxRecord top=\"{}\" left=\"{}\" bottom=\"{}\" right=\"{}\"/>",
        r.top, r.left, r.bottom, r.right
    )?;
    Ok(())
}

fn style_record(t: &mut Trace<'_>, r: &StyleRecord) -> Result<()> {
    writeln!(
        t,
        "<StyleRecord startChar=\"{}\" endChar=\"{}\" fontID=\"{}\" styles=\"{}\" fontSize=\"{}\" textColor=\"{}\"/>",
        r.start_char,
        r.end_char,
        r.font_id,
        style_names(r.style_flags),
        r.font_size,
        rgba(r.text_color)
    )?;
    Ok(())
}

pub fn ftab(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, FontTable);
    t.open("FontTableBox", b)?;
    writeln!(t, ">")?;
    for f in &p.fonts {
        let name = f.font_name.as_deref().unwrap_or("NULL");
        writeln!(t, "<FontRecord ID=\"{}\" name=\"{}\"/>", f.font_id, xml_escape(name))?;
    }
    if b.size == 0 {
        writeln!(t, "<FontRecord ID=\"\" name=\"\"/>")?;
    }
    t.done(Some("FontTableBox"), Some(b))
}

pub fn tx3g(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, Tx3gSampleEntry);
    t.open("Tx3gSampleEntryBox", b)?;
    write!(
        t,
        "dataReferenceIndex=\"{}\" displayFlags=\"{:x}\" horizontal-justification=\"{}\" vertical-justification=\"{}\" ",
        p.data_reference_index, p.display_flags, p.horizontal_justification, p.vertical_justification
    )?;
    writeln!(t, "backgroundColor=\"{}\">", rgba(p.back_color))?;
    writeln!(t, "<DefaultBox>")?;
    box_record(t, &p.default_box)?;
    writeln!(t, "</DefaultBox>")?;
    writeln!(t, "<DefaultStyle>")?;
    style_record(t, &p.default_style)?;
    writeln!(t, "</DefaultStyle>")?;
    super::required(t, b, p.font_table.as_deref(), b"ftab")?;
    t.done(Some("Tx3gSampleEntryBox"), Some(b))
}

/// QuickTime text sample entry.
pub fn text(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, TextSampleEntry);
    t.open("TextSampleEntryBox", b)?;
    write!(
        t,
        "dataReferenceIndex=\"{}\" displayFlags=\"{:x}\" textJustification=\"{}\"  ",
        p.data_reference_index, p.display_flags, p.text_justification
    )?;
    if p.text_name.is_some() {
        write!(t, "textName=\"{}\" ", xml_escape(opt_str(&p.text_name)))?;
    }
    let [br, bg, bb] = p.background_color;
    let [fr, fg, fb] = p.foreground_color;
    writeln!(
        t,
        "background-color=\"{br:x} {bg:x} {bb:x}\" foreground-color=\"{fr:x} {fg:x} {fb:x}\">"
    )?;
    writeln!(t, "<DefaultBox>")?;
    box_record(t, &p.default_box)?;
    writeln!(t, "</DefaultBox>")?;
    t.done(Some("TextSampleEntryBox"), Some(b))
}

pub fn styl(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, TextStyle);
    t.open("TextStyleBox", b)?;
    writeln!(t, ">")?;
    for s in &p.styles {
        style_record(t, s)?;
    }
    if b.size == 0 {
        writeln!(
            t,
            "<StyleRecord startChar=\"\" endChar=\"\" fontID=\"\" styles=\"Normal|Bold|Italic|Underlined\" fontSize=\"\" textColor=\"\" />"
        )?;
    }
    t.done(Some("TextStyleBox"), Some(b))
}

pub fn hlit(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, TextHighlight);
    t.open("TextHighlightBox", b)?;
    writeln!(t, "startcharoffset=\"{}\" endcharoffset=\"{}\">", p.start_char, p.end_char)?;
    t.done(Some("TextHighlightBox"), Some(b))
}

pub fn hclr(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, TextHighlightColor);
    t.open("TextHighlightColorBox", b)?;
    writeln!(t, "highlight_color=\"{}\">", rgba(p.hil_color))?;
    t.done(Some("TextHighlightColorBox"), Some(b))
}

pub fn krok(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, TextKaraoke);
    t.open("TextKaraokeBox", b)?;
    writeln!(t, "highlight_starttime=\"{}\">", p.highlight_starttime)?;
    for r in &p.records {
        writeln!(
            t,
            "<KaraokeRecord highlight_endtime=\"{}\" start_charoffset=\"{}\" end_charoffset=\"{}\"/>",
            r.highlight_endtime, r.start_char, r.end_char
        )?;
    }
    if b.size == 0 {
        writeln!(t, "<KaraokeRecord highlight_endtime=\"\" start_charoffset=\"\" end_charoffset=\"\"/>")?;
    }
    t.done(Some("TextKaraokeBox"), Some(b))
}

pub fn dlay(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, TextScrollDelay);
    t.open("TextScrollDelayBox", b)?;
    writeln!(t, "scroll_delay=\"{}\">", p.scroll_delay)?;
    t.done(Some("TextScrollDelayBox"), Some(b))
}

pub fn href(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, TextHyperText);
    t.open("TextHyperTextBox", b)?;
    writeln!(
        t,
        "startcharoffset=\"{}\" endcharoffset=\"{}\" URL=\"{}\" altString=\"{}\">",
        p.start_char,
        p.end_char,
        xml_escape(p.url.as_deref().unwrap_or("NULL")),
        xml_escape(p.url_hint.as_deref().unwrap_or("NULL"))
    )?;
    t.done(Some("TextHyperTextBox"), Some(b))
}

pub fn tbox(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, TextBox);
    t.open("TextBoxBox", b)?;
    writeln!(t, ">")?;
    box_record(t, &p.text_box)?;
    t.done(Some("TextBoxBox"), Some(b))
}

pub fn blnk(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, TextBlink);
    t.open("TextBlinkBox", b)?;
    writeln!(t, "start_charoffset=\"{}\" end_charoffset=\"{}\">", p.start_char, p.end_char)?;
    t.done(Some("TextBlinkBox"), Some(b))
}

pub fn twrp(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, TextWrap);
    let wrap = match p.wrap_flag {
        0 => "No Wrap",
        1 => "Automatic",
        _ => "Reserved",
    };
    t.open("TextWrapBox", b)?;
    writeln!(t, "wrap_flag=\"{wrap}\">")?;
    t.done(Some("TextWrapBox"), Some(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colour_is_rgb_then_alpha() {
        assert_eq!(rgba(0xFF10_2030), "10 20 30 ff");
    }

    #[test]
    fn style_flags_render_as_names() {
        assert_eq!(style_names(0), "Normal");
        assert_eq!(style_names(STYLE_BOLD | STYLE_UNDERLINED), "Bold Underlined ");
    }
}
