//! TTXT: the GPAC timed text markup.

use super::{Result, SampleSource, TextError, TextModifier, TextSample, TextTrack, fetch};
use crate::boxes::{
    BoxBody, BoxRecord, IsoBox, StyleRecord, TextSampleEntry, Tx3gSampleEntry, display_flags,
};
use crate::render::text::{rgba, style_names};
use crate::util::{fmt_g, format_duration};
use std::io::Write;

/// Positions of the CRLF pairs collapsed while writing a sample's text.
/// Every offset past one of them moves back by one character.
struct Shifts(Vec<usize>);

impl Shifts {
    fn apply(&self, offset: u16) -> usize {
        let offset = usize::from(offset);
        offset - self.0.iter().filter(|&&p| p < offset).count().min(offset)
    }

    fn offsets(&self, out: &mut dyn Write, start: u16, end: u16) -> Result<()> {
        let (start, end) = (self.apply(start), self.apply(end));
        if start != 0 || end != 0 {
            write!(out, "fromChar=\"{start}\" toChar=\"{end}\" ")?;
        }
        Ok(())
    }
}

fn yes_no(v: bool) -> &'static str {
    if v { "yes" } else { "no" }
}

fn scroll(out: &mut dyn Write, flags: u32) -> Result<()> {
    let (scroll_in, scroll_out) = (
        flags & display_flags::SCROLL_IN != 0,
        flags & display_flags::SCROLL_OUT != 0,
    );
    let name = match (scroll_in, scroll_out) {
        (true, true) => "InOut",
        (true, false) => "In",
        (false, true) => "Out",
        (false, false) => "None",
    };
    write!(out, " scroll=\"{name}\"")?;
    if scroll_in || scroll_out {
        let mode = match (flags & display_flags::SCROLL_DIRECTION) >> 7 {
            0 => "Credits",
            1 => "Marquee",
            2 => "Down",
            3 => "Right",
            _ => "Unknown",
        };
        write!(out, " scrollMode=\"{mode}\"")?;
    }
    Ok(())
}

fn text_box(out: &mut dyn Write, r: &BoxRecord) -> Result<()> {
    writeln!(
        out,
        "<TextBox top=\"{}\" left=\"{}\" bottom=\"{}\" right=\"{}\"/>",
        r.top, r.left, r.bottom, r.right
    )?;
    Ok(())
}

fn style(out: &mut dyn Write, r: &StyleRecord, shifts: &Shifts) -> Result<()> {
    write!(out, "<Style ")?;
    if r.start_char != 0 || r.end_char != 0 {
        shifts.offsets(out, r.start_char, r.end_char)?;
    }
    writeln!(
        out,
        "styles=\"{}\" fontID=\"{}\" fontSize=\"{}\" color=\"{}\"/>",
        style_names(r.style_flags),
        r.font_id,
        r.font_size,
        rgba(r.text_color)
    )?;
    Ok(())
}

/// An empty default box stands for the whole track area.
fn default_box(r: &BoxRecord, track: &TextTrack<'_>) -> BoxRecord {
    if r.bottom == r.top || r.right == r.left {
        let (w, h) = track.size();
        BoxRecord { top: 0, left: 0, bottom: h as i16, right: w as i16 }
    } else {
        *r
    }
}

fn tx3g_description(out: &mut dyn Write, e: &Tx3gSampleEntry, track: &TextTrack<'_>) -> Result<()> {
    let horizontal = match e.horizontal_justification {
        1 => "center",
        -1 => "right",
        _ => "left",
    };
    let vertical = match e.vertical_justification {
        1 => "center",
        -1 => "bottom",
        _ => "top",
    };
    write!(
        out,
        "<TextSampleDescription horizontalJustification=\"{horizontal}\" verticalJustification=\"{vertical}\" backColor=\"{}\" verticalText=\"{}\" fillTextRegion=\"{}\" continuousKaraoke=\"{}\"",
        rgba(e.back_color),
        yes_no(e.display_flags & display_flags::VERTICAL != 0),
        yes_no(e.display_flags & display_flags::FILL_REGION != 0),
        yes_no(e.display_flags & display_flags::KARAOKE != 0),
    )?;
    scroll(out, e.display_flags)?;
    writeln!(out, ">")?;
    writeln!(out, "<FontTable>")?;
    for font in e.fonts() {
        writeln!(
            out,
            "<FontTableEntry fontName=\"{}\" fontID=\"{}\"/>",
            crate::util::xml_escape(font.font_name.as_deref().unwrap_or("")),
            font.font_id
        )?;
    }
    writeln!(out, "</FontTable>")?;
    text_box(out, &default_box(&e.default_box, track))?;
    style(out, &e.default_style, &Shifts(Vec::new()))?;
    writeln!(out, "</TextSampleDescription>")?;
    Ok(())
}

fn text_description(out: &mut dyn Write, e: &TextSampleEntry, track: &TextTrack<'_>) -> Result<()> {
    let horizontal = match e.text_justification {
        1 => "center",
        -1 => "right",
        _ => "left",
    };
    let [r, g, b] = e.background_color;
    write!(
        out,
        "<TextSampleDescription horizontalJustification=\"{horizontal}\" backColor=\"{r:x} {g:x} {b:x}\""
    )?;
    scroll(out, e.display_flags)?;
    writeln!(out, ">")?;
    text_box(out, &default_box(&e.default_box, track))?;
    writeln!(out, "</TextSampleDescription>")?;
    Ok(())
}

fn description(out: &mut dyn Write, entry: &IsoBox, track: &TextTrack<'_>) -> Result<()> {
    match &entry.body {
        BoxBody::Tx3gSampleEntry(e) => tx3g_description(out, e, track),
        BoxBody::TextSampleEntry(e) => text_description(out, e, track),
        _ => {
            log::warn!("sample description {} is not a text description", entry.typ);
            Ok(())
        }
    }
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

/// Writes the escaped text and returns where CRLF pairs were collapsed.
fn sample_text(out: &mut dyn Write, text: &[char]) -> Result<Shifts> {
    let mut shifts = Vec::new();
    let mut j = 0;
    while j < text.len() {
        let c = text[j];
        if is_line_break(c) {
            writeln!(out)?;
            if c == '\r' && text.get(j + 1) == Some(&'\n') {
                shifts.push(j);
                j += 1;
            }
        } else {
            match c {
                '\'' => write!(out, "&apos;")?,
                '"' => write!(out, "&quot;")?,
                '&' => write!(out, "&amp;")?,
                '>' => write!(out, "&gt;")?,
                '<' => write!(out, "&lt;")?,
                c if (c as u32) < 128 => write!(out, "{c}")?,
                c => write!(out, "&#{};", c as u32)?,
            }
        }
        j += 1;
    }
    Ok(Shifts(shifts))
}

fn sample(
    out: &mut dyn Write,
    s: &TextSample,
    dts: u64,
    description_index: u32,
    track: &TextTrack<'_>,
) -> Result<()> {
    write!(
        out,
        "<TextSample sampleTime=\"{}\"",
        format_duration(dts, track.timescale, '.')
    )?;
    if track.entries.len() > 1 {
        write!(out, " sampleDescriptionIndex=\"{description_index}\"")?;
    }
    if let Some(color) = s.highlight_color {
        write!(out, " highlightColor=\"{}\"", rgba(color))?;
    }
    if let Some(delay) = s.scroll_delay {
        write!(out, " scrollDelay=\"{}\"", fmt_g(track.seconds(u64::from(delay))))?;
    }
    if let Some(wrap) = s.wrap {
        let mode = if wrap == 1 { "Automatic" } else { "None" };
        write!(out, " wrap=\"{mode}\"")?;
    }
    write!(out, " xml:space=\"preserve\">")?;

    let shifts = sample_text(out, &s.text)?;
    if let Some(r) = &s.text_box {
        text_box(out, r)?;
    }
    for r in &s.styles {
        style(out, r, &shifts)?;
    }
    for m in &s.others {
        match m {
            TextModifier::Highlight(h) => {
                write!(out, "<Highlight ")?;
                shifts.offsets(out, h.start_char, h.end_char)?;
                writeln!(out, "/>")?;
            }
            TextModifier::HyperText(h) => {
                write!(out, "<HyperLink ")?;
                shifts.offsets(out, h.start_char, h.end_char)?;
                writeln!(
                    out,
                    "URL=\"{}\" URLToolTip=\"{}\"/>",
                    crate::util::xml_escape(h.url.as_deref().unwrap_or("")),
                    crate::util::xml_escape(h.url_hint.as_deref().unwrap_or(""))
                )?;
            }
            TextModifier::Blink(b) => {
                write!(out, "<Blinking ")?;
                shifts.offsets(out, b.start_char, b.end_char)?;
                writeln!(out, "/>")?;
            }
            TextModifier::Karaoke(k) => {
                writeln!(
                    out,
                    "<Karaoke startTime=\"{}\">",
                    fmt_g(track.seconds(u64::from(k.highlight_starttime)))
                )?;
                for r in &k.records {
                    write!(out, "<KaraokeRange ")?;
                    shifts.offsets(out, r.start_char, r.end_char)?;
                    writeln!(
                        out,
                        "endTime=\"{}\"/>",
                        fmt_g(track.seconds(u64::from(r.highlight_endtime)))
                    )?;
                }
                writeln!(out, "</Karaoke>")?;
            }
        }
    }
    writeln!(out, "</TextSample>")?;
    Ok(())
}

/// Export a text track as a TTXT document.
pub fn dump_ttxt(
    trak: &IsoBox,
    samples: &(impl SampleSource + ?Sized),
    out: &mut dyn Write,
) -> Result<()> {
    let track = TextTrack::new(trak)?;
    let count = samples.sample_count();
    log::debug!("ttxt export of {count} samples, timescale {}", track.timescale);

    let (w, h) = track.size();
    let (layer, tx, ty) = track
        .tkhd
        .map(|h| (h.layer, h.matrix[6] >> 16, h.matrix[7] >> 16))
        .unwrap_or_default();
    writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>")?;
    writeln!(out, "<!-- GPAC 3GPP Text Stream -->")?;
    writeln!(out, "<TextStream version=\"1.1\">")?;
    writeln!(
        out,
        "<TextStreamHeader width=\"{w}\" height=\"{h}\" layer=\"{layer}\" translation_x=\"{tx}\" translation_y=\"{ty}\">"
    )?;
    for entry in track.entries {
        description(out, entry, &track)?;
    }
    writeln!(out, "</TextStreamHeader>")?;

    let mut last_dts = 0;
    for i in 0..count {
        let Some(media) = fetch(samples, i) else {
            continue;
        };
        let s = match TextSample::parse(&media.data) {
            Ok(s) => s,
            Err(reason) => {
                log::warn!("{}", TextError::Decode { index: i, reason });
                continue;
            }
        };
        sample(out, &s, media.dts, media.description_index, &track)?;
        last_dts = if s.text.is_empty() { track.duration } else { media.dts };
    }
    if last_dts < track.duration {
        writeln!(
            out,
            "<TextSample sampleTime=\"{}\" text=\"\" />",
            format_duration(track.duration, track.timescale, '.')
        )?;
    }
    writeln!(out, "</TextStream>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_moves_later_offsets_back() {
        let text: Vec<char> = "ab\r\ncd\r\nef".chars().collect();
        let mut out = Vec::new();
        let shifts = sample_text(&mut out, &text).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "ab\ncd\nef");
        assert_eq!(shifts.apply(2), 2);
        assert_eq!(shifts.apply(4), 3);
        assert_eq!(shifts.apply(8), 6);
    }

    #[test]
    fn non_ascii_is_a_character_reference() {
        let mut out = Vec::new();
        sample_text(&mut out, &['é', '<']).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "&#233;&lt;");
    }
}
