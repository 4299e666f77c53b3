//! SRT: numbered cues with inline `<b>`, `<i>`, `<u>` and `<font>` tags.

use super::{
    Result, SampleSource, TextError, TextSample, TextTrack, color_name, end_time, fetch,
};
use crate::boxes::{BoxBody, IsoBox, STYLE_BOLD, STYLE_ITALIC, STYLE_UNDERLINED, StyleRecord};
use crate::util::format_duration;
use std::io::Write;

const STYLE_MASK: u8 = STYLE_BOLD | STYLE_ITALIC | STYLE_UNDERLINED;

/// Style in effect at `pos`: the first run covering it that sets a style
/// bit, else the description default.
fn style_at(styles: &[StyleRecord], pos: usize, default: &StyleRecord) -> (u8, u32) {
    styles
        .iter()
        .find(|r| {
            usize::from(r.start_char) <= pos
                && pos < usize::from(r.end_char)
                && r.style_flags & STYLE_MASK != 0
        })
        .map(|r| (r.style_flags, r.text_color))
        .unwrap_or((default.style_flags, default.text_color))
}

fn switch_style(out: &mut dyn Write, from: u8, to: u8) -> Result<()> {
    let opened = to & !from;
    let closed = from & !to;
    for (bit, tag) in [(STYLE_BOLD, "<b>"), (STYLE_ITALIC, "<i>"), (STYLE_UNDERLINED, "<u>")] {
        if opened & bit != 0 {
            write!(out, "{tag}")?;
        }
    }
    for (bit, tag) in [(STYLE_UNDERLINED, "</u>"), (STYLE_ITALIC, "</i>"), (STYLE_BOLD, "</b>")] {
        if closed & bit != 0 {
            write!(out, "{tag}")?;
        }
    }
    Ok(())
}

/// Writes one cue body, opening and closing tags at run boundaries.
fn cue_text(out: &mut dyn Write, s: &TextSample, default: &StyleRecord) -> Result<()> {
    let mut styles = 0u8;
    let mut color = default.text_color;
    let text = &s.text;
    let mut j = 0;
    let mut char_num = 0;
    while j < text.len() {
        let (new_styles, new_color) = style_at(&s.styles, char_num, default);
        if new_styles != styles || new_color != color {
            // font sits innermost, so it is closed before any style tag moves
            if color != default.text_color {
                write!(out, "</font>")?;
            }
            switch_style(out, styles, new_styles)?;
            if new_color != default.text_color {
                write!(out, "<font color=\"{}\">", color_name(new_color))?;
            }
            styles = new_styles;
            color = new_color;
        }
        match text[j] {
            '\r' | '\n' => {
                if text[j] == '\r' && text.get(j + 1) == Some(&'\n') {
                    j += 1;
                }
                writeln!(out)?;
            }
            c => write!(out, "{c}")?,
        }
        char_num += 1;
        j += 1;
    }
    if color != default.text_color {
        write!(out, "</font>")?;
    }
    switch_style(out, styles, 0)?;
    writeln!(out)?;
    Ok(())
}

fn default_style(track: &TextTrack<'_>, description_index: u32) -> StyleRecord {
    let entry = track
        .entries
        .get((description_index as usize).saturating_sub(1))
        .or(track.entries.first());
    match entry.map(|e| &e.body) {
        Some(BoxBody::Tx3gSampleEntry(e)) => e.default_style,
        _ => StyleRecord::default(),
    }
}

/// Export a text track as SRT. Two byte samples (empty text, no
/// modifiers) produce no cue.
pub fn dump_srt(
    trak: &IsoBox,
    samples: &(impl SampleSource + ?Sized),
    out: &mut dyn Write,
) -> Result<()> {
    let track = TextTrack::new(trak)?;
    let count = samples.sample_count();
    log::debug!("srt export of {count} samples, timescale {}", track.timescale);

    let mut cur_frame = 0;
    for i in 0..count {
        let Some(media) = fetch(samples, i) else {
            continue;
        };
        if media.data.len() == 2 {
            continue;
        }
        let s = match TextSample::parse(&media.data) {
            Ok(s) => s,
            Err(reason) => {
                log::warn!("{}", TextError::Decode { index: i, reason });
                continue;
            }
        };
        let end = end_time(samples, i, track.duration);
        cur_frame += 1;
        writeln!(out, "{cur_frame}")?;
        writeln!(
            out,
            "{} --> {}",
            format_duration(media.dts, track.timescale, ','),
            format_duration(end, track.timescale, ',')
        )?;
        if s.text.is_empty() {
            writeln!(out)?;
        } else {
            cue_text(out, &s, &default_style(&track, media.description_index))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(text: &str, styles: Vec<StyleRecord>) -> TextSample {
        TextSample { text: text.chars().collect(), styles, ..Default::default() }
    }

    #[test]
    fn nested_runs_close_in_reverse() {
        let s = sample(
            "abc",
            vec![StyleRecord {
                start_char: 0,
                end_char: 2,
                style_flags: STYLE_BOLD | STYLE_UNDERLINED,
                ..Default::default()
            }],
        );
        let mut out = Vec::new();
        cue_text(&mut out, &s, &StyleRecord::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "<b><u>ab</u></b>c\n");
    }

    #[test]
    fn colour_differs_from_default() {
        let s = sample(
            "xy",
            vec![StyleRecord {
                start_char: 1,
                end_char: 2,
                style_flags: STYLE_ITALIC,
                text_color: 0xFFFF_0000,
                ..Default::default()
            }],
        );
        let default = StyleRecord { text_color: 0xFFFF_FFFF, ..Default::default() };
        let mut out = Vec::new();
        cue_text(&mut out, &s, &default).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "x<i><font color=\"red\">y</font></i>\n"
        );
    }

    #[test]
    fn crlf_is_one_line_break() {
        let mut out = Vec::new();
        cue_text(&mut out, &sample("a\r\nb", vec![]), &StyleRecord::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\nb\n");
    }
}
