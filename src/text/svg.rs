//! SVG Tiny 1.2 overlay with an NHML index of the text fragments.

use super::{Result, SampleSource, TextError, TextSample, TextTrack, end_time, fetch};
use crate::boxes::IsoBox;
use crate::util::{fmt_g, xml_escape};
use std::io::Write;

/// Export a text track as SVG, writing the NHML stream description to
/// `nhml`. Each rendered sample becomes `text_N`; the NHML index points
/// each fragment at the next one and the last one at `doc.end`.
pub fn dump_svg(
    trak: &IsoBox,
    samples: &(impl SampleSource + ?Sized),
    out: &mut dyn Write,
    nhml: &mut dyn Write,
) -> Result<()> {
    let track = TextTrack::new(trak)?;
    let count = samples.sample_count();
    log::debug!("svg export of {count} samples, timescale {}", track.timescale);

    writeln!(nhml, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(
        nhml,
        "<NHNTStream streamType=\"3\" objectTypeIndication=\"10\" timeScale=\"{}\" baseMediaFile=\"file.svg\" inRootOD=\"yes\">",
        track.timescale
    )?;
    writeln!(
        nhml,
        "<NHNTSample isRAP=\"yes\" DTS=\"0\" xmlFrom=\"doc.start\" xmlTo=\"text_1.start\"/>"
    )?;

    let (w, h) = track.size();
    writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(
        out,
        "<svg version=\"1.2\" baseProfile=\"tiny\" xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{w}\" height=\"{h}\" fill=\"black\">"
    )?;
    writeln!(
        out,
        "<g transform=\"translate({}, {})\" text-anchor=\"middle\">",
        w / 2,
        h / 2
    )?;

    // (dts, frame) of every fragment, written once the last one is known
    let mut fragments: Vec<(u64, u32)> = Vec::new();
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
        if s.text.is_empty() {
            continue;
        }
        let end = end_time(samples, i, track.duration);
        cur_frame += 1;
        let text: String = s.text.iter().collect();
        writeln!(
            out,
            " <text id=\"text_{cur_frame}\" display=\"none\">{}",
            xml_escape(&text)
        )?;
        writeln!(
            out,
            "  <set attributeName=\"display\" to=\"inline\" begin=\"{}\" end=\"{}\"/>",
            fmt_g(track.seconds(media.dts)),
            fmt_g(track.seconds(end))
        )?;
        writeln!(out, "  <discard begin=\"{}\"/>", fmt_g(track.seconds(end)))?;
        writeln!(out, " </text>")?;
        writeln!(out)?;
        fragments.push((media.dts, cur_frame));
    }
    writeln!(out, "</g>")?;
    writeln!(out, "</svg>")?;

    let last = fragments.len();
    for (n, (dts, frame)) in fragments.into_iter().enumerate() {
        let to = if n + 1 == last {
            "doc.end".to_string()
        } else {
            format!("text_{}.start", frame + 1)
        };
        writeln!(
            nhml,
            "<NHNTSample isRAP=\"no\" DTS=\"{:.6}\" xmlFrom=\"text_{frame}.start\" xmlTo=\"{to}\"/>",
            dts as f64
        )?;
    }
    writeln!(nhml, "</NHNTStream>")?;
    Ok(())
}
