//! Timed text exporters: TTXT (timed markup), SRT (linear script) and SVG
//! with its NHML index.
//!
//! All three walk the samples of a `text`/`sbtl` track through a
//! [`SampleSource`], decode each payload with [`TextSample::parse`] and
//! skip samples that fail to decode.

mod sample;
mod srt;
mod svg;
mod ttxt;

pub use sample::{SampleError, TextModifier, TextSample};
pub use srt::dump_srt;
pub use svg::dump_svg;
pub use ttxt::dump_ttxt;

use crate::boxes::{BoxBody, IsoBox, TrackHeader};
use std::io::{self, Write};

#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The track cannot be exported. Raised before any output is written.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("sample {index}: {reason}")]
    Decode {
        index: u32,
        #[source]
        reason: SampleError,
    },
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, TextError>;

/// One access unit of a text track.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MediaSample {
    pub dts: u64,
    pub data: Vec<u8>,
    /// 1-based index into the sample descriptions.
    pub description_index: u32,
}

/// Random access to the samples of one track.
pub trait SampleSource {
    fn sample_count(&self) -> u32;
    fn sample(&self, index: u32) -> Result<MediaSample>;
}

impl SampleSource for [MediaSample] {
    fn sample_count(&self) -> u32 {
        self.len() as u32
    }

    fn sample(&self, index: u32) -> Result<MediaSample> {
        self.get(index as usize).cloned().ok_or_else(|| {
            TextError::InvalidParameter(format!("sample {index} out of range"))
        })
    }
}

/// Sample `index`, or `None` (logged) when the source cannot produce it.
pub(crate) fn fetch(samples: &(impl SampleSource + ?Sized), index: u32) -> Option<MediaSample> {
    match samples.sample(index) {
        Ok(s) => Some(s),
        Err(e) => {
            log::warn!("skipping sample {}: {e}", index + 1);
            None
        }
    }
}

/// End of sample `index`: the next sample's DTS, or the media duration for
/// the last sample and when the next one is unavailable.
pub(crate) fn end_time(
    samples: &(impl SampleSource + ?Sized),
    index: u32,
    duration: u64,
) -> u64 {
    if index + 1 >= samples.sample_count() {
        return duration;
    }
    match samples.sample(index + 1) {
        Ok(next) => next.dts,
        Err(e) => {
            log::warn!("sample {} unavailable, ending cue at track end: {e}", index + 2);
            duration
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextExportFormat {
    Ttxt,
    Srt,
    Svg,
}

impl std::str::FromStr for TextExportFormat {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ttxt" => Ok(TextExportFormat::Ttxt),
            "srt" => Ok(TextExportFormat::Srt),
            "svg" => Ok(TextExportFormat::Svg),
            other => Err(TextError::InvalidParameter(format!("unknown text format {other}"))),
        }
    }
}

/// Export `trak` in `format`. SVG also needs `companion` for its NHML index.
pub fn export_text(
    trak: &IsoBox,
    samples: &(impl SampleSource + ?Sized),
    format: TextExportFormat,
    out: &mut dyn Write,
    companion: Option<&mut dyn Write>,
) -> Result<()> {
    match format {
        TextExportFormat::Ttxt => dump_ttxt(trak, samples, out),
        TextExportFormat::Srt => dump_srt(trak, samples, out),
        TextExportFormat::Svg => {
            let nhml = companion.ok_or_else(|| {
                TextError::InvalidParameter("SVG export needs an NHML output".into())
            })?;
            dump_svg(trak, samples, out, nhml)
        }
    }
}

fn body_of<'a>(b: Option<&'a IsoBox>) -> Option<&'a BoxBody> {
    b.map(|b| &b.body)
}

/// The sample entries of a `trak` (the children of its `stsd`).
pub fn sample_descriptions(trak: &IsoBox) -> Option<&[IsoBox]> {
    let BoxBody::Track(track) = &trak.body else {
        return None;
    };
    let Some(BoxBody::Media(mdia)) = body_of(track.mdia.as_deref()) else {
        return None;
    };
    let Some(BoxBody::MediaInformation(minf)) = body_of(mdia.minf.as_deref()) else {
        return None;
    };
    let Some(BoxBody::SampleTable(stbl)) = body_of(minf.stbl.as_deref()) else {
        return None;
    };
    stbl.stsd.as_deref().map(|stsd| stsd.other_boxes.as_slice())
}

/// What the exporters need to know about the track.
pub(crate) struct TextTrack<'a> {
    pub tkhd: Option<&'a TrackHeader>,
    pub timescale: u32,
    pub duration: u64,
    pub entries: &'a [IsoBox],
}

impl<'a> TextTrack<'a> {
    /// Checks the handler and the first sample entry of `trak`.
    pub fn new(trak: &'a IsoBox) -> Result<Self> {
        let bad = |msg: &str| TextError::InvalidParameter(msg.to_string());
        let BoxBody::Track(track) = &trak.body else {
            return Err(bad("not a track box"));
        };
        let tkhd = match body_of(track.tkhd.as_deref()) {
            Some(BoxBody::TrackHeader(h)) => Some(h),
            _ => None,
        };
        let Some(BoxBody::Media(mdia)) = body_of(track.mdia.as_deref()) else {
            return Err(bad("track has no media box"));
        };
        let Some(BoxBody::Handler(hdlr)) = body_of(mdia.hdlr.as_deref()) else {
            return Err(bad("track has no handler"));
        };
        if !matches!(&hdlr.handler_type.0, b"text" | b"sbtl") {
            return Err(TextError::InvalidParameter(format!(
                "handler {} is not a text handler",
                hdlr.handler_type
            )));
        }
        let (timescale, duration) = match body_of(mdia.mdhd.as_deref()) {
            Some(BoxBody::MediaHeader(m)) => (m.timescale, m.duration),
            _ => return Err(bad("track has no media header")),
        };
        let entries = sample_descriptions(trak).unwrap_or_default();
        match entries.first().map(|e| &e.typ.0) {
            Some(b"tx3g") | Some(b"text") => {}
            Some(_) => return Err(bad("first sample description is not tx3g or text")),
            None => return Err(bad("track has no sample description")),
        }
        Ok(TextTrack { tkhd, timescale, duration, entries })
    }

    /// Track width and height in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.tkhd.map(|h| (h.width >> 16, h.height >> 16)).unwrap_or((0, 0))
    }

    /// `ticks` in seconds; 0 when the timescale is unset.
    pub fn seconds(&self, ticks: u64) -> f64 {
        if self.timescale == 0 {
            0.0
        } else {
            ticks as f64 / f64::from(self.timescale)
        }
    }
}

/// CSS colour keyword for the basic palette, `#RRGGBB` otherwise. Alpha is
/// ignored.
pub fn color_name(argb: u32) -> String {
    let rgb = argb & 0x00FF_FFFF;
    let name = match rgb {
        0x000000 => "black",
        0xFFFFFF => "white",
        0xFF0000 => "red",
        0x00FF00 => "lime",
        0x0000FF => "blue",
        0xFFFF00 => "yellow",
        0x00FFFF => "cyan",
        0xFF00FF => "magenta",
        0x808080 => "gray",
        0xC0C0C0 => "silver",
        0x800000 => "maroon",
        0x008000 => "green",
        0x000080 => "navy",
        0x808000 => "olive",
        0x800080 => "purple",
        0x008080 => "teal",
        _ => return format!("#{rgb:06X}"),
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_have_names() {
        assert_eq!(color_name(0xFFFF_0000), "red");
        assert_eq!(color_name(0x00FF_FFFF), "white");
        assert_eq!(color_name(0xFF12_3456), "#123456");
    }

    #[test]
    fn format_names_parse() {
        assert_eq!("SRT".parse::<TextExportFormat>().ok(), Some(TextExportFormat::Srt));
        assert!("vtt".parse::<TextExportFormat>().is_err());
    }
}
