//! Decoder for 3GPP timed text sample payloads.

use crate::boxes::{
    BoxRecord, KaraokeRecord, StyleRecord, TextBlink, TextHighlight, TextHyperText, TextKaraoke,
};
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Cursor, Read};

#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("truncated {0}")]
    Truncated(&'static str),
    #[error("text is not valid UTF-8")]
    BadUtf8,
    #[error("text is not valid UTF-16")]
    BadUtf16,
}

type Result<T> = std::result::Result<T, SampleError>;

/// Modifiers that carry their own character range, kept in payload order.
#[derive(Debug, Clone, PartialEq)]
pub enum TextModifier {
    Highlight(TextHighlight),
    HyperText(TextHyperText),
    Blink(TextBlink),
    Karaoke(TextKaraoke),
}

/// One decoded text sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextSample {
    pub text: Vec<char>,
    pub styles: Vec<StyleRecord>,
    /// ARGB
    pub highlight_color: Option<u32>,
    pub scroll_delay: Option<u32>,
    pub wrap: Option<u8>,
    pub text_box: Option<BoxRecord>,
    pub others: Vec<TextModifier>,
}

fn u8_of(c: &mut Cursor<&[u8]>, what: &'static str) -> Result<u8> {
    c.read_u8().map_err(|_| SampleError::Truncated(what))
}

fn u16_of(c: &mut Cursor<&[u8]>, what: &'static str) -> Result<u16> {
    c.read_u16::<BigEndian>().map_err(|_| SampleError::Truncated(what))
}

fn i16_of(c: &mut Cursor<&[u8]>, what: &'static str) -> Result<i16> {
    c.read_i16::<BigEndian>().map_err(|_| SampleError::Truncated(what))
}

fn u32_of(c: &mut Cursor<&[u8]>, what: &'static str) -> Result<u32> {
    c.read_u32::<BigEndian>().map_err(|_| SampleError::Truncated(what))
}

/// RGBA on the wire, ARGB in memory.
fn color_of(c: &mut Cursor<&[u8]>, what: &'static str) -> Result<u32> {
    let rgba = u32_of(c, what)?;
    Ok(rgba.rotate_right(8))
}

/// Pascal string: u8 length, then bytes.
fn pstring(c: &mut Cursor<&[u8]>, what: &'static str) -> Result<String> {
    let len = u8_of(c, what)?;
    let mut buf = vec![0u8; usize::from(len)];
    c.read_exact(&mut buf).map_err(|_| SampleError::Truncated(what))?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn decode_text(bytes: &[u8]) -> Result<Vec<char>> {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units = bytes[2..]
            .chunks_exact(2)
            .map(|p| u16::from_be_bytes([p[0], p[1]]));
        return char::decode_utf16(units)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| SampleError::BadUtf16);
    }
    std::str::from_utf8(bytes)
        .map(|s| s.chars().collect())
        .map_err(|_| SampleError::BadUtf8)
}

impl TextSample {
    pub fn parse(data: &[u8]) -> Result<TextSample> {
        let mut sample = TextSample::default();
        if data.is_empty() {
            return Ok(sample);
        }
        let mut c = Cursor::new(data);
        let len = usize::from(u16_of(&mut c, "text length")?);
        let rest = &data[2..];
        if rest.len() < len {
            return Err(SampleError::Truncated("text"));
        }
        sample.text = decode_text(&rest[..len])?;

        let mut mods = &rest[len..];
        while mods.len() >= 8 {
            let size = u32::from_be_bytes([mods[0], mods[1], mods[2], mods[3]]) as usize;
            if size < 8 || size > mods.len() {
                return Err(SampleError::Truncated("modifier box"));
            }
            let code = [mods[4], mods[5], mods[6], mods[7]];
            sample.modifier(&code, &mods[8..size])?;
            mods = &mods[size..];
        }
        Ok(sample)
    }

    fn modifier(&mut self, code: &[u8; 4], payload: &[u8]) -> Result<()> {
        let mut c = Cursor::new(payload);
        match code {
            b"styl" => {
                let count = u16_of(&mut c, "styl")?;
                for _ in 0..count {
                    self.styles.push(StyleRecord {
                        start_char: u16_of(&mut c, "styl")?,
                        end_char: u16_of(&mut c, "styl")?,
                        font_id: u16_of(&mut c, "styl")?,
                        style_flags: u8_of(&mut c, "styl")?,
                        font_size: u8_of(&mut c, "styl")?,
                        text_color: color_of(&mut c, "styl")?,
                    });
                }
            }
            b"hlit" => self.others.push(TextModifier::Highlight(TextHighlight {
                start_char: u16_of(&mut c, "hlit")?,
                end_char: u16_of(&mut c, "hlit")?,
            })),
            b"hclr" => self.highlight_color = Some(color_of(&mut c, "hclr")?),
            b"krok" => {
                let highlight_starttime = u32_of(&mut c, "krok")?;
                let n = u16_of(&mut c, "krok")?;
                let mut records = Vec::with_capacity(usize::from(n));
                for _ in 0..n {
                    records.push(KaraokeRecord {
                        highlight_endtime: u32_of(&mut c, "krok")?,
                        start_char: u16_of(&mut c, "krok")?,
                        end_char: u16_of(&mut c, "krok")?,
                    });
                }
                self.others.push(TextModifier::Karaoke(TextKaraoke {
                    highlight_starttime,
                    records,
                }));
            }
            b"dlay" => self.scroll_delay = Some(u32_of(&mut c, "dlay")?),
            b"href" => {
                let start_char = u16_of(&mut c, "href")?;
                let end_char = u16_of(&mut c, "href")?;
                let url = pstring(&mut c, "href")?;
                let url_hint = pstring(&mut c, "href")?;
                self.others.push(TextModifier::HyperText(TextHyperText {
                    start_char,
                    end_char,
                    url: Some(url),
                    url_hint: Some(url_hint),
                }));
            }
            b"tbox" => {
                self.text_box = Some(BoxRecord {
                    top: i16_of(&mut c, "tbox")?,
                    left: i16_of(&mut c, "tbox")?,
                    bottom: i16_of(&mut c, "tbox")?,
                    right: i16_of(&mut c, "tbox")?,
                })
            }
            b"blnk" => self.others.push(TextModifier::Blink(TextBlink {
                start_char: u16_of(&mut c, "blnk")?,
                end_char: u16_of(&mut c, "blnk")?,
            })),
            b"twrp" => self.wrap = Some(u8_of(&mut c, "twrp")?),
            _ => log::debug!("skipping text modifier {}", String::from_utf8_lossy(code)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(text: &[u8], mods: &[u8]) -> Vec<u8> {
        let mut v = (text.len() as u16).to_be_bytes().to_vec();
        v.extend_from_slice(text);
        v.extend_from_slice(mods);
        v
    }

    #[test]
    fn utf16_text_with_bom() {
        let s = TextSample::parse(&payload(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0xE9], &[])).unwrap();
        assert_eq!(s.text, vec!['H', 'é']);
    }

    #[test]
    fn style_colour_becomes_argb() {
        let mut styl = vec![0, 0, 0, 22, b's', b't', b'y', b'l', 0, 1];
        styl.extend_from_slice(&[0, 0, 0, 5, 0, 1, 1, 18, 0x11, 0x22, 0x33, 0xFF]);
        let s = TextSample::parse(&payload(b"Hello", &styl)).unwrap();
        assert_eq!(s.styles.len(), 1);
        assert_eq!(s.styles[0].text_color, 0xFF11_2233);
        assert_eq!(s.styles[0].end_char, 5);
    }

    #[test]
    fn unknown_modifiers_are_skipped() {
        let mods = [0, 0, 0, 10, b'z', b'z', b'z', b'z', 1, 2, 0, 0, 0, 9, b't', b'w', b'r', b'p', 1];
        let s = TextSample::parse(&payload(b"a", &mods)).unwrap();
        assert_eq!(s.wrap, Some(1));
    }

    #[test]
    fn oversized_modifier_is_an_error() {
        let mods = [0, 0, 0, 40, b'h', b'l', b'i', b't', 0, 0];
        assert!(matches!(
            TextSample::parse(&payload(b"a", &mods)),
            Err(SampleError::Truncated(_))
        ));
    }

    #[test]
    fn empty_cue() {
        let s = TextSample::parse(&[0, 0]).unwrap();
        assert!(s.text.is_empty());
    }
}
