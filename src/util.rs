use std::borrow::Cow;

/// Two uppercase hex digits per byte, no separators.
pub fn hex_upper(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// `0x` followed by [`hex_upper`].
pub fn hex_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex_upper(bytes))
}

/// Opaque payload as an octet-string data URI.
pub fn data_uri(bytes: &[u8]) -> String {
    format!("data:application/octet-string,{}", hex_upper(bytes))
}

/// Replace the five XML special characters with their entities. Every other
/// character passes through untouched.
pub fn xml_escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['\'', '"', '&', '<', '>']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            '>' => out.push_str("&gt;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Byte oriented variant of [`xml_escape`] for payloads that are not known
/// to be UTF-8. Bytes are copied as they are, so the source encoding is kept.
pub fn xml_escape_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\'' => out.extend_from_slice(b"&apos;"),
            b'"' => out.extend_from_slice(b"&quot;"),
            b'&' => out.extend_from_slice(b"&amp;"),
            b'>' => out.extend_from_slice(b"&gt;"),
            b'<' => out.extend_from_slice(b"&lt;"),
            _ => out.push(b),
        }
    }
    out
}

/// Wrap `s` in a CDATA section. An embedded `]]>` is split across two
/// sections so the markup stays well formed.
pub fn cdata(s: &str) -> String {
    format!("<![CDATA[{}]]>", s.replace("]]>", "]]]]><![CDATA[>"))
}

/// `HH:MM:SS.mmm` from media ticks. `frac_sep` is `.` for markup outputs and
/// `,` for SRT. A zero timescale renders as zero.
pub fn format_duration(ticks: u64, timescale: u32, frac_sep: char) -> String {
    let ms = if timescale == 0 {
        0
    } else {
        (u128::from(ticks) * 1000 / u128::from(timescale)) as u64
    };
    format_millis(ms, frac_sep)
}

pub fn format_millis(ms: u64, frac_sep: char) -> String {
    let h = ms / 3_600_000;
    let m = (ms / 60_000) % 60;
    let s = (ms / 1000) % 60;
    let ms = ms % 1000;
    format!("{h:02}:{m:02}:{s:02}{frac_sep}{ms:03}")
}

/// C `%g` formatting (six significant digits, trailing zeros removed),
/// which the timed text outputs use for times in seconds.
pub fn fmt_g(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if !v.is_finite() {
        return v.to_string();
    }
    let exp = v.abs().log10().floor() as i32;
    if !(-5..6).contains(&exp) {
        let s = format!("{:.5e}", v);
        let (mant, e) = s.split_once('e').unwrap_or((&s, "0"));
        let mant = trim_zeros(mant);
        let e: i32 = e.parse().unwrap_or(0);
        let sign = if e < 0 { '-' } else { '+' };
        return format!("{mant}e{sign}{:02}", e.abs());
    }
    let decimals = (5 - exp).max(0) as usize;
    trim_zeros(&format!("{:.*}", decimals, v)).to_string()
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_only_touches_specials() {
        assert_eq!(xml_escape("plain text"), "plain text");
        assert_eq!(xml_escape("a<b & 'c'>\""), "a&lt;b &amp; &apos;c&apos;&gt;&quot;");
        assert_eq!(xml_escape_bytes(b"\xA9<"), b"\xA9&lt;".to_vec());
    }

    #[test]
    fn cdata_splits_terminator() {
        assert_eq!(cdata("a]]>b"), "<![CDATA[a]]]]><![CDATA[>b]]>");
    }

    #[test]
    fn g_format_matches_printf() {
        assert_eq!(fmt_g(0.0), "0");
        assert_eq!(fmt_g(1.0), "1");
        assert_eq!(fmt_g(2.5), "2.5");
        assert_eq!(fmt_g(1.0 / 3.0), "0.333333");
        assert_eq!(fmt_g(1234567.0), "1.23457e+06");
    }

    #[test]
    fn duration_rollover() {
        assert_eq!(format_duration(3_723_004, 1000, '.'), "01:02:03.004");
        assert_eq!(format_duration(5, 0, ','), "00:00:00,000");
    }
}
