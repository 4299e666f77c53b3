use mp4trace::util::{format_duration, format_millis, xml_escape};
use quick_xml::escape::unescape;

#[test]
fn escape_is_identity_without_specials() {
    for s in ["", "plain", "©nam 2024", "tab\tand\nnewline"] {
        assert_eq!(xml_escape(s), s);
        assert!(matches!(xml_escape(s), std::borrow::Cow::Borrowed(_)));
    }
}

#[test]
fn escape_round_trips_through_a_standard_unescaper() {
    let inputs = [
        "<tag attr=\"v\">",
        "Tom & Jerry's",
        "&amp; already escaped",
        "]]> and --",
        "日本語 <b>",
        "'\"&<>",
    ];
    for s in inputs {
        let escaped = xml_escape(s);
        assert!(!escaped.contains(['<', '>', '"', '\'']));
        assert_eq!(unescape(&escaped).unwrap(), s);
    }
}

#[test]
fn escape_is_idempotent_once_clean() {
    let once = xml_escape("a < b");
    let clean: String = once.replace('&', "and");
    assert_eq!(xml_escape(&clean), clean);
}

#[test]
fn duration_formatting() {
    for ts in [1, 600, 1000, 90_000, 10_000_000] {
        assert_eq!(format_duration(0, ts, '.'), "00:00:00.000");
        assert_eq!(format_duration(u64::from(ts), ts, '.'), "00:00:01.000");
    }
    assert_eq!(format_duration(2500, 1000, ','), "00:00:02,500");
    assert_eq!(format_duration(90_000 * 3661, 90_000, '.'), "01:01:01.000");
    assert_eq!(format_millis(59_999, '.'), "00:00:59.999");
}
