use mp4trace::boxes::{
    BoxBody, FourCC, Handler, IsoBox, Media, MediaHeader, MediaInformation, STYLE_BOLD,
    SampleTable, StyleRecord, Track, TrackHeader, Tx3gSampleEntry,
};
use mp4trace::text::{
    SampleSource, TextError, TextExportFormat, dump_srt, dump_svg, dump_ttxt, export_text,
};
use mp4trace::MediaSample;

fn node(code: &[u8; 4], body: BoxBody) -> Box<IsoBox> {
    Box::new(IsoBox::with_body(FourCC::new(code), 8, body))
}

/// A `trak` with the given handler, a 1000 Hz media timescale and one
/// sample entry of type `entry`.
fn text_track(handler: &[u8; 4], entry: &[u8; 4], duration: u64) -> IsoBox {
    let mut stsd = IsoBox::new(FourCC::new(b"stsd"));
    stsd.size = 16;
    let mut e = IsoBox::new(FourCC::new(entry));
    e.size = 64;
    if let BoxBody::Tx3gSampleEntry(tx3g) = &mut e.body {
        *tx3g = Tx3gSampleEntry {
            data_reference_index: 1,
            default_style: StyleRecord { font_id: 1, font_size: 18, text_color: 0xFFFF_FFFF, ..Default::default() },
            ..Default::default()
        };
    }
    stsd.other_boxes.push(e);

    let stbl = SampleTable { stsd: Some(Box::new(stsd)), ..Default::default() };
    let minf = MediaInformation { stbl: Some(node(b"stbl", BoxBody::SampleTable(stbl))), ..Default::default() };
    let media = Media {
        mdhd: Some(node(
            b"mdhd",
            BoxBody::MediaHeader(MediaHeader { timescale: 1000, duration, ..Default::default() }),
        )),
        hdlr: Some(node(
            b"hdlr",
            BoxBody::Handler(Handler { handler_type: FourCC::new(handler), ..Default::default() }),
        )),
        minf: Some(node(b"minf", BoxBody::MediaInformation(minf))),
    };
    let track = Track {
        tkhd: Some(node(
            b"tkhd",
            BoxBody::TrackHeader(TrackHeader {
                width: 320 << 16,
                height: 240 << 16,
                ..Default::default()
            }),
        )),
        mdia: Some(node(b"mdia", BoxBody::Media(media))),
        ..Default::default()
    };
    IsoBox::with_body(FourCC::new(b"trak"), 8, BoxBody::Track(track))
}

/// Text sample payload: u16 length, UTF-8 text, then modifier boxes.
fn payload(text: &str, modifiers: &[u8]) -> Vec<u8> {
    let mut v = (text.len() as u16).to_be_bytes().to_vec();
    v.extend_from_slice(text.as_bytes());
    v.extend_from_slice(modifiers);
    v
}

/// `styl` box with one run.
fn styl(start: u16, end: u16, flags: u8) -> Vec<u8> {
    let mut v = 22u32.to_be_bytes().to_vec();
    v.extend_from_slice(b"styl");
    v.extend_from_slice(&1u16.to_be_bytes());
    v.extend_from_slice(&start.to_be_bytes());
    v.extend_from_slice(&end.to_be_bytes());
    v.extend_from_slice(&1u16.to_be_bytes()); // font id
    v.push(flags);
    v.push(18); // font size
    v.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF]); // white, same as the default
    v
}

fn sample(dts: u64, data: Vec<u8>) -> MediaSample {
    MediaSample { dts, data, description_index: 1 }
}

fn three_cues() -> Vec<MediaSample> {
    vec![
        sample(0, payload("First", &[])),
        sample(1000, payload("Hello world", &styl(0, 5, STYLE_BOLD))),
        sample(2500, payload("Last", &[])),
    ]
}

#[test]
fn srt_cues_and_bold_run() {
    let trak = text_track(b"text", b"tx3g", 4000);
    let mut out = Vec::new();
    dump_srt(&trak, three_cues().as_slice(), &mut out).unwrap();
    let srt = String::from_utf8(out).unwrap();

    let expected = "1\n00:00:00,000 --> 00:00:01,000\nFirst\n\n\
                    2\n00:00:01,000 --> 00:00:02,500\n<b>Hello</b> world\n\n\
                    3\n00:00:02,500 --> 00:00:04,000\nLast\n\n";
    assert_eq!(srt, expected);
}

#[test]
fn srt_skips_two_byte_samples() {
    let trak = text_track(b"sbtl", b"tx3g", 3000);
    let samples = vec![sample(0, vec![0, 0]), sample(1000, payload("Only", &[]))];
    let mut out = Vec::new();
    dump_srt(&trak, samples.as_slice(), &mut out).unwrap();
    let srt = String::from_utf8(out).unwrap();
    assert!(srt.starts_with("1\n00:00:01,000 --> 00:00:03,000\nOnly\n"));
    assert_eq!(srt.matches("-->").count(), 1);
}

#[test]
fn undecodable_sample_is_skipped() {
    let trak = text_track(b"text", b"tx3g", 3000);
    // text length claims 9 bytes but only 2 follow
    let samples = vec![sample(0, vec![0, 9, b'a', b'b']), sample(1000, payload("ok", &[]))];
    let mut out = Vec::new();
    dump_srt(&trak, samples.as_slice(), &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "1\n00:00:01,000 --> 00:00:03,000\nok\n\n");
}

/// Three cues at 0, 1000 and 2000 whose middle one cannot be read.
struct MissingMiddle(Vec<MediaSample>);

impl MissingMiddle {
    fn new() -> Self {
        MissingMiddle(vec![
            sample(0, payload("First", &[])),
            sample(1000, payload("Second", &[])),
            sample(2000, payload("Third", &[])),
        ])
    }
}

impl SampleSource for MissingMiddle {
    fn sample_count(&self) -> u32 {
        self.0.len() as u32
    }

    fn sample(&self, index: u32) -> Result<MediaSample, TextError> {
        if index == 1 {
            return Err(TextError::InvalidParameter("unavailable".into()));
        }
        self.0.sample(index)
    }
}

#[test]
fn unreadable_sample_does_not_stop_srt() {
    let trak = text_track(b"text", b"tx3g", 4000);
    let mut out = Vec::new();
    dump_srt(&trak, &MissingMiddle::new(), &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "1\n00:00:00,000 --> 00:00:04,000\nFirst\n\n\
         2\n00:00:02,000 --> 00:00:04,000\nThird\n\n"
    );
}

#[test]
fn unreadable_sample_does_not_stop_ttxt_or_svg() {
    let trak = text_track(b"text", b"tx3g", 4000);
    let source = MissingMiddle::new();

    let mut out = Vec::new();
    dump_ttxt(&trak, &source, &mut out).unwrap();
    let doc = String::from_utf8(out).unwrap();
    assert!(doc.contains(">First"));
    assert!(doc.contains(">Third"));
    assert!(!doc.contains("Second"));
    assert!(doc.trim_end().ends_with("</TextStream>"));
    well_formed(&doc);

    let mut svg = Vec::new();
    let mut nhml = Vec::new();
    dump_svg(&trak, &source, &mut svg, &mut nhml).unwrap();
    let svg = String::from_utf8(svg).unwrap();
    assert!(svg.contains("<set attributeName=\"display\" to=\"inline\" begin=\"0\" end=\"4\"/>"));
    assert!(svg.contains(" <text id=\"text_2\" display=\"none\">Third\n"));
    well_formed(&svg);
}

#[test]
fn non_text_handler_is_rejected_before_output() {
    let trak = text_track(b"vide", b"tx3g", 1000);
    let mut out = Vec::new();
    let err = dump_ttxt(&trak, three_cues().as_slice(), &mut out).unwrap_err();
    assert!(matches!(err, TextError::InvalidParameter(_)));
    assert!(out.is_empty());
}

#[test]
fn non_text_entry_is_rejected() {
    let trak = text_track(b"text", b"mp4a", 1000);
    let mut out = Vec::new();
    let err = dump_srt(&trak, three_cues().as_slice(), &mut out).unwrap_err();
    assert!(matches!(err, TextError::InvalidParameter(_)));
    assert!(out.is_empty());
}

#[test]
fn ttxt_corrects_offsets_after_crlf() {
    let trak = text_track(b"text", b"tx3g", 2000);
    // "ab\r\ncd": the run [4,6) covers "cd", which is [3,5) once CRLF is one break
    let samples = vec![sample(0, payload("ab\r\ncd", &styl(4, 6, STYLE_BOLD)))];
    let mut out = Vec::new();
    dump_ttxt(&trak, samples.as_slice(), &mut out).unwrap();
    let doc = String::from_utf8(out).unwrap();

    assert!(doc.contains("<TextSample sampleTime=\"00:00:00.000\" xml:space=\"preserve\">ab\ncd"));
    assert!(doc.contains("<Style fromChar=\"3\" toChar=\"5\" styles=\"Bold \""));
    assert!(doc.contains("<TextSample sampleTime=\"00:00:02.000\" text=\"\" />"));
    assert!(doc.trim_end().ends_with("</TextStream>"));
    well_formed(&doc);
}

#[test]
fn ttxt_header_replaces_empty_default_box() {
    let trak = text_track(b"text", b"tx3g", 1000);
    let mut out = Vec::new();
    dump_ttxt(&trak, three_cues().as_slice(), &mut out).unwrap();
    let doc = String::from_utf8(out).unwrap();
    assert!(doc.contains("<TextStreamHeader width=\"320\" height=\"240\" layer=\"0\""));
    assert!(doc.contains("<TextBox top=\"0\" left=\"0\" bottom=\"240\" right=\"320\"/>"));
    assert!(doc.contains("scroll=\"None\""));
    well_formed(&doc);
}

#[test]
fn svg_and_nhml_index() {
    let trak = text_track(b"text", b"tx3g", 4000);
    let mut svg = Vec::new();
    let mut nhml = Vec::new();
    dump_svg(&trak, three_cues().as_slice(), &mut svg, &mut nhml).unwrap();
    let svg = String::from_utf8(svg).unwrap();
    let nhml = String::from_utf8(nhml).unwrap();

    assert!(svg.contains("<g transform=\"translate(160, 120)\" text-anchor=\"middle\">"));
    assert!(svg.contains(" <text id=\"text_2\" display=\"none\">Hello world\n"));
    assert!(svg.contains("<set attributeName=\"display\" to=\"inline\" begin=\"1\" end=\"2.5\"/>"));
    assert!(svg.contains("<set attributeName=\"display\" to=\"inline\" begin=\"2.5\" end=\"4\"/>"));
    assert!(svg.contains("<discard begin=\"4\"/>"));
    well_formed(&svg);

    assert!(nhml.contains("xmlFrom=\"doc.start\" xmlTo=\"text_1.start\""));
    assert!(nhml.contains("DTS=\"1000.000000\" xmlFrom=\"text_2.start\" xmlTo=\"text_3.start\""));
    assert!(nhml.contains("DTS=\"2500.000000\" xmlFrom=\"text_3.start\" xmlTo=\"doc.end\""));
    well_formed(&nhml);
}

#[test]
fn svg_export_needs_a_companion() {
    let trak = text_track(b"text", b"tx3g", 4000);
    let mut out = Vec::new();
    let err = export_text(&trak, three_cues().as_slice(), TextExportFormat::Svg, &mut out, None)
        .unwrap_err();
    assert!(matches!(err, TextError::InvalidParameter(_)));
}

fn well_formed(doc: &str) {
    use quick_xml::{Reader, events::Event};
    let mut reader = Reader::from_str(doc);
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("not well formed at {}: {e}", reader.buffer_position()),
        }
    }
}
