use mp4trace::boxes::{
    BoxBody, DataTableEntry, FourCC, HintSample, IsoBox, Media, MediaInformation, RtpPacket,
    SampleTable, Track,
};
use mp4trace::dump::{IsmaSample, dump_hint_sample, dump_isma_sample, dump_protected_entries};

fn boxed(code: &[u8; 4], body: BoxBody) -> Option<Box<IsoBox>> {
    Some(Box::new(IsoBox::with_body(FourCC::new(code), 8, body)))
}

/// trak > mdia > minf > stbl > stsd holding `entries`.
fn track_with_entries(entries: &[&[u8; 4]]) -> IsoBox {
    let mut stsd = IsoBox::new(FourCC::new(b"stsd"));
    stsd.size = 16;
    for code in entries {
        let mut e = IsoBox::new(FourCC::new(code));
        e.size = 36;
        stsd.other_boxes.push(e);
    }
    let stbl = SampleTable { stsd: Some(Box::new(stsd)), ..Default::default() };
    let minf = MediaInformation { stbl: boxed(b"stbl", BoxBody::SampleTable(stbl)), ..Default::default() };
    let mdia = Media { minf: boxed(b"minf", BoxBody::MediaInformation(minf)), ..Default::default() };
    let track = Track { mdia: boxed(b"mdia", BoxBody::Media(mdia)), ..Default::default() };
    IsoBox::with_body(FourCC::new(b"trak"), 8, BoxBody::Track(track))
}

#[test]
fn only_protected_entries_are_listed() {
    let trak = track_with_entries(&[b"mp4a", b"enca"]);
    let mut out = Vec::new();
    dump_protected_entries(&trak, &mut out).unwrap();
    let s = String::from_utf8(out).unwrap();
    assert!(s.starts_with("<ISMACrypSampleDescriptions>\n"));
    assert!(s.contains("Type=\"enca\""));
    assert!(!s.contains("Type=\"mp4a\""));
    assert!(s.trim_end().ends_with("</ISMACrypSampleDescriptions>"));
}

#[test]
fn track_without_sample_descriptions_fails() {
    let trak = IsoBox::with_body(FourCC::new(b"trak"), 8, BoxBody::Track(Track::default()));
    let mut out = Vec::new();
    assert!(dump_protected_entries(&trak, &mut out).is_err());
}

#[test]
fn isma_sample_line() {
    let s = IsmaSample {
        data_length: 512,
        dts: 1000,
        cts_offset: 20,
        is_rap: true,
        is_encrypted: true,
        iv: 42,
        key_indicator: vec![0xAB, 0x01],
    };
    let mut out = Vec::new();
    dump_isma_sample(3, &s, true, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "<ISMACrypSample SampleNumber=\"3\" DataSize=\"512\" CompositionTime=\"1020\" DecodingTime=\"1000\" RandomAccessPoint=\"Yes\" IsEncrypted=\"Yes\" IV=\"42\" KeyIndicator=\"0xAB01\" />\n"
    );
}

#[test]
fn clear_isma_sample_has_no_iv() {
    let s = IsmaSample { data_length: 10, ..Default::default() };
    let mut out = Vec::new();
    dump_isma_sample(1, &s, false, &mut out).unwrap();
    let line = String::from_utf8(out).unwrap();
    assert!(line.contains("IsEncrypted=\"No\" "));
    assert!(!line.contains("IV="));
    assert!(!line.contains("RandomAccessPoint"));
}

#[test]
fn hint_sample_packets_and_data_table() {
    let sample = HintSample {
        dts: 3000,
        is_rap: true,
        packets: vec![RtpPacket {
            payload_type: 96,
            sequence_number: 7,
            m_bit: 1,
            data_table: vec![
                DataTableEntry::Immediate { data: vec![1, 2, 3, 4] },
                DataTableEntry::Sample {
                    data_length: 100,
                    byte_offset: 0,
                    sample_number: 5,
                    track_ref_index: -1,
                },
            ],
            ..Default::default()
        }],
    };
    let mut out = Vec::new();
    dump_hint_sample(1, &sample, &mut out).unwrap();
    let s = String::from_utf8(out).unwrap();

    assert!(s.starts_with(
        "<RTPHintSample SampleNumber=\"1\" DecodingTime=\"3000\" RandomAccessPoint=\"1\" PacketCount=\"1\">"
    ));
    assert!(s.contains("PayloadType=\"96\" SequenceNumber=\"7\""));
    // 12 byte RTP header, 4 immediate bytes, 100 sample bytes
    assert!(s.contains("FullPacketSize=\"116\">"));
    assert!(s.contains("<ImmediateDataEntry DataSize=\"4\"/>"));
    assert!(s.contains(
        "<SampleDataEntry DataSize=\"100\" SampleOffset=\"0\" SampleNumber=\"5\" TrackReference=\"-1\"/>"
    ));
    assert!(!s.contains("PrivateExtensionTable"));
    assert!(s.trim_end().ends_with("</RTPHintSample>"));
}
