use mp4trace::boxes::{
    BoxBody, FileType, FourCC, FreeSpace, IsoBox, SampleDependencyType, SampleToChunk,
    SampleToChunkEntry, TrackHeader, TrackRun, TreeDocument,
};
use mp4trace::dump::{DumpError, dump_box, dump_box_ex, dump_box_expect, dump_file, Trace};

fn render(b: &IsoBox) -> String {
    let mut out = Vec::new();
    dump_box(b, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn ftyp(size: u64) -> IsoBox {
    IsoBox::with_body(
        FourCC::new(b"ftyp"),
        size,
        BoxBody::FileType(FileType {
            major_brand: FourCC::new(b"isom"),
            minor_version: 512,
            compatible_brands: vec![FourCC::new(b"isom"), FourCC::new(b"mp41")],
        }),
    )
}

#[test]
fn file_document_shape() {
    let free = IsoBox::with_body(FourCC::new(b"free"), 8, BoxBody::FreeSpace(FreeSpace { data_size: 0 }));
    let mut out = Vec::new();
    dump_file("a&b.mp4", &[ftyp(24), free], &mut out).unwrap();
    let doc = String::from_utf8(out).unwrap();

    assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!--MP4Box dump trace-->\n"));
    assert!(doc.contains(
        "<IsoMediaFile xmlns=\"urn:mpeg:isobmff:schema:file:2016\" Name=\"a&amp;b.mp4\">"
    ));
    assert!(doc.contains("<FileTypeBox Size=\"24\" Type=\"ftyp\" MajorBrand=\"isom\" MinorVersion=\"512\">"));
    assert!(doc.contains("<BrandEntry AlternateBrand=\"mp41\"/>"));
    assert!(doc.contains("<FreeSpaceBox Size=\"8\" Type=\"free\" dataSize=\"0\"/>"));
    assert!(doc.trim_end().ends_with("</IsoMediaFile>"));
    common::well_formed(&doc);
}

#[test]
fn unregistered_box_does_not_stop_siblings() {
    let stray = IsoBox::new(FourCC::new(b"zzzz"));
    let free = IsoBox::with_body(FourCC::new(b"free"), 16, BoxBody::FreeSpace(FreeSpace { data_size: 8 }));
    let mut out = Vec::new();
    dump_file("x.mp4", &[ftyp(24), stray, free], &mut out).unwrap();
    let doc = String::from_utf8(out).unwrap();

    assert!(doc.contains("</FileTypeBox>"));
    assert!(doc.contains("<!--ERROR: Invalid Top-level Box Found (\"zzzz\")-->"));
    assert!(doc.contains("<FreeSpaceBox Size=\"16\" Type=\"free\" dataSize=\"8\"/>"));
    common::well_formed(&doc);
}

#[test]
fn unregistered_box_reports_its_code() {
    let mut out = Vec::new();
    let err = dump_box(&IsoBox::new(FourCC::new(b"zzzz")), &mut out).unwrap_err();
    assert!(matches!(err, DumpError::Unregistered(c) if c == FourCC::new(b"zzzz")));
    assert!(out.is_empty());
}

#[test]
fn null_box_comments() {
    let mut out = Vec::new();
    dump_box_expect(None, FourCC::new(b"ftyp"), &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "<!--ERROR: NULL Box Found, expecting ftyp -->\n");

    let mut out = Vec::new();
    dump_box_ex(None, None, &mut Trace::new(&mut out)).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "<!--ERROR: NULL Box Found-->\n");
}

#[test]
fn large_size_and_uuid_headers() {
    let large = ftyp(0x1_0000_0010);
    assert!(render(&large).starts_with("<FileTypeBox LargeSize=\"4294967312\" Type=\"ftyp\" "));

    let mut uuid = IsoBox::new(FourCC::new(b"uuid"));
    uuid.size = 24;
    uuid.uuid = Some([
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE,
        0xFF,
    ]);
    let s = render(&uuid);
    assert!(s.starts_with(
        "<UnknownUUIDBox Size=\"24\" UUID=\"{00112233-44556677-8899AABB-CCDDEEFF}\" "
    ));
}

#[test]
fn track_header_fixed_point() {
    let mut tkhd = IsoBox::with_body(
        FourCC::new(b"tkhd"),
        92,
        BoxBody::TrackHeader(TrackHeader {
            track_id: 1,
            duration: 1000,
            width: 320 << 16,
            height: (240 << 16) | 0x8000,
            matrix: [0x10000, 0, 0, 0, 0x10000, 0, 0, 0, 0x4000_0000],
            ..Default::default()
        }),
    );
    tkhd.flags = 3;
    let s = render(&tkhd);
    assert!(s.starts_with(
        "<TrackHeaderBox Size=\"92\" Type=\"tkhd\" Version=\"0\" Flags=\"0x3\" CreationTime=\"0\" ModificationTime=\"0\" TrackID=\"1\" Duration=\"1000\" Width=\"320.00\" Height=\"240.50\">"
    ));
    assert!(s.contains("m11=\"0x00010000\""));
    assert!(s.contains("m33=\"0x40000000\"/>"));
    assert!(s.trim_end().ends_with("</TrackHeaderBox>"));
}

#[test]
fn sample_dependencies_decode() {
    let sdtp = IsoBox::with_body(
        FourCC::new(b"sdtp"),
        14,
        BoxBody::SampleDependencyType(SampleDependencyType { sample_info: Some(vec![0x24, 0x10]) }),
    );
    let s = render(&sdtp);
    assert!(s.contains("SampleCount=\"2\">"));
    assert!(s.contains(
        "<SampleDependencyEntry dependsOnOther=\"no\" dependedOn=\"yes\" hasRedundancy=\"unknown\"  />"
    ));
    assert!(s.contains(
        "<SampleDependencyEntry dependsOnOther=\"yes\" dependedOn=\"unknown\" hasRedundancy=\"unknown\"  />"
    ));
}

#[test]
fn stsc_counts_samples() {
    let stsc = IsoBox::with_body(
        FourCC::new(b"stsc"),
        40,
        BoxBody::SampleToChunk(SampleToChunk {
            entries: vec![
                SampleToChunkEntry { first_chunk: 1, samples_per_chunk: 10, sample_description_index: 1 },
                SampleToChunkEntry { first_chunk: 4, samples_per_chunk: 5, sample_description_index: 1 },
            ],
        }),
    );
    let s = render(&stsc);
    assert!(s.contains("EntryCount=\"2\">"));
    // three chunks of ten, then the last run counted once
    assert!(s.contains("<!-- counted 35 samples in STSC entries (could be less than sample count) -->"));
}

#[test]
fn placeholder_trun_has_one_empty_entry() {
    let mut trun = IsoBox::new(FourCC::new(b"trun"));
    trun.flags = 0xF05;
    let s = render(&trun);
    assert!(s.contains("<TrackRunEntry Duration=\"\" Size=\"\" CTSOffset=\"\""));
    assert_eq!(s.matches("<TrackRunEntry").count(), 1);
}

#[test]
fn trun_without_per_sample_fields() {
    let trun = IsoBox::with_body(
        FourCC::new(b"trun"),
        16,
        BoxBody::TrackRun(TrackRun { sample_count: 4, ..Default::default() }),
    );
    let s = render(&trun);
    assert!(s.contains("SampleCount=\"4\">"));
    assert!(s.contains("<!-- all default values used -->"));
}

#[test]
fn tree_from_json() {
    let json = r#"{
        "name": "clip.mp4",
        "boxes": [
            {"type": "ftyp", "size": 20, "body": {"FileType": {"major_brand": "mp42", "minor_version": 1}}},
            {"type": "free", "size": 8}
        ]
    }"#;
    let doc = TreeDocument::from_reader(json.as_bytes()).unwrap();
    assert!(matches!(doc.boxes[1].body, BoxBody::FreeSpace(_)));

    let mut out = Vec::new();
    dump_file(&doc.name, &doc.boxes, &mut out).unwrap();
    let s = String::from_utf8(out).unwrap();
    assert!(s.contains("MajorBrand=\"mp42\" MinorVersion=\"1\">"));
    assert!(s.contains("Name=\"clip.mp4\""));
}

mod common {
    pub fn well_formed(doc: &str) {
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
}
