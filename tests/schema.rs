use mp4trace::registry::default_registry;
use mp4trace::{FourCC, dump_schema};
use quick_xml::{Reader, events::Event};

fn schema() -> String {
    let mut out = Vec::new();
    dump_schema(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

/// Names of the elements directly under the `<Boxes>` root, in order.
fn top_elements(doc: &str) -> Vec<String> {
    let mut reader = Reader::from_str(doc);
    let mut depth = 0usize;
    let mut names = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if depth == 1 {
                    names.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                }
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                if depth == 1 {
                    names.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                }
            }
            Ok(Event::End(_)) => depth -= 1,
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("schema not well formed at {}: {e}", reader.buffer_position()),
        }
    }
    names
}

#[test]
fn one_element_per_row() {
    let doc = schema();
    let names = top_elements(&doc);
    assert_eq!(names.len(), default_registry().row_count());
}

#[test]
fn row_order_is_document_order() {
    let names = top_elements(&schema());
    assert_eq!(names[0], "UnknownBox");
    assert_eq!(names[1], "TrackReferenceTypeBox");
    assert_eq!(names.last().map(String::as_str), Some("GroupListBox"));

    let rows = default_registry().rows();
    assert_eq!(rows[0].code, FourCC::new(b"UNKN"));
    assert_eq!(rows[1].alt, Some(FourCC::new(b"mpod")));
    assert_eq!(rows.last().map(|r| r.code), Some(FourCC::new(b"grpl")));
}

#[test]
fn placeholders_are_size_zero_with_forced_hints() {
    let doc = schema();
    assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
    assert!(doc.contains("<Boxes>"));
    assert!(doc.contains("<MovieHeaderBox Size=\"0\" Type=\"mvhd\" Version=\"1\" Flags=\"0x0\" "));
    assert!(doc.contains("<TrackRunBox Size=\"0\" Type=\"trun\" Version=\"0\" Flags=\"0xF05\" "));
    assert!(doc.contains("<SampleDependencyEntry dependsOnOther=\"unknown|yes|no|RESERVED\""));
    assert!(doc.contains("<SampleToChunkEntry FirstChunk=\"\" SamplesPerChunk=\"\" SampleDescriptionIndex=\"\"/>"));
    assert!(!doc.contains("NULL Box"));
    assert!(doc.trim_end().ends_with("</Boxes>"));
}

#[test]
fn schema_is_stable() {
    assert_eq!(schema(), schema());
}
