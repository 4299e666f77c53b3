//! Recursive tree renderer and the XML trace document driver.
//!
//! [`Trace`] wraps the output stream and carries the shared helpers every
//! per-type renderer uses: the element header, the full box attributes, the
//! closer that flushes unattached children, and child recursion.

use crate::boxes::{FourCC, IsoBox, codes};
use crate::registry::default_registry;
use crate::util::xml_escape;
use log::error;
use std::io::{self, Write};

#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("trying to dump box {0} not registered")]
    Unregistered(FourCC),
    #[error("invalid file: {0}")]
    InvalidFile(String),
}

pub type Result<T> = std::result::Result<T, DumpError>;

/// Payload of `b` does not have the layout its registered renderer expects.
pub(crate) fn mismatch(b: &IsoBox) -> DumpError {
    DumpError::InvalidFile(format!("payload of {} does not match its type", b.typ))
}

/// Top level codes accepted without a warning comment.
const TOP_LEVEL: &[&[u8; 4]] = &[
    b"ftyp", b"moov", b"mdat", b"free", b"meta", b"skip", b"moof", b"styp", b"sidx", b"ssix",
    b"pcrb", b"afra", b"abst", b"mfra", b"prft", b"uuid",
];

/// Output sink handed to every renderer.
pub struct Trace<'w> {
    out: &'w mut dyn Write,
}

impl Write for Trace<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<'w> Trace<'w> {
    pub fn new(out: &'w mut dyn Write) -> Self {
        Trace { out }
    }

    /// Element header: `<Name Size="N" Type="4cc" `.
    pub fn open(&mut self, name: &str, b: &IsoBox) -> Result<()> {
        self.open_as(name, b, b.typ)
    }

    /// Element header showing `display` instead of the node's own code.
    /// Used where several logical identities share one internal code.
    pub fn open_as(&mut self, name: &str, b: &IsoBox, display: FourCC) -> Result<()> {
        write!(self, "<{name} ")?;
        if b.size > 0xFFFF_FFFF {
            write!(self, "LargeSize=\"{}\" ", b.size)?;
        } else {
            write!(self, "Size=\"{}\" ", b.size)?;
        }
        if b.typ == codes::UUID {
            let uuid = b.uuid.unwrap_or_default();
            write!(self, "UUID=\"{{")?;
            for (i, byte) in uuid.iter().enumerate() {
                write!(self, "{byte:02X}")?;
                if i < 15 && i % 4 == 3 {
                    write!(self, "-")?;
                }
            }
            write!(self, "}}\" ")?;
        } else {
            write!(self, "Type=\"{}\" ", xml_escape(&display.as_str_lossy()))?;
        }
        Ok(())
    }

    /// `Version="V" Flags="0xF" ` of a full box.
    pub fn full(&mut self, b: &IsoBox) -> Result<()> {
        write!(self, "Version=\"{}\" Flags=\"0x{:X}\" ", b.version, b.flags)?;
        Ok(())
    }

    /// Renders the unattached children of `b`, then `</name>` if a name is
    /// given.
    pub fn done(&mut self, name: Option<&str>, b: Option<&IsoBox>) -> Result<()> {
        if let Some(b) = b {
            self.children(&b.other_boxes)?;
        }
        if let Some(name) = name {
            writeln!(self, "</{name}>")?;
        }
        Ok(())
    }

    /// Render an optional child. Only output errors propagate; anything
    /// else was already reported and the parent carries on.
    pub fn child(&mut self, b: Option<&IsoBox>) -> Result<()> {
        swallow(dump_box_ex(b, None, self))
    }

    /// Like [`Trace::child`], naming the expected code when it is absent.
    pub fn child_expect(&mut self, b: Option<&IsoBox>, expected: FourCC) -> Result<()> {
        swallow(dump_box_ex(b, Some(expected), self))
    }

    /// Render `b` when present. An absent optional child writes nothing.
    pub fn child_opt(&mut self, b: Option<&IsoBox>) -> Result<()> {
        match b {
            Some(b) => self.child(Some(b)),
            None => Ok(()),
        }
    }

    pub fn children(&mut self, list: &[IsoBox]) -> Result<()> {
        for b in list {
            self.child(Some(b))?;
        }
        Ok(())
    }

    /// `"text"` escaped for an attribute value.
    pub fn text(&mut self, s: &str) -> Result<()> {
        self.write_all(xml_escape(s).as_bytes())?;
        Ok(())
    }
}

pub(crate) fn swallow(r: Result<()>) -> Result<()> {
    match r {
        Err(DumpError::Io(e)) => Err(DumpError::Io(e)),
        _ => Ok(()),
    }
}

/// Render one node through its registered renderer.
///
/// An absent node writes a `NULL Box` comment and succeeds. A node whose
/// code has no registry row logs an error and fails with
/// [`DumpError::Unregistered`] without writing anything.
pub fn dump_box_ex(b: Option<&IsoBox>, expected: Option<FourCC>, t: &mut Trace<'_>) -> Result<()> {
    let Some(b) = b else {
        match expected {
            Some(code) if !code.is_zero() => {
                writeln!(t, "<!--ERROR: NULL Box Found, expecting {} -->", code.as_str_lossy())?
            }
            _ => writeln!(t, "<!--ERROR: NULL Box Found-->")?,
        }
        return Ok(());
    };
    match default_registry().lookup(b.typ) {
        Some(row) => row.render(b, t),
        None => {
            error!("[isom] trying to dump box {} not registered", b.typ);
            Err(DumpError::Unregistered(b.typ))
        }
    }
}

pub fn dump_box(b: &IsoBox, out: &mut dyn Write) -> Result<()> {
    dump_box_ex(Some(b), None, &mut Trace::new(out))
}

pub fn dump_box_expect(b: Option<&IsoBox>, expected: FourCC, out: &mut dyn Write) -> Result<()> {
    dump_box_ex(b, Some(expected), &mut Trace::new(out))
}

/// Write the complete trace document of a file named `name` whose top level
/// boxes are `boxes`. Nodes that fail to render are reported and skipped.
pub fn dump_file(name: &str, boxes: &[IsoBox], out: &mut dyn Write) -> Result<()> {
    let mut t = Trace::new(out);
    writeln!(t, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(t, "<!--MP4Box dump trace-->")?;
    writeln!(
        t,
        "<IsoMediaFile xmlns=\"urn:mpeg:isobmff:schema:file:2016\" Name=\"{}\">",
        xml_escape(name)
    )?;
    for b in boxes {
        if !TOP_LEVEL.iter().any(|c| b.typ.0 == **c) {
            writeln!(
                t,
                "<!--ERROR: Invalid Top-level Box Found (\"{}\")-->",
                xml_escape(&b.typ.as_str_lossy())
            )?;
        }
        swallow(dump_box_ex(Some(b), None, &mut t))?;
    }
    writeln!(t, "</IsoMediaFile>")?;
    Ok(())
}

/// Sample entry types that carry a protection scheme.
fn is_protected_entry(code: FourCC) -> bool {
    [codes::ENCA, codes::ENCV, codes::ENCT, codes::ENCS].contains(&code)
}

/// List the protected sample descriptions of a `trak`.
pub fn dump_protected_entries(trak: &IsoBox, out: &mut dyn Write) -> Result<()> {
    let stsd = crate::text::sample_descriptions(trak).ok_or_else(|| {
        DumpError::InvalidFile(format!("{} has no sample description box", trak.typ))
    })?;
    let mut t = Trace::new(out);
    writeln!(t, "<ISMACrypSampleDescriptions>")?;
    for entry in stsd.iter().filter(|e| is_protected_entry(e.typ)) {
        swallow(dump_box_ex(Some(entry), None, &mut t))?;
    }
    writeln!(t, "</ISMACrypSampleDescriptions>")?;
    Ok(())
}

/// Layout of one ISMACryp protected access unit.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct IsmaSample {
    pub data_length: u32,
    pub dts: u64,
    pub cts_offset: i32,
    pub is_rap: bool,
    pub is_encrypted: bool,
    pub iv: u64,
    pub key_indicator: Vec<u8>,
}

/// One `<ISMACrypSample/>` line. `has_sync_points` mirrors whether the
/// track carries a sync sample table.
pub fn dump_isma_sample(
    number: u32,
    s: &IsmaSample,
    has_sync_points: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let cts = s.dts as i64 + i64::from(s.cts_offset);
    write!(
        out,
        "<ISMACrypSample SampleNumber=\"{number}\" DataSize=\"{}\" CompositionTime=\"{cts}\" ",
        s.data_length
    )?;
    if s.cts_offset != 0 {
        write!(out, "DecodingTime=\"{}\" ", s.dts)?;
    }
    if has_sync_points {
        write!(out, "RandomAccessPoint=\"{}\" ", if s.is_rap { "Yes" } else { "No" })?;
    }
    write!(out, "IsEncrypted=\"{}\" ", if s.is_encrypted { "Yes" } else { "No" })?;
    if s.is_encrypted {
        write!(out, "IV=\"{}\" ", s.iv)?;
        if !s.key_indicator.is_empty() {
            write!(out, "KeyIndicator=\"{}\" ", crate::util::hex_prefixed(&s.key_indicator))?;
        }
    }
    writeln!(out, "/>")?;
    Ok(())
}

/// Render a decoded RTP hint sample with its packets.
pub fn dump_hint_sample(number: u32, s: &crate::boxes::HintSample, out: &mut dyn Write) -> Result<()> {
    use crate::boxes::DataTableEntry as D;

    let mut t = Trace::new(out);
    writeln!(
        t,
        "<RTPHintSample SampleNumber=\"{number}\" DecodingTime=\"{}\" RandomAccessPoint=\"{}\" PacketCount=\"{}\">",
        s.dts,
        u8::from(s.is_rap),
        s.packets.len()
    )?;
    for (i, p) in s.packets.iter().enumerate() {
        write!(
            t,
            "<RTPHintPacket PacketNumber=\"{}\" P=\"{}\" X=\"{}\" M=\"{}\" PayloadType=\"{}\"",
            i + 1,
            p.p_bit,
            p.x_bit,
            p.m_bit,
            p.payload_type
        )?;
        writeln!(
            t,
            " SequenceNumber=\"{}\" RepeatedPacket=\"{}\" DropablePacket=\"{}\" RelativeTransmissionTime=\"{}\" FullPacketSize=\"{}\">",
            p.sequence_number,
            p.r_bit,
            p.b_bit,
            p.relative_trans_time,
            p.rtp_length()
        )?;
        if !p.tlv.is_empty() {
            writeln!(t, "<PrivateExtensionTable EntryCount=\"{}\">", p.tlv.len())?;
            t.children(&p.tlv)?;
            writeln!(t, "</PrivateExtensionTable>")?;
        }
        if !p.data_table.is_empty() {
            writeln!(t, "<PacketDataTable EntryCount=\"{}\">", p.data_table.len())?;
            for dte in &p.data_table {
                match dte {
                    D::Empty => writeln!(t, "<EmptyDataEntry/>")?,
                    D::Immediate { data } => {
                        writeln!(t, "<ImmediateDataEntry DataSize=\"{}\"/>", data.len())?
                    }
                    D::Sample { data_length, byte_offset, sample_number, track_ref_index } => {
                        writeln!(
                            t,
                            "<SampleDataEntry DataSize=\"{data_length}\" SampleOffset=\"{byte_offset}\" SampleNumber=\"{sample_number}\" TrackReference=\"{track_ref_index}\"/>"
                        )?
                    }
                    D::StreamDescription { data_length, byte_offset, stream_desc_index, track_ref_index } => {
                        writeln!(
                            t,
                            "<SampleDescriptionEntry DataSize=\"{data_length}\" DescriptionOffset=\"{byte_offset}\" StreamDescriptionindex=\"{stream_desc_index}\" TrackReference=\"{track_ref_index}\"/>"
                        )?
                    }
                    D::Unknown { .. } => writeln!(t, "<UnknownTableEntry/>")?,
                }
            }
            writeln!(t, "</PacketDataTable>")?;
        }
        writeln!(t, "</RTPHintPacket>")?;
    }
    writeln!(t, "</RTPHintSample>")?;
    Ok(())
}

