//! Movie structure payloads: moov/trak/mdia/minf and their headers.

use super::{FourCC, IsoBox};

type Child = Option<Box<IsoBox>>;

/// free / skip
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FreeSpace {
    pub data_size: u32,
}

/// mdat; the payload itself is never kept in the tree.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MediaData {
    pub data_size: u64,
}

/// A box the parser did not recognise. `original_type` is the on-disk code.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UnknownBox {
    pub original_type: FourCC,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Movie {
    pub iods: Child,
    pub meta: Child,
    pub mvhd: Child,
    pub mvex: Child,
    pub tracks: Vec<IsoBox>,
    pub udta: Child,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MovieHeader {
    pub creation_time: u64,
    pub modification_time: u64,
    pub timescale: u32,
    pub duration: u64,
    pub next_track_id: u32,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MediaHeader {
    pub creation_time: u64,
    pub modification_time: u64,
    pub timescale: u32,
    pub duration: u64,
    /// ISO-639-2/T code, three letters.
    pub language: String,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HintMediaHeader {
    pub max_pdu_size: u16,
    pub avg_pdu_size: u16,
    pub max_bitrate: u32,
    pub avg_bitrate: u32,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Track {
    pub tkhd: Child,
    pub tref: Child,
    pub meta: Child,
    pub edts: Child,
    pub mdia: Child,
    pub trgr: Child,
    pub udta: Child,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrackHeader {
    pub creation_time: u64,
    pub modification_time: u64,
    pub track_id: u32,
    pub duration: u64,
    pub layer: i16,
    pub alternate_group: i16,
    /// 8.8 fixed point.
    pub volume: u16,
    pub matrix: [i32; 9],
    /// 16.16 fixed point.
    pub width: u32,
    /// 16.16 fixed point.
    pub height: u32,
}

/// One reference kind inside `tref` (internal code `REFT`).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrackReferenceType {
    pub reference_type: FourCC,
    pub track_ids: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Media {
    pub mdhd: Child,
    pub hdlr: Child,
    pub minf: Child,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MediaInformation {
    /// vmhd, smhd, hmhd, nmhd or one of the MPEG-4 system headers.
    pub header: Child,
    pub dinf: Child,
    pub stbl: Child,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DataInformation {
    pub dref: Child,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DataEntryUrl {
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DataEntryUrn {
    pub name: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Handler {
    pub handler_type: FourCC,
    pub name: Option<String>,
    pub reserved1: u32,
    pub reserved2: [u8; 12],
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Edit {
    pub elst: Child,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditList {
    pub entries: Vec<EditListEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditListEntry {
    pub segment_duration: u64,
    pub media_time: i64,
    pub media_rate: u32,
}

/// udta; records of every user data type in file order.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UserData {
    pub records: Vec<IsoBox>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Copyright {
    pub language: String,
    pub notice: String,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Kind {
    pub scheme_uri: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExtendedLanguage {
    pub extended_language: String,
}

/// Nero chapter list; start times are in 100ns units.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ChapterList {
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Chapter {
    pub name: Option<String>,
    pub start_time: u64,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProgressiveDownload {
    pub entries: Vec<DownloadRate>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DownloadRate {
    pub rate: u32,
    pub estimated_time: u32,
}

/// An MPEG-4 descriptor kept as tag plus encoded body.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Descriptor {
    pub tag: u8,
    pub data: Vec<u8>,
}

/// iods / esds
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DescriptorBox {
    pub descriptor: Option<Descriptor>,
}

/// ftyp / styp
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FileType {
    pub major_brand: FourCC,
    pub minor_version: u32,
    pub compatible_brands: Vec<FourCC>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrackGroup {
    pub groups: Vec<IsoBox>,
}

/// One track group kind inside `trgr` (internal code `TRGT`).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrackGroupType {
    pub group_type: FourCC,
    pub track_group_id: u32,
}
