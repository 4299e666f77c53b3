//! Movie fragments, segment indexes and Adobe HDS bootstrap payloads.

use super::IsoBox;

type Child = Option<Box<IsoBox>>;

/// tfhd flag bits.
pub mod tfhd_flags {
    pub const BASE_OFFSET: u32 = 0x01;
    pub const SAMPLE_DESC: u32 = 0x02;
    pub const SAMPLE_DUR: u32 = 0x08;
    pub const SAMPLE_SIZE: u32 = 0x10;
    pub const SAMPLE_FLAGS: u32 = 0x20;
    pub const DUR_EMPTY: u32 = 0x10000;
    pub const MOOF_BASE_OFFSET: u32 = 0x20000;
}

/// trun flag bits.
pub mod trun_flags {
    pub const DATA_OFFSET: u32 = 0x01;
    pub const FIRST_FLAG: u32 = 0x04;
    pub const DURATION: u32 = 0x100;
    pub const SIZE: u32 = 0x200;
    pub const FLAGS: u32 = 0x400;
    pub const CTS_OFFSET: u32 = 0x800;
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MovieExtends {
    pub mehd: Child,
    pub trex: Vec<IsoBox>,
    pub trep: Vec<IsoBox>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MovieExtendsHeader {
    pub fragment_duration: u64,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrackExtends {
    pub track_id: u32,
    pub def_sample_desc_index: u32,
    pub def_sample_duration: u32,
    pub def_sample_size: u32,
    pub def_sample_flags: u32,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrackExtensionProperties {
    pub track_id: u32,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MovieFragment {
    pub mfhd: Child,
    pub trafs: Vec<IsoBox>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MovieFragmentHeader {
    pub sequence_number: u32,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrackFragment {
    pub tfhd: Child,
    pub sdtp: Child,
    pub tfdt: Child,
    pub subs: Vec<IsoBox>,
    pub sgpd: Vec<IsoBox>,
    pub sbgp: Vec<IsoBox>,
    pub truns: Vec<IsoBox>,
    pub saiz: Vec<IsoBox>,
    pub saio: Vec<IsoBox>,
    pub piff_sample_encryption: Child,
    pub sample_encryption: Child,
}

/// tfhd; optional fields are present according to the box flags.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrackFragmentHeader {
    pub track_id: u32,
    pub base_data_offset: u64,
    pub sample_desc_index: u32,
    pub def_sample_duration: u32,
    pub def_sample_size: u32,
    pub def_sample_flags: u32,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrackFragmentDecodeTime {
    pub base_media_decode_time: u64,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrackRun {
    pub sample_count: u32,
    pub data_offset: i32,
    pub first_sample_flags: u32,
    pub entries: Vec<TrackRunEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrackRunEntry {
    pub duration: u32,
    pub size: u32,
    pub flags: u32,
    pub cts_offset: i32,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MovieFragmentRandomAccess {
    pub tfra: Vec<IsoBox>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrackFragmentRandomAccess {
    pub track_id: u32,
    pub entries: Vec<RandomAccessEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RandomAccessEntry {
    pub time: u64,
    pub moof_offset: u64,
    pub traf_number: u32,
    pub trun_number: u32,
    pub sample_number: u32,
}

/// sidx
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SegmentIndex {
    pub reference_id: u32,
    pub timescale: u32,
    pub earliest_presentation_time: u64,
    pub first_offset: u64,
    pub refs: Vec<SegmentReference>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SegmentReference {
    pub reference_type: u8,
    pub reference_size: u32,
    pub subsegment_duration: u32,
    pub starts_with_sap: u8,
    pub sap_type: u8,
    pub sap_delta_time: u32,
}

/// ssix
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SubsegmentIndex {
    pub subsegments: Vec<Subsegment>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Subsegment {
    pub ranges: Vec<SubsegmentRange>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SubsegmentRange {
    pub level: u8,
    pub range_size: u32,
}

/// leva
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LevelAssignment {
    pub levels: Vec<LevelInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LevelInfo {
    pub track_id: u32,
    pub padding_flag: u8,
    pub assignment_type: u8,
    pub grouping_type: u32,
    pub grouping_type_parameter: u32,
    pub sub_track_id: u32,
}

/// pcrb
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PcrInfo {
    pub pcr_values: Vec<u64>,
}

/// prft
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProducerReferenceTime {
    pub ref_track_id: u32,
    /// 64-bit NTP timestamp (seconds since 1900 in the high word).
    pub ntp: u64,
    pub timestamp: u64,
}

/// Smooth Streaming `tfxd` (uuid extension).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MssTimeExtension {
    pub absolute_time: u64,
    pub fragment_duration: u64,
}

/// abst
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AdobeBootstrapInfo {
    pub bootstrapinfo_version: u32,
    pub profile: u8,
    pub live: u8,
    pub update: u8,
    pub time_scale: u32,
    pub current_media_time: u64,
    pub smpte_time_code_offset: u64,
    pub movie_identifier: Option<String>,
    pub server_entries: Vec<String>,
    pub quality_entries: Vec<String>,
    pub drm_data: Option<String>,
    pub meta_data: Option<String>,
    pub segment_run_tables: Vec<IsoBox>,
    pub fragment_run_tables: Vec<IsoBox>,
}

/// afra
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AdobeFragmentRandomAccess {
    pub long_ids: bool,
    pub long_offsets: bool,
    pub time_scale: u32,
    pub local_entries: Vec<AfraEntry>,
    pub global_entries: Vec<GlobalAfraEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AfraEntry {
    pub time: u64,
    pub offset: u64,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GlobalAfraEntry {
    pub time: u64,
    pub segment: u32,
    pub fragment: u32,
    pub afra_offset: u64,
    pub offset_from_afra: u64,
}

/// asrt
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AdobeSegmentRunTable {
    pub quality_segment_url_modifiers: Vec<String>,
    pub entries: Vec<SegmentRunEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SegmentRunEntry {
    pub first_segment: u32,
    pub fragments_per_segment: u32,
}

/// afrt
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AdobeFragmentRunTable {
    pub timescale: u32,
    pub quality_segment_url_modifiers: Vec<String>,
    pub entries: Vec<FragmentRunEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FragmentRunEntry {
    pub first_fragment: u32,
    pub first_fragment_timestamp: u64,
    pub fragment_duration: u32,
    pub discontinuity_indicator: u8,
}
