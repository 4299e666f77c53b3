//! Sample table payloads (stbl and its tables, sample groups, aux info).

use super::{FourCC, IsoBox};

type Child = Option<Box<IsoBox>>;

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SampleTable {
    pub stsd: Child,
    pub stts: Child,
    pub ctts: Child,
    pub cslg: Child,
    pub stss: Child,
    pub stsh: Child,
    pub stsc: Child,
    /// stsz or stz2
    pub stsz: Child,
    /// stco or co64
    pub stco: Child,
    pub stdp: Child,
    pub sdtp: Child,
    pub padb: Child,
    pub stsf: Child,
    pub subs: Vec<IsoBox>,
    pub sgpd: Vec<IsoBox>,
    pub sbgp: Vec<IsoBox>,
    pub saiz: Vec<IsoBox>,
    pub saio: Vec<IsoBox>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimeToSample {
    pub entries: Vec<TimeToSampleEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimeToSampleEntry {
    pub sample_count: u32,
    pub sample_delta: u32,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositionOffset {
    pub entries: Vec<CompositionOffsetEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositionOffsetEntry {
    pub sample_count: u32,
    /// Negative offsets only occur in version 1 boxes.
    pub decoding_offset: i32,
}

/// cslg
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositionToDecode {
    pub composition_to_dts_shift: i64,
    pub least_decode_to_display_delta: i64,
    pub greatest_decode_to_display_delta: i64,
    pub composition_start_time: i64,
    pub composition_end_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShadowSync {
    pub entries: Vec<ShadowSyncEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShadowSyncEntry {
    pub shadowed_sample_number: u32,
    pub sync_sample_number: u32,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SampleToChunk {
    pub entries: Vec<SampleToChunkEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SampleToChunkEntry {
    pub first_chunk: u32,
    pub samples_per_chunk: u32,
    pub sample_description_index: u32,
}

/// stsz / stz2. For stz2 `sample_size` carries the field size in bits.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SampleSize {
    pub sample_size: u32,
    pub sample_count: u32,
    /// Per-sample sizes; `None` when the table was not present.
    pub sizes: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ChunkOffset {
    pub offsets: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ChunkLargeOffset {
    pub offsets: Option<Vec<u64>>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SyncSample {
    pub sample_numbers: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DegradationPriority {
    pub priorities: Option<Vec<u16>>,
}

/// sdtp; one packed byte per sample.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SampleDependencyType {
    pub sample_info: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PaddingBits {
    pub padbits: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SampleFragment {
    pub entries: Vec<SampleFragmentEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SampleFragmentEntry {
    pub sample_number: u32,
    pub fragment_sizes: Vec<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SubSampleInformation {
    pub samples: Vec<SubSampleInfoEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SubSampleInfoEntry {
    pub sample_delta: u32,
    pub subsamples: Vec<SubSampleEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SubSampleEntry {
    pub size: u32,
    pub priority: u8,
    pub discardable: u8,
    pub reserved: u32,
}

/// sbgp
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SampleGroup {
    pub grouping_type: FourCC,
    pub grouping_type_parameter: u32,
    pub entries: Vec<SampleGroupEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SampleGroupEntry {
    pub sample_count: u32,
    pub group_description_index: u32,
}

/// sgpd; `grouping_type` selects how entries are described.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SampleGroupDescription {
    pub grouping_type: FourCC,
    pub default_length: u32,
    pub default_description_index: u32,
    pub entries: Vec<GroupDescriptionEntry>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum GroupDescriptionEntry {
    RollRecovery { roll_distance: i16 },
    VisualRandomAccess { num_leading_samples_known: bool, num_leading_samples: u8 },
    CencEncryption(CencGroupEntry),
    OperatingPoints(OperatingPointsInformation),
    LayerInformation(LayerInformation),
    /// Opaque entry; `trif` and `nalm` payloads are decoded at render time.
    Default { data: Vec<u8> },
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CencGroupEntry {
    pub is_protected: u8,
    pub per_sample_iv_size: u8,
    pub kid: [u8; 16],
    pub constant_iv_size: u8,
    pub constant_iv: [u8; 16],
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OperatingPointsInformation {
    pub scalability_mask: u16,
    pub profile_tier_levels: Vec<ProfileTierLevel>,
    pub operating_points: Vec<OperatingPoint>,
    pub dependency_layers: Vec<DependentLayer>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProfileTierLevel {
    pub general_profile_space: u8,
    pub general_tier_flag: u8,
    pub general_profile_idc: u8,
    pub general_profile_compatibility_flags: u32,
    pub general_constraint_indicator_flags: u64,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OperatingPoint {
    pub output_layer_set_idx: u16,
    pub max_temporal_id: u8,
    pub layer_count: u8,
    pub min_pic_width: u16,
    pub min_pic_height: u16,
    pub max_pic_width: u16,
    pub max_pic_height: u16,
    pub max_chroma_format: u8,
    pub max_bit_depth: u8,
    pub frame_rate_info_flag: bool,
    pub bit_rate_info_flag: bool,
    pub avg_frame_rate: u16,
    pub constant_frame_rate: u8,
    pub max_bit_rate: u32,
    pub avg_bit_rate: u32,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DependentLayer {
    pub dependent_layer_id: u8,
    pub dependent_on_layer_ids: Vec<u8>,
    pub dimension_identifier: [u8; 16],
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayerInformation {
    pub layers: Vec<LayerInfoItem>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayerInfoItem {
    pub layer_id: u8,
    pub min_temporal_id: u8,
    pub max_temporal_id: u8,
    pub sub_layer_presence_flags: u8,
}

/// saiz
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SampleAuxInfoSizes {
    pub aux_info_type: FourCC,
    pub aux_info_type_parameter: u32,
    pub default_sample_info_size: u8,
    pub sample_count: u32,
    pub sample_info_sizes: Vec<u8>,
}

/// saio; version 0 offsets are 32 bit on disk.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SampleAuxInfoOffsets {
    pub aux_info_type: FourCC,
    pub aux_info_type_parameter: u32,
    pub offsets: Vec<u64>,
}
