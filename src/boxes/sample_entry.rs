//! Sample descriptions and decoder configuration payloads.

use super::{Descriptor, FourCC, IsoBox};

type Child = Option<Box<IsoBox>>;

/// mp4s / encs
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MpegSampleEntry {
    pub data_reference_index: u16,
    pub esd: Child,
    pub protections: Vec<IsoBox>,
}

/// Visual sample entries: mp4v, encv, the AVC/SVC/HEVC family and 3GPP s263.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VisualSampleEntry {
    pub data_reference_index: u16,
    pub width: u16,
    pub height: u16,
    pub horiz_res: u32,
    pub vert_res: u32,
    pub bit_depth: u16,
    pub compressor_name: String,
    pub esd: Child,
    pub avc_config: Child,
    pub svc_config: Child,
    pub hevc_config: Child,
    pub lhvc_config: Child,
    pub ipod_ext: Child,
    pub descr: Child,
    /// 3GPP decoder configuration (d263).
    pub info: Child,
    pub protections: Vec<IsoBox>,
    pub pasp: Child,
    pub rvcc: Child,
}

/// Audio sample entries: mp4a, enca, 3GPP speech codecs, AC-3 and E-AC-3.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AudioSampleEntry {
    pub data_reference_index: u16,
    pub samplerate: u16,
    pub channel_count: u16,
    pub bits_per_sample: u16,
    pub esd: Child,
    /// 3GPP configuration or dac3/dec3.
    pub info: Child,
    pub protections: Vec<IsoBox>,
    /// Set on `ac-3` entries carrying E-AC-3.
    pub is_ec3: bool,
}

/// gnrm: sample entry of an unsupported codec.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GenericSampleEntry {
    pub entry_type: FourCC,
    pub data_reference_index: u16,
    pub data: Vec<u8>,
}

/// gnrv
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GenericVisualSampleEntry {
    pub entry_type: FourCC,
    pub data_reference_index: u16,
    pub version: u16,
    pub revision: u16,
    pub vendor: u32,
    pub temporal_quality: u32,
    pub spatial_quality: u32,
    pub width: u16,
    pub height: u16,
    pub horiz_res: u32,
    pub vert_res: u32,
    pub compressor_name: String,
    pub bit_depth: u16,
}

/// gnra
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GenericAudioSampleEntry {
    pub entry_type: FourCC,
    pub data_reference_index: u16,
    pub version: u16,
    pub revision: u16,
    pub vendor: u32,
    pub channel_count: u16,
    pub bits_per_sample: u16,
    pub samplerate: u16,
}

/// 3GPP decoder configuration (damr, devc, dqcp, dsmv, d263). The codec is
/// implied by the box code.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GppConfig {
    pub vendor: FourCC,
    pub decoder_version: u8,
    pub frames_per_sample: u8,
    pub amr_mode_set: u16,
    pub amr_mode_change_period: u8,
    pub h263_profile: u8,
    pub h263_level: u8,
}

/// avcC / svcC
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AvcConfig {
    pub config: Option<AvcDecoderConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AvcDecoderConfig {
    pub configuration_version: u8,
    pub profile_indication: u8,
    pub profile_compatibility: u8,
    pub level_indication: u8,
    pub nal_unit_size: u8,
    pub complete_representation: u8,
    pub chroma_format: u8,
    pub luma_bit_depth: u8,
    pub chroma_bit_depth: u8,
    pub sequence_parameter_sets: Vec<Vec<u8>>,
    pub picture_parameter_sets: Vec<Vec<u8>>,
    pub sequence_parameter_set_extensions: Vec<Vec<u8>>,
}

/// hvcC / lhvC
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HevcConfig {
    pub config: Option<HevcDecoderConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HevcDecoderConfig {
    pub nal_unit_size: u8,
    pub configuration_version: u8,
    pub profile_space: u8,
    pub tier_flag: u8,
    pub profile_idc: u8,
    pub general_profile_compatibility_flags: u32,
    pub progressive_source_flag: u8,
    pub interlaced_source_flag: u8,
    pub non_packed_constraint_flag: u8,
    pub frame_only_constraint_flag: u8,
    pub constraint_indicator_flags: u64,
    pub level_idc: u8,
    pub min_spatial_segmentation_idc: u16,
    pub parallelism_type: u8,
    pub chroma_format: u8,
    pub luma_bit_depth: u8,
    pub chroma_bit_depth: u8,
    pub avg_frame_rate: u16,
    pub constant_frame_rate: u8,
    pub num_temporal_layers: u8,
    pub temporal_id_nested: u8,
    pub param_arrays: Vec<HevcParamArray>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HevcParamArray {
    pub nalu_type: u8,
    pub array_completeness: u8,
    pub nalus: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BitRate {
    pub buffer_size_db: u32,
    pub max_bitrate: u32,
    pub avg_bitrate: u32,
}

/// m4ds
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExtensionDescriptors {
    pub descriptors: Vec<Descriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PixelAspectRatio {
    pub h_spacing: u32,
    pub v_spacing: u32,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RvcConfig {
    pub predefined_rvc_config: u16,
    pub rvc_meta_idx: u16,
}

/// metx, mett, stxt, stpp and sbtt share this layout.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MetaDataSampleEntry {
    pub data_reference_index: u16,
    pub xml_namespace: Option<String>,
    pub xml_schema_loc: Option<String>,
    pub content_encoding: Option<String>,
    pub mime_type: Option<String>,
    /// stpp only.
    pub auxiliary_mime_types: Option<String>,
    /// txtC for the text flavours.
    pub config: Child,
    pub protections: Vec<IsoBox>,
}

/// txtC
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub config: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DimsSampleEntry {
    pub data_reference_index: u16,
    pub config: Child,
    pub scripts: Child,
    pub protections: Vec<IsoBox>,
}

/// dimC
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DimsSceneConfig {
    pub profile: u8,
    pub level: u8,
    pub path_components: u8,
    pub full_request_host: bool,
    pub stream_type: bool,
    pub contains_redundant: u8,
    pub text_encoding: String,
    pub content_encoding: String,
}

/// diST
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DimsScriptTypes {
    pub content_script_types: String,
}

/// dac3 / dec3
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Ac3Config {
    pub is_ec3: bool,
    /// E-AC-3 data rate; AC-3 bit rate code.
    pub brcode: u16,
    pub streams: Vec<Ac3Stream>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Ac3Stream {
    pub fscod: u8,
    pub bsid: u8,
    pub bsmod: u8,
    pub acmod: u8,
    pub lfon: u8,
    pub nb_dep_sub: u8,
    pub chan_loc: u16,
}

/// lsrC
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LaserConfig {
    pub header: Vec<u8>,
}

/// lsr1
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LaserSampleEntry {
    pub data_reference_index: u16,
    pub lsr_config: Child,
    pub descr: Child,
}

/// WebVTT string boxes (vttc, ctim, iden, sttg, payl, vtta).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StringBox {
    pub string: Option<String>,
}

/// wvtt
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WebVttSampleEntry {
    pub data_reference_index: u16,
    pub config: Child,
}
