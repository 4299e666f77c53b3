//! RTP hint track payloads and the decoded hint sample layout.

use super::{FourCC, IsoBox};

/// Generic hint sample entry (`rtp `).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HintSampleEntry {
    pub data_reference_index: u16,
    pub hint_track_version: u16,
    pub last_compatible_version: u16,
    pub max_packet_size: u32,
    pub hint_data_table: Vec<IsoBox>,
}

/// `rtp ` inside `hnti`: the session level SDP.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RtpInfo {
    pub sub_type: FourCC,
    pub sdp_text: Option<String>,
}

/// `sdp ` inside `hnti`: the track level SDP.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Sdp {
    pub sdp_text: Option<String>,
}

/// Single valued hint statistics (`totl`, `tims`, `rtpo`, ...). 64-bit
/// counters and signed offsets both fit.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HintCounter {
    pub value: i64,
}

/// maxr
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MaxDataRate {
    pub granularity: u32,
    pub max_data_rate: u32,
}

/// payt
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PayloadType {
    pub payload_code: u32,
    pub payload_string: Option<String>,
}

/// name
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HintName {
    pub string: Option<String>,
}

/// rely
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RelyHint {
    pub prefered: u8,
    pub required: u8,
}

/// A decoded RTP hint sample.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HintSample {
    pub dts: u64,
    pub is_rap: bool,
    pub packets: Vec<RtpPacket>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RtpPacket {
    pub p_bit: u8,
    pub x_bit: u8,
    pub m_bit: u8,
    pub payload_type: u8,
    pub sequence_number: u16,
    pub r_bit: u8,
    pub b_bit: u8,
    pub relative_trans_time: i32,
    /// Extra information boxes (TLV table).
    pub tlv: Vec<IsoBox>,
    pub data_table: Vec<DataTableEntry>,
}

impl RtpPacket {
    /// Size of the RTP packet this entry expands to: the fixed 12 byte
    /// header plus every data table contribution.
    pub fn rtp_length(&self) -> u32 {
        12 + self.data_table.iter().map(DataTableEntry::data_length).sum::<u32>()
    }
}

/// Packet constructor. The source field of the on-disk record selects the
/// variant.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DataTableEntry {
    Empty,
    Immediate {
        data: Vec<u8>,
    },
    Sample {
        data_length: u16,
        byte_offset: u32,
        sample_number: u32,
        track_ref_index: i8,
    },
    StreamDescription {
        data_length: u16,
        byte_offset: u32,
        stream_desc_index: u32,
        track_ref_index: i8,
    },
    Unknown {
        source: u8,
    },
}

impl DataTableEntry {
    pub fn data_length(&self) -> u32 {
        match self {
            DataTableEntry::Immediate { data } => data.len() as u32,
            DataTableEntry::Sample { data_length, .. }
            | DataTableEntry::StreamDescription { data_length, .. } => u32::from(*data_length),
            DataTableEntry::Empty | DataTableEntry::Unknown { .. } => 0,
        }
    }
}
