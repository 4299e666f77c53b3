//! Content protection payloads: ISMACryp, Common Encryption, PIFF, OMA DRM
//! and Adobe Access.

use super::{FourCC, IsoBox};

type Child = Option<Box<IsoBox>>;

/// sinf
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProtectionInfo {
    pub original_format: Child,
    pub scheme_type: Child,
    pub info: Child,
}

/// frma
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OriginalFormat {
    pub data_format: FourCC,
}

/// schm; the URI is only present when flag bit 0 is set.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SchemeType {
    pub scheme_type: FourCC,
    pub scheme_version: u32,
    pub uri: Option<String>,
}

/// schi
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SchemeInformation {
    pub ikms: Child,
    pub isfm: Child,
    pub okms: Child,
    pub tenc: Child,
    pub adkm: Child,
}

/// iKMS
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct IsmaKms {
    pub uri: String,
}

/// iSFM, and OMA `odaf` which shares its layout.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct IsmaSampleFormat {
    pub selective_encryption: u8,
    pub key_indicator_length: u8,
    pub iv_length: u8,
}

/// pssh
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProtectionSystemHeader {
    pub system_id: [u8; 16],
    pub kids: Vec<[u8; 16]>,
    pub private_data: Vec<u8>,
}

/// tenc
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrackEncryption {
    pub is_protected: u8,
    pub per_sample_iv_size: u8,
    pub kid: [u8; 16],
    pub constant_iv_size: u8,
    pub constant_iv: [u8; 16],
    /// Pattern encryption, version 1 only.
    pub crypt_byte_block: u8,
    pub skip_byte_block: u8,
}

/// Per-sample auxiliary encryption data.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CencSampleAuxInfo {
    pub iv: [u8; 16],
    pub subsamples: Vec<CencSubsample>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CencSubsample {
    pub bytes_clear_data: u16,
    pub bytes_encrypted_data: u32,
}

/// senc; subsample tables are present when flag bit 1 is set.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SampleEncryption {
    pub samples: Vec<CencSampleAuxInfo>,
}

/// PIFF track encryption (uuid extension).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PiffTrackEncryption {
    pub algorithm_id: u32,
    pub iv_size: u8,
    pub kid: [u8; 16],
}

/// PIFF sample encryption (uuid extension). Algorithm fields are
/// meaningful when flag bit 0 is set.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PiffSampleEncryption {
    pub algorithm_id: u32,
    pub iv_size: u8,
    pub kid: [u8; 16],
    pub samples: Vec<CencSampleAuxInfo>,
}

/// PIFF protection system header (uuid extension).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PiffProtectionSystemHeader {
    pub system_id: [u8; 16],
    pub private_data: Vec<u8>,
}

/// ohdr
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OmaCommonHeaders {
    pub encryption_method: u8,
    pub padding_scheme: u8,
    pub plaintext_length: u64,
    pub rights_issuer_url: Option<String>,
    pub content_id: Option<String>,
    /// NUL separated `name:value` headers.
    pub textual_headers: Option<Vec<u8>>,
    pub extensions: Vec<IsoBox>,
}

/// grpi
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OmaGroupId {
    pub group_id: String,
    pub gk_encryption_method: u8,
    pub group_key: Vec<u8>,
}

/// odtt
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OmaTransactionTracking {
    pub transaction_id: [u8; 16],
}

/// odrb
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OmaRightsObject {
    pub oma_ro: Vec<u8>,
}

/// odkm
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OmaKeyManagement {
    pub hdr: Child,
    pub fmt: Child,
}

/// adkm
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AdobeKeyManagement {
    pub header: Child,
    pub au_format: Child,
}

/// ahdr
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AdobeDrmHeader {
    pub std_enc_params: Child,
}

/// adaf
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AdobeDrmAuFormat {
    pub selective_enc: bool,
    pub iv_length: u8,
}

/// aprm
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AdobeStdEncParams {
    pub enc_info: Child,
    pub key_info: Child,
}

/// aeib
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AdobeEncryptionInfo {
    pub enc_algo: Option<String>,
    pub key_length: u8,
}

/// akey
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AdobeKeyInfo {
    pub params: Child,
}

/// flxs
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AdobeFlashAccessParams {
    pub metadata: Option<String>,
}
