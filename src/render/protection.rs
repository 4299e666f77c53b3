//! ISMACryp, Common Encryption, PIFF, OMA DRM and Adobe Access boxes.

use super::{container, open_full, opt_str};
use crate::boxes::{BoxBody, CencSampleAuxInfo, IsoBox};
use crate::dump::{Result, Trace, mismatch};
use crate::util::{data_uri, hex_prefixed, xml_escape};
use std::io::Write;

pub fn sinf(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ProtectionInfo);
    t.open("ProtectionInfoBox", b)?;
    writeln!(t, ">")?;
    // a placeholder lists none of its children
    if b.size > 0 {
        super::required(t, b, p.original_format.as_deref(), b"frma")?;
        super::required(t, b, p.scheme_type.as_deref(), b"schm")?;
        super::required(t, b, p.info.as_deref(), b"schi")?;
    }
    t.done(Some("ProtectionInfoBox"), Some(b))
}

pub fn frma(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, OriginalFormat);
    t.open("OriginalFormatBox", b)?;
    writeln!(t, "data_format=\"{}\">", p.data_format)?;
    t.done(Some("OriginalFormatBox"), Some(b))
}

pub fn schm(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, SchemeType);
    open_full(t, "SchemeTypeBox", b)?;
    write!(
        t,
        "scheme_type=\"{}\" scheme_version=\"{}\" ",
        p.scheme_type, p.scheme_version
    )?;
    if let Some(uri) = &p.uri {
        write!(t, "scheme_uri=\"{}\"", xml_escape(uri))?;
    }
    writeln!(t, ">")?;
    t.done(Some("SchemeTypeBox"), Some(b))
}

pub fn schi(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, SchemeInformation);
    t.open("SchemeInformationBox", b)?;
    writeln!(t, ">")?;
    for child in [&p.ikms, &p.isfm, &p.okms, &p.tenc, &p.adkm] {
        t.child_opt(child.as_deref())?;
    }
    t.done(Some("SchemeInformationBox"), Some(b))
}

pub fn ikms(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, IsmaKms);
    open_full(t, "KMSBox", b)?;
    writeln!(t, "kms_URI=\"{}\">", xml_escape(&p.uri))?;
    t.done(Some("KMSBox"), Some(b))
}

/// `iSFM`, and OMA `odaf` which shares the layout under another name.
pub fn isfm(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, IsmaSampleFormat);
    let name = if &b.typ.0 == b"iSFM" {
        "ISMASampleFormat"
    } else {
        "OMADRMAUFormatBox"
    };
    open_full(t, name, b)?;
    writeln!(
        t,
        "selective_encryption=\"{}\" key_indicator_length=\"{}\" IV_length=\"{}\">",
        p.selective_encryption, p.key_indicator_length, p.iv_length
    )?;
    t.done(Some(name), Some(b))
}

pub fn pssh(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ProtectionSystemHeader);
    open_full(t, "ProtectionSystemHeaderBox", b)?;
    writeln!(t, "SystemID=\"{}\">", hex_prefixed(&p.system_id))?;
    for kid in &p.kids {
        writeln!(t, " <PSSHKey KID=\"{}\"/>", hex_prefixed(kid))?;
    }
    if !p.private_data.is_empty() {
        writeln!(
            t,
            " <PSSHData size=\"{}\" value=\"{}\"/>",
            p.private_data.len(),
            hex_prefixed(&p.private_data)
        )?;
    }
    if b.size == 0 {
        writeln!(t, " <PSSHKey KID=\"\"/>")?;
        writeln!(t, " <PSSHData size=\"\" value=\"\"/>")?;
    }
    t.done(Some("ProtectionSystemHeaderBox"), Some(b))
}

pub fn tenc(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, TrackEncryption);
    open_full(t, "TrackEncryptionBox", b)?;
    write!(t, "isEncrypted=\"{}\"", p.is_protected)?;
    if p.per_sample_iv_size != 0 {
        write!(t, " IV_size=\"{}\"", p.per_sample_iv_size)?;
    } else {
        let len = usize::from(p.constant_iv_size).min(p.constant_iv.len());
        write!(
            t,
            " constant_IV_size=\"{}\" constant_IV=\"{}\"",
            p.constant_iv_size,
            hex_prefixed(&p.constant_iv[..len])
        )?;
    }
    write!(t, " KID=\"{}\"", hex_prefixed(&p.kid))?;
    if b.version > 0 {
        write!(
            t,
            " crypt_byte_block=\"{}\" skip_byte_block=\"{}\"",
            p.crypt_byte_block, p.skip_byte_block
        )?;
    }
    writeln!(t, ">")?;
    t.done(Some("TrackEncryptionBox"), Some(b))
}

fn piff_tenc(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, PiffTrackEncryption);
    open_full(t, "PIFFTrackEncryptionBox", b)?;
    writeln!(
        t,
        "AlgorithmID=\"{}\" IV_size=\"{}\" KID=\"{}\">",
        p.algorithm_id,
        p.iv_size,
        hex_prefixed(&p.kid)
    )?;
    t.done(Some("PIFFTrackEncryptionBox"), Some(b))
}

fn piff_pssh(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, PiffProtectionSystemHeader);
    open_full(t, "PIFFProtectionSystemHeaderBox", b)?;
    writeln!(
        t,
        "SystemID=\"{}\" PrivateData=\"{}\">",
        hex_prefixed(&p.system_id),
        hex_prefixed(&p.private_data)
    )?;
    t.done(Some("PIFFProtectionSystemHeaderBox"), Some(b))
}

/// Subsample lines of one encrypted sample.
fn subsamples(t: &mut Trace<'_>, element: &str, s: &CencSampleAuxInfo) -> Result<()> {
    for sub in &s.subsamples {
        writeln!(
            t,
            "<{element} NumClearBytes=\"{}\" NumEncryptedBytes=\"{}\"/>",
            sub.bytes_clear_data, sub.bytes_encrypted_data
        )?;
    }
    Ok(())
}

fn piff_psec(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, PiffSampleEncryption);
    t.open("PIFFSampleEncryptionBox", b)?;
    write!(t, "sampleCount=\"{}\"", p.samples.len())?;
    if b.flags & 1 != 0 {
        write!(
            t,
            " AlgorithmID=\"{}\" IV_size=\"{}\" KID=\"{}\"",
            p.algorithm_id,
            p.iv_size,
            data_uri(&p.kid)
        )?;
    }
    writeln!(t, ">")?;
    // entries without an IV carry nothing worth listing
    for s in p.samples.iter().filter(|s| s.iv.iter().any(|&x| x != 0)) {
        write!(t, "<PIFFSampleEncryptionEntry IV=\"{}\"", hex_prefixed(&s.iv))?;
        if b.flags & 0x2 != 0 {
            writeln!(t, " SubsampleCount=\"{}\">", s.subsamples.len())?;
            subsamples(t, "PIFFSubSampleEncryptionEntry", s)?;
        } else {
            writeln!(t, ">")?;
        }
        writeln!(t, "</PIFFSampleEncryptionEntry>")?;
    }
    if b.size == 0 {
        writeln!(t, "<PIFFSampleEncryptionEntry IV=\"\" SubsampleCount=\"\">")?;
        writeln!(t, "<PIFFSubSampleEncryptionEntry NumClearBytes=\"\" NumEncryptedBytes=\"\"/>")?;
        writeln!(t, "</PIFFSampleEncryptionEntry>")?;
    }
    t.done(Some("PIFFSampleEncryptionBox"), Some(b))
}

pub fn senc(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, SampleEncryption);
    t.open("SampleEncryptionBox", b)?;
    writeln!(t, "sampleCount=\"{}\">", p.samples.len())?;
    writeln!(t, "<FullBoxInfo Version=\"{}\" Flags=\"0x{:X}\"/>", b.version, b.flags)?;
    for (i, s) in p.samples.iter().enumerate() {
        write!(
            t,
            "<SampleEncryptionEntry sampleCount=\"{}\" IV=\"{}\"",
            i + 1,
            hex_prefixed(&s.iv)
        )?;
        if b.flags & 0x2 != 0 {
            writeln!(t, " SubsampleCount=\"{}\">", s.subsamples.len())?;
            subsamples(t, "SubSampleEncryptionEntry", s)?;
        } else {
            writeln!(t, ">")?;
        }
        writeln!(t, "</SampleEncryptionEntry>")?;
    }
    if b.size == 0 {
        writeln!(t, "<SampleEncryptionEntry sampleCount=\"\" IV=\"\" SubsampleCount=\"\">")?;
        writeln!(t, "<SubSampleEncryptionEntry NumClearBytes=\"\" NumEncryptedBytes=\"\"/>")?;
        writeln!(t, "</SampleEncryptionEntry>")?;
    }
    t.done(Some("SampleEncryptionBox"), Some(b))
}

/// `uuid` boxes: the recognised extensions carry their own payload,
/// anything else renders as an unknown uuid.
pub fn uuid_ex(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    match &b.body {
        BoxBody::PiffTrackEncryption(_) => piff_tenc(b, t),
        BoxBody::PiffSampleEncryption(_) => piff_psec(b, t),
        BoxBody::PiffProtectionSystemHeader(_) => piff_pssh(b, t),
        BoxBody::MssTimeExtension(_) => super::fragment::tfxd(b, t),
        BoxBody::UnknownUuid(_) | BoxBody::Empty => super::movie::unknown_uuid(b, t),
        _ => Err(mismatch(b)),
    }
}

/// NUL separated `name:value` pairs joined with spaces.
fn textual_headers(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(&[0]).unwrap_or(raw);
    raw.split(|&c| c == 0)
        .map(String::from_utf8_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn ohdr(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, OmaCommonHeaders);
    open_full(t, "OMADRMCommonHeaderBox", b)?;
    write!(
        t,
        "EncryptionMethod=\"{}\" PaddingScheme=\"{}\" PlaintextLength=\"{}\" ",
        p.encryption_method, p.padding_scheme, p.plaintext_length
    )?;
    if let Some(url) = &p.rights_issuer_url {
        write!(t, "RightsIssuerURL=\"{}\" ", xml_escape(url))?;
    }
    if let Some(id) = &p.content_id {
        write!(t, "ContentID=\"{}\" ", xml_escape(id))?;
    }
    if let Some(raw) = &p.textual_headers {
        write!(t, "TextualHeaders=\"{}\" ", xml_escape(&textual_headers(raw)))?;
    }
    writeln!(t, ">")?;
    t.children(&p.extensions)?;
    t.done(Some("OMADRMCommonHeaderBox"), Some(b))
}

pub fn grpi(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, OmaGroupId);
    open_full(t, "OMADRMGroupIDBox", b)?;
    write!(
        t,
        "GroupID=\"{}\" EncryptionMethod=\"{}\" GroupKey=\"",
        xml_escape(&p.group_id),
        p.gk_encryption_method
    )?;
    if !p.group_key.is_empty() {
        write!(t, "{}", data_uri(&p.group_key))?;
    }
    writeln!(t, "\">")?;
    t.done(Some("OMADRMGroupIDBox"), Some(b))
}

pub fn mdri(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    container(t, "OMADRMMutableInformationBox", b)
}

pub fn odtt(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, OmaTransactionTracking);
    open_full(t, "OMADRMTransactionTrackingBox", b)?;
    writeln!(t, "TransactionID=\"{}\">", data_uri(&p.transaction_id))?;
    t.done(Some("OMADRMTransactionTrackingBox"), Some(b))
}

pub fn odrb(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, OmaRightsObject);
    open_full(t, "OMADRMRightsObjectBox", b)?;
    writeln!(t, "OMARightsObject=\"{}\">", data_uri(&p.oma_ro))?;
    t.done(Some("OMADRMRightsObjectBox"), Some(b))
}

pub fn odkm(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, OmaKeyManagement);
    open_full(t, "OMADRMKMSBox", b)?;
    writeln!(t, ">")?;
    t.child_opt(p.hdr.as_deref())?;
    t.child_opt(p.fmt.as_deref())?;
    t.done(Some("OMADRMKMSBox"), Some(b))
}

pub fn adkm(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, AdobeKeyManagement);
    open_full(t, "AdobeDRMKeyManagementSystemBox", b)?;
    writeln!(t, ">")?;
    t.child_opt(p.header.as_deref())?;
    t.child_opt(p.au_format.as_deref())?;
    t.done(Some("AdobeDRMKeyManagementSystemBox"), Some(b))
}

pub fn ahdr(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, AdobeDrmHeader);
    open_full(t, "AdobeDRMHeaderBox", b)?;
    writeln!(t, ">")?;
    t.child_opt(p.std_enc_params.as_deref())?;
    t.done(Some("AdobeDRMHeaderBox"), Some(b))
}

pub fn aprm(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, AdobeStdEncParams);
    open_full(t, "AdobeStdEncryptionParamsBox", b)?;
    writeln!(t, ">")?;
    t.child_opt(p.enc_info.as_deref())?;
    t.child_opt(p.key_info.as_deref())?;
    t.done(Some("AdobeStdEncryptionParamsBox"), Some(b))
}

pub fn aeib(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, AdobeEncryptionInfo);
    open_full(t, "AdobeEncryptionInfoBox", b)?;
    writeln!(
        t,
        "EncryptionAlgorithm=\"{}\" KeyLength=\"{}\">",
        xml_escape(opt_str(&p.enc_algo)),
        p.key_length
    )?;
    t.done(Some("AdobeEncryptionInfoBox"), Some(b))
}

pub fn akey(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, AdobeKeyInfo);
    open_full(t, "AdobeKeyInfoBox", b)?;
    writeln!(t, ">")?;
    t.child_opt(p.params.as_deref())?;
    t.done(Some("AdobeKeyInfoBox"), Some(b))
}

pub fn flxs(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, AdobeFlashAccessParams);
    t.open("AdobeFlashAccessParamsBox", b)?;
    writeln!(t, ">")?;
    if let Some(meta) = &p.metadata {
        writeln!(t, "<FmrmsV2Metadata value=\"{}\"/>", xml_escape(meta))?;
    }
    t.done(Some("AdobeFlashAccessParamsBox"), Some(b))
}

pub fn adaf(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, AdobeDrmAuFormat);
    open_full(t, "AdobeDRMAUFormatBox", b)?;
    writeln!(
        t,
        "SelectiveEncryption=\"{}\" IV_length=\"{}\">",
        u8::from(p.selective_enc),
        p.iv_length
    )?;
    t.done(Some("AdobeDRMAUFormatBox"), Some(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textual_headers_are_space_joined() {
        assert_eq!(
            textual_headers(b"Silent:on-demand\0Preview:instant\0"),
            "Silent:on-demand Preview:instant"
        );
        assert_eq!(textual_headers(b""), "");
    }
}
