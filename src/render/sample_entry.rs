//! Sample descriptions and decoder configuration records.

use super::{container, opt_str, required};
use crate::boxes::{Ac3Stream, FourCC, IsoBox, VisualSampleEntry};
use crate::dump::{Result, Trace};
use crate::render::movie::descriptor;
use crate::util::{cdata, data_uri, hex_prefixed, xml_escape};
use std::io::Write;

const MISSING_ESD: &str =
    "<!--INVALID MP4 FILE: ESDBox not present in MPEG Sample Description or corrupted-->";
const MISSING_3GPP_CONFIG: &str = "<!-- INVALID 3GPP FILE: Config not present in Sample Description-->";

/// AVC profiles whose configuration record carries the range extension
/// fields.
const AVC_REXT_PROFILES: &[u8] = &[100, 110, 122, 244, 44, 83, 86, 118, 128, 138, 139, 134, 135];

pub fn chroma_format_name(format: u8) -> &'static str {
    match format {
        0 => "YUV 4:0:0",
        1 => "YUV 4:2:0",
        2 => "YUV 4:2:2",
        3 => "YUV 4:4:4",
        _ => "Unknown",
    }
}

fn visual_attributes(t: &mut Trace<'_>, p: &VisualSampleEntry) -> Result<()> {
    write!(
        t,
        " DataReferenceIndex=\"{}\" Width=\"{}\" Height=\"{}\"",
        p.data_reference_index, p.width, p.height
    )?;
    write!(
        t,
        " XDPI=\"{}\" YDPI=\"{}\" BitDepth=\"{}\"",
        p.horiz_res, p.vert_res, p.bit_depth
    )?;
    if !p.compressor_name.is_empty() {
        writeln!(t, " CompressorName=\"{}\"", xml_escape(&p.compressor_name))?;
    }
    Ok(())
}

fn audio_attributes(t: &mut Trace<'_>, p: &crate::boxes::AudioSampleEntry) -> Result<()> {
    write!(
        t,
        " DataReferenceIndex=\"{}\" SampleRate=\"{}\"",
        p.data_reference_index, p.samplerate
    )?;
    write!(t, " Channels=\"{}\" BitsPerSample=\"{}\"", p.channel_count, p.bits_per_sample)?;
    Ok(())
}

/// mp4s / encs
pub fn mp4s(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, MpegSampleEntry);
    t.open("MPEGSystemsSampleDescriptionBox", b)?;
    writeln!(t, "DataReferenceIndex=\"{}\">", p.data_reference_index)?;
    match p.esd.as_deref() {
        Some(esd) => t.child(Some(esd))?,
        None if b.size > 0 => writeln!(t, "{MISSING_ESD}")?,
        None => {}
    }
    t.children(&p.protections)?;
    t.done(Some("MPEGSystemsSampleDescriptionBox"), Some(b))
}

/// mp4v, encv and the AVC/SVC/HEVC visual entries.
pub fn mp4v(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, VisualSampleEntry);
    let name = if p.avc_config.is_some() {
        "AVCSampleEntryBox"
    } else {
        "MPEGVisualSampleDescriptionBox"
    };
    t.open(name, b)?;
    visual_attributes(t, p)?;
    writeln!(t, ">")?;
    if let Some(esd) = p.esd.as_deref() {
        t.child(Some(esd))?;
    } else {
        for cfg in [&p.hevc_config, &p.avc_config, &p.ipod_ext, &p.descr, &p.svc_config, &p.lhvc_config] {
            t.child_opt(cfg.as_deref())?;
        }
    }
    t.children(&p.protections)?;
    t.child_opt(p.pasp.as_deref())?;
    t.child_opt(p.rvcc.as_deref())?;
    t.done(Some(name), Some(b))
}

/// mp4a / enca
pub fn mp4a(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, AudioSampleEntry);
    t.open("MPEGAudioSampleDescriptionBox", b)?;
    audio_attributes(t, p)?;
    writeln!(t, ">")?;
    match p.esd.as_deref() {
        Some(esd) => t.child(Some(esd))?,
        None if b.size > 0 => writeln!(t, "{MISSING_ESD}")?,
        None => {}
    }
    t.children(&p.protections)?;
    t.done(Some("MPEGAudioSampleDescriptionBox"), Some(b))
}

pub fn gnrm(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, GenericSampleEntry);
    t.open("SampleDescriptionBox", b)?;
    writeln!(
        t,
        "DataReferenceIndex=\"{}\" ExtensionDataSize=\"{}\">",
        p.data_reference_index,
        p.data.len()
    )?;
    t.done(Some("SampleDescriptionBox"), Some(b))
}

pub fn gnrv(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, GenericVisualSampleEntry);
    t.open("VisualSampleDescriptionBox", b)?;
    write!(
        t,
        "DataReferenceIndex=\"{}\" Version=\"{}\" Revision=\"{}\" Vendor=\"{}\" TemporalQuality=\"{}\" SpacialQuality=\"{}\"",
        p.data_reference_index, p.version, p.revision, p.vendor, p.temporal_quality, p.spatial_quality
    )?;
    writeln!(
        t,
        " Width=\"{}\" Height=\"{}\" HorizontalResolution=\"{}\" VerticalResolution=\"{}\" CompressorName=\"{}\" BitDepth=\"{}\">",
        p.width,
        p.height,
        p.horiz_res,
        p.vert_res,
        xml_escape(&p.compressor_name),
        p.bit_depth
    )?;
    t.done(Some("VisualSampleDescriptionBox"), Some(b))
}

pub fn gnra(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, GenericAudioSampleEntry);
    t.open("AudioSampleDescriptionBox", b)?;
    writeln!(
        t,
        "DataReferenceIndex=\"{}\" Version=\"{}\" Revision=\"{}\" Vendor=\"{}\" ChannelCount=\"{}\" BitsPerSample=\"{}\" Samplerate=\"{}\">",
        p.data_reference_index,
        p.version,
        p.revision,
        p.vendor,
        p.channel_count,
        p.bits_per_sample,
        p.samplerate
    )?;
    t.done(Some("AudioSampleDescriptionBox"), Some(b))
}

/// 3GPP speech entries: samr, sawb, sevc, sqcp, ssmv.
pub fn gppa(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, AudioSampleEntry);
    let name = match &b.typ.0 {
        b"samr" => "AMRSampleDescriptionBox",
        b"sawb" => "AMR_WB_SampleDescriptionBox",
        b"sevc" => "EVRCSampleDescriptionBox",
        b"sqcp" => "QCELPSampleDescriptionBox",
        b"ssmv" => "SMVSampleDescriptionBox",
        _ => "3GPAudioSampleDescriptionBox",
    };
    t.open(name, b)?;
    audio_attributes(t, p)?;
    writeln!(t, ">")?;
    match p.info.as_deref() {
        Some(info) => t.child(Some(info))?,
        None if b.size > 0 => writeln!(t, "{MISSING_3GPP_CONFIG}")?,
        None => {}
    }
    t.done(Some(name), Some(b))
}

/// s263
pub fn gppv(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, VisualSampleEntry);
    let name = if b.typ.0 == *b"s263" {
        "H263SampleDescriptionBox"
    } else {
        "3GPVisualSampleDescriptionBox"
    };
    t.open(name, b)?;
    visual_attributes(t, p)?;
    writeln!(t, ">")?;
    match p.info.as_deref() {
        Some(info) => t.child(Some(info))?,
        None if b.size > 0 => writeln!(t, "{MISSING_3GPP_CONFIG}")?,
        None => {}
    }
    t.done(Some(name), Some(b))
}

/// 3GPP decoder configuration; the codec follows from the box code.
pub fn gppc(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, GppConfig);
    let vendor = xml_escape(&p.vendor.as_str_lossy()).into_owned();
    let name = match &b.typ.0 {
        b"damr" => {
            t.open("AMRConfigurationBox", b)?;
            write!(t, "Vendor=\"{vendor}\" Version=\"{}\"", p.decoder_version)?;
            writeln!(
                t,
                " FramesPerSample=\"{}\" SupportedModes=\"{:x}\" ModeRotating=\"{}\">",
                p.frames_per_sample, p.amr_mode_set, p.amr_mode_change_period
            )?;
            "AMRConfigurationBox"
        }
        b"d263" => {
            t.open("H263ConfigurationBox", b)?;
            write!(t, "Vendor=\"{vendor}\" Version=\"{}\"", p.decoder_version)?;
            writeln!(t, " Profile=\"{}\" Level=\"{}\">", p.h263_profile, p.h263_level)?;
            "H263ConfigurationBox"
        }
        code => {
            let name = match code {
                b"devc" => "EVRCConfigurationBox",
                b"dqcp" => "QCELPConfigurationBox",
                b"dsmv" => "SMVConfigurationBox",
                _ => return Ok(()),
            };
            t.open(name, b)?;
            writeln!(
                t,
                "Vendor=\"{vendor}\" Version=\"{}\" FramesPerSample=\"{}\" >",
                p.decoder_version, p.frames_per_sample
            )?;
            name
        }
    };
    t.done(Some(name), Some(b))
}

fn parameter_sets(t: &mut Trace<'_>, element: &str, sets: &[Vec<u8>]) -> Result<()> {
    for ps in sets {
        writeln!(t, "<{element} size=\"{}\" content=\"{}\"/>", ps.len(), data_uri(ps))?;
    }
    Ok(())
}

/// avcC / svcC
pub fn avcc(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, AvcConfig);
    let is_svc = b.typ.0 == *b"svcC";
    let codec = if is_svc { "SVC" } else { "AVC" };
    let box_name = format!("{codec}ConfigurationBox");
    t.open(&box_name, b)?;
    writeln!(t, ">")?;
    write!(t, "<{codec}DecoderConfigurationRecord")?;

    let Some(cfg) = &p.config else {
        if b.size > 0 {
            writeln!(t, ">")?;
            writeln!(t, "<!-- INVALID AVC ENTRY : no AVC/SVC config record -->")?;
        } else {
            write!(
                t,
                " configurationVersion=\"\" AVCProfileIndication=\"\" profile_compatibility=\"\" AVCLevelIndication=\"\" nal_unit_size=\"\" complete_representation=\"\""
            )?;
            writeln!(t, " chroma_format=\"\" luma_bit_depth=\"\" chroma_bit_depth=\"\">")?;
            writeln!(t, "<SequenceParameterSet size=\"\" content=\"\"/>")?;
            writeln!(t, "<PictureParameterSet size=\"\" content=\"\"/>")?;
            writeln!(t, "<SequenceParameterSetExtensions size=\"\" content=\"\"/>")?;
        }
        writeln!(t, "</{codec}DecoderConfigurationRecord>")?;
        return t.done(Some(&box_name), Some(b));
    };

    write!(
        t,
        " configurationVersion=\"{}\" AVCProfileIndication=\"{}\" profile_compatibility=\"{}\" AVCLevelIndication=\"{}\" nal_unit_size=\"{}\"",
        cfg.configuration_version,
        cfg.profile_indication,
        cfg.profile_compatibility,
        cfg.level_indication,
        cfg.nal_unit_size
    )?;
    if is_svc {
        write!(t, " complete_representation=\"{}\"", cfg.complete_representation)?;
    } else if AVC_REXT_PROFILES.contains(&cfg.profile_indication) {
        write!(
            t,
            " chroma_format=\"{}\" luma_bit_depth=\"{}\" chroma_bit_depth=\"{}\"",
            chroma_format_name(cfg.chroma_format),
            cfg.luma_bit_depth,
            cfg.chroma_bit_depth
        )?;
    }
    writeln!(t, ">")?;
    parameter_sets(t, "SequenceParameterSet", &cfg.sequence_parameter_sets)?;
    parameter_sets(t, "PictureParameterSet", &cfg.picture_parameter_sets)?;
    parameter_sets(t, "SequenceParameterSetExtensions", &cfg.sequence_parameter_set_extensions)?;
    writeln!(t, "</{codec}DecoderConfigurationRecord>")?;
    t.done(Some(&box_name), Some(b))
}

/// hvcC / lhvC
pub fn hvcc(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, HevcConfig);
    let is_hevc = b.typ.0 == *b"hvcC";
    let codec = if is_hevc { "HEVC" } else { "L-HEVC" };
    let box_name = format!("{codec}ConfigurationBox");
    t.open(&box_name, b)?;
    writeln!(t, ">")?;

    let Some(cfg) = &p.config else {
        if b.size > 0 {
            writeln!(t, "<!-- INVALID HEVC ENTRY: no HEVC/SHVC config record -->")?;
        } else {
            write!(t, "<{codec}DecoderConfigurationRecord nal_unit_size=\"\" configurationVersion=\"\" ")?;
            if is_hevc {
                write!(
                    t,
                    "profile_space=\"\" tier_flag=\"\" profile_idc=\"\" general_profile_compatibility_flags=\"\" progressive_source_flag=\"\" interlaced_source_flag=\"\" non_packed_constraint_flag=\"\" frame_only_constraint_flag=\"\" constraint_indicator_flags=\"\" level_idc=\"\" "
                )?;
            }
            write!(t, "min_spatial_segmentation_idc=\"\" parallelismType=\"\" ")?;
            if is_hevc {
                write!(
                    t,
                    "chroma_format=\"\" luma_bit_depth=\"\" chroma_bit_depth=\"\" avgFrameRate=\"\" constantFrameRate=\"\" numTemporalLayers=\"\" temporalIdNested=\"\""
                )?;
            }
            writeln!(t, ">")?;
            writeln!(t, "<ParameterSetArray nalu_type=\"\" complete_set=\"\">")?;
            writeln!(t, "<ParameterSet size=\"\" content=\"\"/>")?;
            writeln!(t, "</ParameterSetArray>")?;
            writeln!(t, "</{codec}DecoderConfigurationRecord>")?;
        }
        return t.done(Some(&box_name), Some(b));
    };

    write!(t, "<{codec}DecoderConfigurationRecord nal_unit_size=\"{}\" ", cfg.nal_unit_size)?;
    write!(t, "configurationVersion=\"{}\" ", cfg.configuration_version)?;
    if is_hevc {
        write!(
            t,
            "profile_space=\"{}\" tier_flag=\"{}\" profile_idc=\"{}\" general_profile_compatibility_flags=\"{}\" ",
            cfg.profile_space, cfg.tier_flag, cfg.profile_idc, cfg.general_profile_compatibility_flags
        )?;
        write!(
            t,
            "progressive_source_flag=\"{}\" interlaced_source_flag=\"{}\" non_packed_constraint_flag=\"{}\" frame_only_constraint_flag=\"{}\" ",
            cfg.progressive_source_flag,
            cfg.interlaced_source_flag,
            cfg.non_packed_constraint_flag,
            cfg.frame_only_constraint_flag
        )?;
        write!(
            t,
            "constraint_indicator_flags=\"{}\" level_idc=\"{}\" ",
            cfg.constraint_indicator_flags, cfg.level_idc
        )?;
    }
    write!(t, "min_spatial_segmentation_idc=\"{}\" ", cfg.min_spatial_segmentation_idc)?;
    write!(t, "parallelismType=\"{}\" ", cfg.parallelism_type)?;
    if is_hevc {
        write!(
            t,
            "chroma_format=\"{}\" luma_bit_depth=\"{}\" chroma_bit_depth=\"{}\" avgFrameRate=\"{}\" constantFrameRate=\"{}\" numTemporalLayers=\"{}\" temporalIdNested=\"{}\"",
            chroma_format_name(cfg.chroma_format),
            cfg.luma_bit_depth,
            cfg.chroma_bit_depth,
            cfg.avg_frame_rate,
            cfg.constant_frame_rate,
            cfg.num_temporal_layers,
            cfg.temporal_id_nested
        )?;
    }
    writeln!(t, ">")?;
    for ar in &cfg.param_arrays {
        writeln!(
            t,
            "<ParameterSetArray nalu_type=\"{}\" complete_set=\"{}\">",
            ar.nalu_type, ar.array_completeness
        )?;
        parameter_sets(t, "ParameterSet", &ar.nalus)?;
        writeln!(t, "</ParameterSetArray>")?;
    }
    writeln!(t, "</{codec}DecoderConfigurationRecord>")?;
    t.done(Some(&box_name), Some(b))
}

pub fn m4ds(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ExtensionDescriptors);
    t.open("MPEG4ExtensionDescriptorsBox", b)?;
    writeln!(t, ">")?;
    for d in &p.descriptors {
        descriptor(t, d)?;
    }
    t.done(Some("MPEG4ExtensionDescriptorsBox"), Some(b))
}

pub fn btrt(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, BitRate);
    t.open("BitRateBox", b)?;
    writeln!(
        t,
        "BufferSizeDB=\"{}\" avgBitRate=\"{}\" maxBitRate=\"{}\">",
        p.buffer_size_db, p.avg_bitrate, p.max_bitrate
    )?;
    t.done(Some("BitRateBox"), Some(b))
}

pub fn pasp(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, PixelAspectRatio);
    t.open("PixelAspectRatioBox", b)?;
    writeln!(t, "hSpacing=\"{}\" vSpacing=\"{}\" >", p.h_spacing, p.v_spacing)?;
    t.done(Some("PixelAspectRatioBox"), Some(b))
}

pub fn rvcc(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, RvcConfig);
    t.open("RVCConfigurationBox", b)?;
    write!(t, "predefined=\"{}\"", p.predefined_rvc_config)?;
    if p.predefined_rvc_config == 0 {
        write!(t, " rvc_meta_idx=\"{}\"", p.rvc_meta_idx)?;
    }
    writeln!(t, ">")?;
    t.done(Some("RVCConfigurationBox"), Some(b))
}

fn opt_attr(t: &mut Trace<'_>, key: &str, value: &Option<String>) -> Result<()> {
    if let Some(v) = value {
        write!(t, "{key}=\"{}\" ", xml_escape(v))?;
    }
    Ok(())
}

/// metx, mett, stxt, stpp and sbtt.
pub fn metx(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, MetaDataSampleEntry);
    let code = &b.typ.0;
    let name = match code {
        b"metx" => "XMLMetaDataSampleEntryBox",
        b"mett" => "TextMetaDataSampleEntryBox",
        b"sbtt" => "SubtitleSampleEntryBox",
        b"stxt" => "SimpleTextSampleEntryBox",
        b"stpp" => "XMLSubtitleSampleEntryBox",
        _ => "UnknownTextSampleEntryBox",
    };
    t.open(name, b)?;

    let is_xml = code == b"metx" || code == b"stpp";
    if is_xml {
        write!(t, "namespace=\"{}\" ", xml_escape(opt_str(&p.xml_namespace)))?;
        opt_attr(t, "schema_location", &p.xml_schema_loc)?;
        if code == b"metx" {
            opt_attr(t, "content_encoding", &p.content_encoding)?;
        } else {
            opt_attr(t, "auxiliary_mime_types", &p.auxiliary_mime_types)?;
        }
    } else {
        write!(t, "mime_type=\"{}\" ", xml_escape(opt_str(&p.mime_type)))?;
        opt_attr(t, "content_encoding", &p.content_encoding)?;
    }
    writeln!(t, ">")?;
    if !is_xml {
        t.child_opt(p.config.as_deref())?;
    }
    t.children(&p.protections)?;
    t.done(Some(name), Some(b))
}

pub fn txtc(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, TextConfig);
    t.open("TextConfigBox", b)?;
    writeln!(t, ">")?;
    if let Some(cfg) = &p.config {
        t.text(cfg)?;
    }
    t.done(Some("TextConfigBox"), Some(b))
}

pub fn dims(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, DimsSampleEntry);
    t.open("DIMSSampleEntryBox", b)?;
    writeln!(t, "dataReferenceIndex=\"{}\">", p.data_reference_index)?;
    t.child_opt(p.config.as_deref())?;
    t.child_opt(p.scripts.as_deref())?;
    t.children(&p.protections)?;
    t.done(Some("DIMSSampleEntryBox"), Some(b))
}

pub fn dist(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, DimsScriptTypes);
    t.open("DIMSScriptTypesBox", b)?;
    writeln!(t, "types=\"{}\">", xml_escape(&p.content_script_types))?;
    t.done(Some("DIMSScriptTypesBox"), Some(b))
}

pub fn dimc(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, DimsSceneConfig);
    t.open("DIMSSceneConfigBox", b)?;
    write!(
        t,
        "profile=\"{}\" level=\"{}\" pathComponents=\"{}\" useFullRequestHosts=\"{}\" streamType=\"{}\" containsRedundant=\"{}\"",
        p.profile,
        p.level,
        p.path_components,
        u8::from(p.full_request_host),
        u8::from(p.stream_type),
        p.contains_redundant
    )?;
    writeln!(
        t,
        " textEncoding=\"{}\" contentEncoding=\"{}\" >",
        xml_escape(&p.text_encoding),
        xml_escape(&p.content_encoding)
    )?;
    t.done(Some("DIMSSceneConfigBox"), Some(b))
}

/// dac3 / dec3: the E-AC-3 form is shown under its own code.
pub fn dac3(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, Ac3Config);
    if p.is_ec3 {
        t.open_as("EC3SpecificBox", b, FourCC::new(b"dec3"))?;
        writeln!(t, "nb_streams=\"{}\" data_rate=\"{}\">", p.streams.len(), p.brcode)?;
        for s in &p.streams {
            writeln!(
                t,
                "<EC3StreamConfig fscod=\"{}\" bsid=\"{}\" bsmod=\"{}\" acmod=\"{}\" lfon=\"{}\" num_sub_dep=\"{}\" chan_loc=\"{}\"/>",
                s.fscod, s.bsid, s.bsmod, s.acmod, s.lfon, s.nb_dep_sub, s.chan_loc
            )?;
        }
        return t.done(Some("EC3SpecificBox"), Some(b));
    }
    let first = Ac3Stream::default();
    let s = p.streams.first().unwrap_or(&first);
    t.open("AC3SpecificBox", b)?;
    writeln!(
        t,
        "fscod=\"{}\" bsid=\"{}\" bsmod=\"{}\" acmod=\"{}\" lfon=\"{}\" bit_rate_code=\"{}\">",
        s.fscod, s.bsid, s.bsmod, s.acmod, s.lfon, p.brcode
    )?;
    t.done(Some("AC3SpecificBox"), Some(b))
}

/// ac-3 entry, shown as ec-3 when it carries E-AC-3.
pub fn ac3(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, AudioSampleEntry);
    let (name, shown, cfg): (_, _, &[u8; 4]) = if p.is_ec3 {
        ("EC3SampleEntryBox", FourCC::new(b"ec-3"), b"dec3")
    } else {
        ("AC3SampleEntryBox", b.typ, b"dac3")
    };
    t.open_as(name, b, shown)?;
    audio_attributes(t, p)?;
    writeln!(t, ">")?;
    required(t, b, p.info.as_deref(), cfg)?;
    t.done(Some(name), Some(b))
}

pub fn lsrc(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, LaserConfig);
    t.open("LASeRConfigurationBox", b)?;
    write!(t, "LASeRHeader=\"{}\" ", hex_prefixed(&p.header))?;
    write!(t, ">")?;
    t.done(Some("LASeRConfigurationBox"), Some(b))
}

pub fn lsr1(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, LaserSampleEntry);
    t.open("LASeRSampleEntryBox", b)?;
    writeln!(t, "DataReferenceIndex=\"{}\">", p.data_reference_index)?;
    t.child_opt(p.lsr_config.as_deref())?;
    t.child_opt(p.descr.as_deref())?;
    t.done(Some("LASeRSampleEntryBox"), Some(b))
}

/// WebVTT string boxes; the text goes out as character data.
pub fn boxstring(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, StringBox);
    let name = match &b.typ.0 {
        b"vttc" => "WebVTTConfigurationBox",
        b"ctim" => "CueTimeBox",
        b"iden" => "CueIDBox",
        b"sttg" => "CueSettingsBox",
        b"payl" => "CuePayloadBox",
        b"vtta" => "VTTAdditionalCueBox",
        _ => "StringBox",
    };
    t.open(name, b)?;
    writeln!(t, ">{}", cdata(&format!("\n{}", opt_str(&p.string))))?;
    t.done(Some(name), Some(b))
}

pub fn vtcu(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    container(t, "VTTCueBox", b)
}

pub fn vtte(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    container(t, "VTTEmptyCueBox", b)
}

pub fn wvtt(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, WebVttSampleEntry);
    t.open("WebVTTSampleEntryBox", b)?;
    writeln!(t, ">")?;
    t.child_opt(p.config.as_deref())?;
    t.done(Some("WebVTTSampleEntryBox"), Some(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::{AudioSampleEntry, BoxBody};

    fn render(b: &IsoBox) -> String {
        let mut out = Vec::new();
        crate::dump::dump_box(b, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn ec3_entry_shows_its_own_code() {
        let entry = AudioSampleEntry { is_ec3: true, samplerate: 48000, ..Default::default() };
        let b = IsoBox::with_body(FourCC::new(b"ac-3"), 0, BoxBody::AudioSampleEntry(entry));
        let s = render(&b);
        assert!(s.starts_with("<EC3SampleEntryBox Size=\"0\" Type=\"ec-3\" "));
        assert!(s.contains("SampleRate=\"48000\""));
        assert!(s.ends_with("</EC3SampleEntryBox>\n"));
    }

    #[test]
    fn chroma_names() {
        assert_eq!(chroma_format_name(1), "YUV 4:2:0");
        assert_eq!(chroma_format_name(9), "Unknown");
    }
}
