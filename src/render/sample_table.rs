//! Sample table renderers: stbl and its tables, sample groups and sample
//! auxiliary information.

use super::{container_full, open_full, required};
use crate::boxes::{FourCC, GroupDescriptionEntry, IsoBox, OperatingPointsInformation};
use crate::dump::{Result, Trace};
use crate::util::{data_uri, hex_prefixed};
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Cursor, Write};

pub fn stbl(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, SampleTable);
    t.open("SampleTableBox", b)?;
    writeln!(t, ">")?;
    required(t, b, p.stsd.as_deref(), b"stsd")?;
    required(t, b, p.stts.as_deref(), b"stts")?;
    t.child_opt(p.ctts.as_deref())?;
    t.child_opt(p.cslg.as_deref())?;
    t.child_opt(p.stss.as_deref())?;
    t.child_opt(p.stsh.as_deref())?;
    required(t, b, p.stsc.as_deref(), b"stsc")?;
    required(t, b, p.stsz.as_deref(), b"stsz")?;
    required(t, b, p.stco.as_deref(), b"stco")?;
    t.child_opt(p.stdp.as_deref())?;
    t.child_opt(p.sdtp.as_deref())?;
    t.child_opt(p.padb.as_deref())?;
    t.child_opt(p.stsf.as_deref())?;
    t.children(&p.subs)?;
    t.children(&p.sgpd)?;
    t.children(&p.sbgp)?;
    t.children(&p.saiz)?;
    t.children(&p.saio)?;
    t.done(Some("SampleTableBox"), Some(b))
}

/// Sample entries are unattached children of the description box.
pub fn stsd(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    container_full(t, "SampleDescriptionBox", b)
}

pub fn stts(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, TimeToSample);
    open_full(t, "TimeToSampleBox", b)?;
    writeln!(t, "EntryCount=\"{}\">", p.entries.len())?;
    let mut nb_samples = 0u64;
    for e in &p.entries {
        writeln!(
            t,
            "<TimeToSampleEntry SampleDelta=\"{}\" SampleCount=\"{}\"/>",
            e.sample_delta, e.sample_count
        )?;
        nb_samples += u64::from(e.sample_count);
    }
    if b.size > 0 {
        writeln!(t, "<!-- counted {nb_samples} samples in STTS entries -->")?;
    } else {
        writeln!(t, "<TimeToSampleEntry SampleDelta=\"\" SampleCount=\"\"/>")?;
    }
    t.done(Some("TimeToSampleBox"), Some(b))
}

pub fn ctts(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, CompositionOffset);
    open_full(t, "CompositionOffsetBox", b)?;
    writeln!(t, "EntryCount=\"{}\">", p.entries.len())?;
    let mut nb_samples = 0u64;
    for e in &p.entries {
        writeln!(
            t,
            "<CompositionOffsetEntry CompositionOffset=\"{}\" SampleCount=\"{}\"/>",
            e.decoding_offset, e.sample_count
        )?;
        nb_samples += u64::from(e.sample_count);
    }
    if b.size > 0 {
        writeln!(t, "<!-- counted {nb_samples} samples in CTTS entries -->")?;
    } else {
        writeln!(t, "<CompositionOffsetEntry CompositionOffset=\"\" SampleCount=\"\"/>")?;
    }
    t.done(Some("CompositionOffsetBox"), Some(b))
}

pub fn cslg(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, CompositionToDecode);
    open_full(t, "CompositionToDecodeBox", b)?;
    writeln!(
        t,
        "compositionToDTSShift=\"{}\" leastDecodeToDisplayDelta=\"{}\" greatestDecodeToDisplayDelta=\"{}\" compositionStartTime=\"{}\" compositionEndTime=\"{}\">",
        p.composition_to_dts_shift,
        p.least_decode_to_display_delta,
        p.greatest_decode_to_display_delta,
        p.composition_start_time,
        p.composition_end_time
    )?;
    t.done(Some("CompositionToDecodeBox"), Some(b))
}

pub fn stsh(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ShadowSync);
    open_full(t, "SyncShadowBox", b)?;
    writeln!(t, "EntryCount=\"{}\">", p.entries.len())?;
    for e in &p.entries {
        writeln!(
            t,
            "<SyncShadowEntry ShadowedSample=\"{}\" SyncSample=\"{}\"/>",
            e.shadowed_sample_number, e.sync_sample_number
        )?;
    }
    if b.size == 0 {
        writeln!(t, "<SyncShadowEntry ShadowedSample=\"\" SyncSample=\"\"/>")?;
    }
    t.done(Some("SyncShadowBox"), Some(b))
}

/// Number of samples covered by the chunk runs. The last run is counted
/// as a single chunk, so the result can undercount.
pub fn stsc_sample_count(entries: &[crate::boxes::SampleToChunkEntry]) -> u64 {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let chunks = match entries.get(i + 1) {
                Some(next) => next.first_chunk.saturating_sub(e.first_chunk),
                None => 1,
            };
            u64::from(chunks) * u64::from(e.samples_per_chunk)
        })
        .sum()
}

pub fn stsc(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, SampleToChunk);
    open_full(t, "SampleToChunkBox", b)?;
    writeln!(t, "EntryCount=\"{}\">", p.entries.len())?;
    for e in &p.entries {
        writeln!(
            t,
            "<SampleToChunkEntry FirstChunk=\"{}\" SamplesPerChunk=\"{}\" SampleDescriptionIndex=\"{}\"/>",
            e.first_chunk, e.samples_per_chunk, e.sample_description_index
        )?;
    }
    if b.size > 0 {
        writeln!(
            t,
            "<!-- counted {} samples in STSC entries (could be less than sample count) -->",
            stsc_sample_count(&p.entries)
        )?;
    } else {
        writeln!(
            t,
            "<SampleToChunkEntry FirstChunk=\"\" SamplesPerChunk=\"\" SampleDescriptionIndex=\"\"/>"
        )?;
    }
    t.done(Some("SampleToChunkBox"), Some(b))
}

/// stsz and stz2.
pub fn stsz(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, SampleSize);
    let compact = b.typ.0 != *b"stsz";
    let name = if compact { "CompactSampleSizeBox" } else { "SampleSizeBox" };
    open_full(t, name, b)?;
    write!(t, "SampleCount=\"{}\"", p.sample_count)?;
    if compact {
        write!(t, " SampleSizeBits=\"{}\"", p.sample_size)?;
    } else if p.sample_size != 0 {
        write!(t, " ConstantSampleSize=\"{}\"", p.sample_size)?;
    }
    writeln!(t, ">")?;
    if compact || p.sample_size == 0 {
        match &p.sizes {
            None if b.size > 0 => writeln!(t, "<!--WARNING: No Sample Size indications-->")?,
            None => {}
            Some(sizes) => {
                for s in sizes {
                    writeln!(t, "<SampleSizeEntry Size=\"{s}\"/>")?;
                }
            }
        }
    }
    if b.size == 0 {
        writeln!(t, "<SampleSizeEntry Size=\"\"/>")?;
    }
    t.done(Some(name), Some(b))
}

pub fn stco(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ChunkOffset);
    open_full(t, "ChunkOffsetBox", b)?;
    writeln!(t, "EntryCount=\"{}\">", p.offsets.as_ref().map_or(0, Vec::len))?;
    match &p.offsets {
        None if b.size > 0 => writeln!(t, "<!--Warning: No Chunk Offsets indications-->")?,
        None => {}
        Some(offsets) => {
            for o in offsets {
                writeln!(t, "<ChunkEntry offset=\"{o}\"/>")?;
            }
        }
    }
    if b.size == 0 {
        writeln!(t, "<ChunkEntry offset=\"\"/>")?;
    }
    t.done(Some("ChunkOffsetBox"), Some(b))
}

pub fn co64(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ChunkLargeOffset);
    open_full(t, "ChunkLargeOffsetBox", b)?;
    writeln!(t, "EntryCount=\"{}\">", p.offsets.as_ref().map_or(0, Vec::len))?;
    match &p.offsets {
        None if b.size > 0 => writeln!(t, "<!--Warning: No Chunk Offsets indications-->")?,
        None => {}
        Some(offsets) => {
            for o in offsets {
                writeln!(t, "<ChunkOffsetEntry offset=\"{o}\"/>")?;
            }
        }
    }
    if b.size == 0 {
        writeln!(t, "<ChunkOffsetEntry offset=\"\"/>")?;
    }
    t.done(Some("ChunkLargeOffsetBox"), Some(b))
}

pub fn stss(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, SyncSample);
    open_full(t, "SyncSampleBox", b)?;
    writeln!(t, "EntryCount=\"{}\">", p.sample_numbers.as_ref().map_or(0, Vec::len))?;
    match &p.sample_numbers {
        None if b.size > 0 => writeln!(t, "<!--Warning: No Key Frames indications-->")?,
        None => {}
        Some(numbers) => {
            for n in numbers {
                writeln!(t, "<SyncSampleEntry sampleNumber=\"{n}\"/>")?;
            }
        }
    }
    if b.size == 0 {
        writeln!(t, "<SyncSampleEntry sampleNumber=\"\"/>")?;
    }
    t.done(Some("SyncSampleBox"), Some(b))
}

pub fn stdp(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, DegradationPriority);
    open_full(t, "DegradationPriorityBox", b)?;
    writeln!(t, "EntryCount=\"{}\">", p.priorities.as_ref().map_or(0, Vec::len))?;
    match &p.priorities {
        None if b.size > 0 => {
            writeln!(t, "<!--Warning: No Degradation Priority indications-->")?
        }
        None => {}
        Some(priorities) => {
            for v in priorities {
                writeln!(t, "<DegradationPriorityEntry DegradationPriority=\"{v}\"/>")?;
            }
        }
    }
    if b.size == 0 {
        writeln!(t, "<DegradationPriorityEntry DegradationPriority=\"\"/>")?;
    }
    t.done(Some("DegradationPriorityBox"), Some(b))
}

/// Symbolic value of a 2-bit dependency field.
pub fn dependency_flag(v: u8) -> &'static str {
    match v & 3 {
        0 => "unknown",
        1 => "yes",
        2 => "no",
        _ => "RESERVED",
    }
}

pub fn sdtp(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, SampleDependencyType);
    open_full(t, "SampleDependencyTypeBox", b)?;
    writeln!(t, "SampleCount=\"{}\">", p.sample_info.as_ref().map_or(0, Vec::len))?;
    match &p.sample_info {
        None if b.size > 0 => {
            writeln!(t, "<!--Warning: No sample dependencies indications-->")?
        }
        None => {}
        Some(info) => {
            for flag in info {
                writeln!(
                    t,
                    "<SampleDependencyEntry dependsOnOther=\"{}\" dependedOn=\"{}\" hasRedundancy=\"{}\"  />",
                    dependency_flag(flag >> 4),
                    dependency_flag(flag >> 2),
                    dependency_flag(*flag)
                )?;
            }
        }
    }
    if b.size == 0 {
        writeln!(
            t,
            "<SampleDependencyEntry dependsOnOther=\"unknown|yes|no|RESERVED\" dependedOn=\"unknown|yes|no|RESERVED\" hasRedundancy=\"unknown|yes|no|RESERVED\"/>"
        )?;
    }
    t.done(Some("SampleDependencyTypeBox"), Some(b))
}

pub fn padb(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, PaddingBits);
    t.open("PaddingBitsBox", b)?;
    writeln!(t, "EntryCount=\"{}\">", p.padbits.len())?;
    for bits in &p.padbits {
        writeln!(t, "<PaddingBitsEntry PaddingBits=\"{bits}\"/>")?;
    }
    if b.size == 0 {
        writeln!(t, "<PaddingBitsEntry PaddingBits=\"\"/>")?;
    }
    t.done(Some("PaddingBitsBox"), Some(b))
}

pub fn stsf(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, SampleFragment);
    t.open("SampleFragmentBox", b)?;
    writeln!(t, "EntryCount=\"{}\">", p.entries.len())?;
    for e in &p.entries {
        writeln!(
            t,
            "<SampleFragmentEntry SampleNumber=\"{}\" FragmentCount=\"{}\">",
            e.sample_number,
            e.fragment_sizes.len()
        )?;
        for size in &e.fragment_sizes {
            writeln!(t, "<FragmentSizeEntry size=\"{size}\"/>")?;
        }
        writeln!(t, "</SampleFragmentEntry>")?;
    }
    if b.size == 0 {
        writeln!(t, "<SampleFragmentEntry SampleNumber=\"\" FragmentCount=\"\">")?;
        writeln!(t, "<FragmentSizeEntry size=\"\"/>")?;
        writeln!(t, "</SampleFragmentEntry>")?;
    }
    t.done(Some("SampleFragmentBox"), Some(b))
}

pub fn subs(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, SubSampleInformation);
    t.open("SubSampleInformationBox", b)?;
    writeln!(t, "EntryCount=\"{}\">", p.samples.len())?;
    for s in &p.samples {
        writeln!(
            t,
            "<SampleEntry SampleDelta=\"{}\" SubSampleCount=\"{}\">",
            s.sample_delta,
            s.subsamples.len()
        )?;
        for ss in &s.subsamples {
            writeln!(
                t,
                "<SubSample Size=\"{}\" Priority=\"{}\" Discardable=\"{}\" Reserved=\"{:08X}\"/>",
                ss.size, ss.priority, ss.discardable, ss.reserved
            )?;
        }
        writeln!(t, "</SampleEntry>")?;
    }
    if b.size == 0 {
        writeln!(t, "<SampleEntry SampleDelta=\"\" SubSampleCount=\"\">")?;
        writeln!(t, "<SubSample Size=\"\" Priority=\"\" Discardable=\"\" Reserved=\"\"/>")?;
        writeln!(t, "</SampleEntry>")?;
    }
    t.done(Some("SubSampleInformationBox"), Some(b))
}

/// A four character code value when its first (or last) byte is
/// alphanumeric, the plain number otherwise.
fn code_or_number(v: u32, probe: u8) -> String {
    if probe.is_ascii_alphanumeric() {
        FourCC::from_u32(v).as_str_lossy()
    } else {
        v.to_string()
    }
}

pub fn sbgp(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, SampleGroup);
    open_full(t, "SampleGroupBox", b)?;
    write!(t, "grouping_type=\"")?;
    t.text(&p.grouping_type.as_str_lossy())?;
    write!(t, "\"")?;
    if b.version == 1 {
        let param = p.grouping_type_parameter;
        write!(t, " grouping_type_parameter=\"")?;
        t.text(&code_or_number(param, (param & 0xFF) as u8))?;
        write!(t, "\"")?;
    }
    writeln!(t, ">")?;
    for e in &p.entries {
        writeln!(
            t,
            "<SampleGroupBoxEntry sample_count=\"{}\" group_description_index=\"{}\"/>",
            e.sample_count, e.group_description_index
        )?;
    }
    if b.size == 0 {
        writeln!(t, "<SampleGroupBoxEntry sample_count=\"\" group_description_index=\"\"/>")?;
    }
    t.done(Some("SampleGroupBox"), Some(b))
}

fn oinf(t: &mut Trace<'_>, p: Option<&OperatingPointsInformation>) -> Result<()> {
    let Some(p) = p else {
        writeln!(
            t,
            "<OperatingPointsInformation scalability_mask=\"Multiview|Spatial scalability|Auxilary|unknown\" num_profile_tier_level=\"\" num_operating_points=\"\" dependency_layers=\"\">"
        )?;
        writeln!(
            t,
            " <ProfileTierLevel general_profile_space=\"\" general_tier_flag=\"\" general_profile_idc=\"\" general_profile_compatibility_flags=\"\" general_constraint_indicator_flags=\"\" />"
        )?;
        writeln!(
            t,
            "<OperatingPoint output_layer_set_idx=\"\" max_temporal_id=\"\" layer_count=\"\" minPicWidth=\"\" minPicHeight=\"\" maxPicWidth=\"\" maxPicHeight=\"\" maxChromaFormat=\"\" maxBitDepth=\"\" frame_rate_info_flag=\"\" bit_rate_info_flag=\"\" avgFrameRate=\"\" constantFrameRate=\"\" maxBitRate=\"\" avgBitRate=\"\"/>"
        )?;
        writeln!(
            t,
            "<Layer dependent_layerID=\"\" num_layers_dependent_on=\"\" dependent_on_layerID=\"\" dimension_identifier=\"\"/>"
        )?;
        writeln!(t, "</OperatingPointsInformation>")?;
        return Ok(());
    };

    let mask_name = match p.scalability_mask {
        2 => "Multiview",
        4 => "Spatial scalability",
        8 => "Auxilary",
        _ => "unknown",
    };
    writeln!(
        t,
        "<OperatingPointsInformation scalability_mask=\"{} ({mask_name})\" num_profile_tier_level=\"{}\" num_operating_points=\"{}\" dependency_layers=\"{}\">",
        p.scalability_mask,
        p.profile_tier_levels.len(),
        p.operating_points.len(),
        p.dependency_layers.len()
    )?;
    for ptl in &p.profile_tier_levels {
        writeln!(
            t,
            " <ProfileTierLevel general_profile_space=\"{}\" general_tier_flag=\"{}\" general_profile_idc=\"{}\" general_profile_compatibility_flags=\"{}\" general_constraint_indicator_flags=\"{}\" />",
            ptl.general_profile_space,
            ptl.general_tier_flag,
            ptl.general_profile_idc,
            ptl.general_profile_compatibility_flags,
            ptl.general_constraint_indicator_flags
        )?;
    }
    for op in &p.operating_points {
        write!(t, "<OperatingPoint output_layer_set_idx=\"{}\"", op.output_layer_set_idx)?;
        write!(t, " max_temporal_id=\"{}\" layer_count=\"{}\"", op.max_temporal_id, op.layer_count)?;
        write!(t, " minPicWidth=\"{}\" minPicHeight=\"{}\"", op.min_pic_width, op.min_pic_height)?;
        write!(t, " maxPicWidth=\"{}\" maxPicHeight=\"{}\"", op.max_pic_width, op.max_pic_height)?;
        write!(t, " maxChromaFormat=\"{}\" maxBitDepth=\"{}\"", op.max_chroma_format, op.max_bit_depth)?;
        write!(
            t,
            " frame_rate_info_flag=\"{}\" bit_rate_info_flag=\"{}\"",
            u8::from(op.frame_rate_info_flag),
            u8::from(op.bit_rate_info_flag)
        )?;
        if op.frame_rate_info_flag {
            write!(
                t,
                " avgFrameRate=\"{}\" constantFrameRate=\"{}\"",
                op.avg_frame_rate, op.constant_frame_rate
            )?;
        }
        if op.bit_rate_info_flag {
            write!(t, " maxBitRate=\"{}\" avgBitRate=\"{}\"", op.max_bit_rate, op.avg_bit_rate)?;
        }
        writeln!(t, "/>")?;
    }
    for dep in &p.dependency_layers {
        write!(
            t,
            "<Layer dependent_layerID=\"{}\" num_layers_dependent_on=\"{}\"",
            dep.dependent_layer_id,
            dep.dependent_on_layer_ids.len()
        )?;
        if !dep.dependent_on_layer_ids.is_empty() {
            write!(t, " dependent_on_layerID=\"")?;
            for id in &dep.dependent_on_layer_ids {
                write!(t, "{id} ")?;
            }
            write!(t, "\"")?;
        }
        write!(t, " dimension_identifier=\"")?;
        for (j, dim) in dep.dimension_identifier.iter().enumerate() {
            if p.scalability_mask & (1 << j) != 0 {
                write!(t, "{dim} ")?;
            }
        }
        writeln!(t, "\"/>")?;
    }
    writeln!(t, "</OperatingPointsInformation>")?;
    Ok(())
}

fn linf(t: &mut Trace<'_>, p: Option<&crate::boxes::LayerInformation>) -> Result<()> {
    let Some(p) = p else {
        writeln!(t, "<LayerInformation num_layers=\"\">")?;
        writeln!(
            t,
            "<LayerInfoItem layer_id=\"\" min_temporalId=\"\" max_temporalId=\"\" sub_layer_presence_flags=\"\"/>"
        )?;
        writeln!(t, "</LayerInformation>")?;
        return Ok(());
    };
    writeln!(t, "<LayerInformation num_layers=\"{}\">", p.layers.len())?;
    for li in &p.layers {
        writeln!(
            t,
            "<LayerInfoItem layer_id=\"{}\" min_temporalId=\"{}\" max_temporalId=\"{}\" sub_layer_presence_flags=\"{}\"/>",
            li.layer_id, li.min_temporal_id, li.max_temporal_id, li.sub_layer_presence_flags
        )?;
    }
    writeln!(t, "</LayerInformation>")?;
    Ok(())
}

/// Truncated payloads read as zero, like a bit reader past its end.
fn be_u16(c: &mut Cursor<&[u8]>) -> u16 {
    c.read_u16::<BigEndian>().unwrap_or(0)
}

fn be_u8(c: &mut Cursor<&[u8]>) -> u8 {
    c.read_u8().unwrap_or(0)
}

/// Tile region group entry, decoded from its raw payload.
fn trif(t: &mut Trace<'_>, data: Option<&[u8]>) -> Result<()> {
    let Some(data) = data else {
        writeln!(
            t,
            "<TileRegionGroupEntry ID=\"\" tileGroup=\"\" independent=\"\" full_picture=\"\" filter_disabled=\"\" x=\"\" y=\"\" w=\"\" h=\"\">"
        )?;
        writeln!(t, "<TileRegionDependency tileID=\"\"/>")?;
        writeln!(t, "</TileRegionGroupEntry>")?;
        return Ok(());
    };
    let mut c = Cursor::new(data);
    let id = be_u16(&mut c);
    let bits = be_u8(&mut c);
    let tile_group = bits >> 7;
    write!(t, "<TileRegionGroupEntry ID=\"{id}\" tileGroup=\"{tile_group}\" ")?;
    if tile_group == 0 {
        writeln!(t, "/>")?;
        return Ok(());
    }
    let independent = (bits >> 5) & 3;
    let full_picture = (bits >> 4) & 1;
    let filter_disabled = (bits >> 3) & 1;
    let has_dep = (bits >> 2) & 1;
    write!(
        t,
        "independent=\"{independent}\" full_picture=\"{full_picture}\" filter_disabled=\"{filter_disabled}\" "
    )?;
    if full_picture == 0 {
        let x = be_u16(&mut c);
        let y = be_u16(&mut c);
        write!(t, "x=\"{x}\" y=\"{y}\" ")?;
    }
    let w = be_u16(&mut c);
    let h = be_u16(&mut c);
    write!(t, "w=\"{w}\" h=\"{h}\" ")?;
    if has_dep == 0 {
        writeln!(t, "/>")?;
    } else {
        let count = be_u16(&mut c);
        writeln!(t, ">")?;
        for _ in 0..count {
            writeln!(t, "<TileRegionDependency tileID=\"{}\"/>", be_u16(&mut c))?;
        }
        writeln!(t, "</TileRegionGroupEntry>")?;
    }
    Ok(())
}

fn nalm_field(c: &mut Cursor<&[u8]>, large_size: u8) -> u16 {
    if large_size == 1 { be_u16(c) } else { u16::from(be_u8(c)) }
}

/// NAL unit map entry, decoded from its raw payload.
fn nalm(t: &mut Trace<'_>, data: Option<&[u8]>) -> Result<()> {
    let Some(data) = data else {
        writeln!(t, "<NALUMap rle=\"\" large_size=\"\">")?;
        writeln!(t, "<NALUMapEntry NALU_startNumber=\"\" groupID=\"\"/>")?;
        writeln!(t, "</NALUMap>")?;
        return Ok(());
    };
    let mut c = Cursor::new(data);
    let bits = be_u8(&mut c);
    let large_size = (bits >> 1) & 1;
    let rle = bits & 1;
    let entry_count = nalm_field(&mut c, large_size);
    writeln!(t, "<NALUMap rle=\"{rle}\" large_size=\"{large_size}\">")?;
    for _ in 0..entry_count {
        write!(t, "<NALUMapEntry ")?;
        if rle == 1 {
            write!(t, "NALU_startNumber=\"{}\" ", nalm_field(&mut c, large_size))?;
        }
        writeln!(t, "groupID=\"{}\"/>", be_u16(&mut c))?;
    }
    writeln!(t, "</NALUMap>")?;
    Ok(())
}

pub fn sgpd(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    use GroupDescriptionEntry as G;

    let p = body!(b, SampleGroupDescription);
    open_full(t, "SampleGroupDescriptionBox", b)?;
    write!(t, "grouping_type=\"")?;
    t.text(&p.grouping_type.as_str_lossy())?;
    write!(t, "\"")?;
    if b.version == 1 {
        write!(t, " default_length=\"{}\"", p.default_length)?;
    }
    if b.version >= 2 && p.default_description_index != 0 {
        write!(t, " default_group_index=\"{}\"", p.default_description_index)?;
    }
    writeln!(t, ">")?;
    let kind = &p.grouping_type.0;
    for entry in &p.entries {
        match entry {
            G::RollRecovery { roll_distance } => {
                writeln!(t, "<RollRecoveryEntry roll_distance=\"{roll_distance}\" />")?
            }
            G::VisualRandomAccess { num_leading_samples_known, num_leading_samples } => {
                write!(
                    t,
                    "<VisualRandomAccessEntry num_leading_samples_known=\"{}\"",
                    if *num_leading_samples_known { "yes" } else { "no" }
                )?;
                if *num_leading_samples_known {
                    write!(t, " num_leading_samples=\"{num_leading_samples}\"")?;
                }
                writeln!(t, "/>")?;
            }
            G::CencEncryption(e) => {
                write!(
                    t,
                    "<CENCSampleEncryptionGroupEntry IsEncrypted=\"{}\" IV_size=\"{}\" KID=\"{}",
                    e.is_protected,
                    e.per_sample_iv_size,
                    hex_prefixed(&e.kid)
                )?;
                if e.is_protected == 1 && e.per_sample_iv_size == 0 {
                    let len = usize::from(e.constant_iv_size).min(16);
                    write!(
                        t,
                        "\" constant_IV_size=\"{}\"  constant_IV=\"{}",
                        e.constant_iv_size,
                        hex_prefixed(&e.constant_iv[..len])
                    )?;
                }
                writeln!(t, "\"/>")?;
            }
            G::OperatingPoints(o) => oinf(t, Some(o))?,
            G::LayerInformation(l) => linf(t, Some(l))?,
            G::Default { data } if kind == b"trif" => trif(t, Some(data))?,
            G::Default { data } if kind == b"nalm" => nalm(t, Some(data))?,
            G::Default { data } => writeln!(
                t,
                "<DefaultSampleGroupDescriptionEntry size=\"{}\" data=\"{}\"/>",
                data.len(),
                data_uri(data)
            )?,
        }
    }
    if b.size == 0 {
        match kind {
            b"roll" => writeln!(t, "<RollRecoveryEntry roll_distance=\"\"/>")?,
            b"rap " => writeln!(
                t,
                "<VisualRandomAccessEntry num_leading_samples_known=\"yes|no\" num_leading_samples=\"\" />"
            )?,
            b"seig" => writeln!(
                t,
                "<CENCSampleEncryptionGroupEntry IsEncrypted=\"\" IV_size=\"\" KID=\"\" constant_IV_size=\"\"  constant_IV=\"\"/>"
            )?,
            b"oinf" => oinf(t, None)?,
            b"linf" => linf(t, None)?,
            b"trif" => trif(t, None)?,
            b"nalm" => nalm(t, None)?,
            _ => writeln!(t, "<DefaultSampleGroupDescriptionEntry size=\"\" data=\"\"/>")?,
        }
    }
    t.done(Some("SampleGroupDescriptionBox"), Some(b))
}

fn aux_info_type(t: &mut Trace<'_>, b: &IsoBox, typ: FourCC, param: u32) -> Result<()> {
    if b.flags & 1 != 0 {
        write!(t, " aux_info_type=\"")?;
        t.text(&code_or_number(typ.as_u32(), typ.0[0]))?;
        write!(t, "\" aux_info_type_parameter=\"{param}\"")?;
    }
    Ok(())
}

pub fn saiz(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, SampleAuxInfoSizes);
    open_full(t, "SampleAuxiliaryInfoSizeBox", b)?;
    write!(
        t,
        "default_sample_info_size=\"{}\" sample_count=\"{}\"",
        p.default_sample_info_size, p.sample_count
    )?;
    aux_info_type(t, b, p.aux_info_type, p.aux_info_type_parameter)?;
    writeln!(t, ">")?;
    if p.default_sample_info_size == 0 {
        for size in &p.sample_info_sizes {
            writeln!(t, "<SAISize size=\"{size}\" />")?;
        }
    }
    if b.size == 0 {
        writeln!(t, "<SAISize size=\"\" />")?;
    }
    t.done(Some("SampleAuxiliaryInfoSizeBox"), Some(b))
}

pub fn saio(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, SampleAuxInfoOffsets);
    open_full(t, "SampleAuxiliaryInfoOffsetBox", b)?;
    write!(t, "entry_count=\"{}\"", p.offsets.len())?;
    aux_info_type(t, b, p.aux_info_type, p.aux_info_type_parameter)?;
    writeln!(t, ">")?;
    for offset in &p.offsets {
        writeln!(t, "<SAIChunkOffset offset=\"{offset}\"/>")?;
    }
    if b.size == 0 {
        writeln!(t, "<SAIChunkOffset offset=\"\"/>")?;
    }
    t.done(Some("SampleAuxiliaryInfoOffsetBox"), Some(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_flags_decode_two_bits() {
        assert_eq!(dependency_flag(0x24 >> 4), "no");
        assert_eq!(dependency_flag(0x24 >> 2), "yes");
        assert_eq!(dependency_flag(0x24), "unknown");
        assert_eq!(dependency_flag(3), "RESERVED");
    }

    #[test]
    fn nalm_payload_with_rle() {
        let mut out = Vec::new();
        {
            let mut t = Trace::new(&mut out);
            nalm(&mut t, Some(&[0x01, 0x02, 0x00, 0x00, 0x01, 0x05, 0x00, 0x02])).unwrap();
        }
        let s = String::from_utf8(out).unwrap();
        assert!(s.starts_with("<NALUMap rle=\"1\" large_size=\"0\">\n"));
        assert!(s.contains("<NALUMapEntry NALU_startNumber=\"0\" groupID=\"1\"/>"));
        assert!(s.contains("<NALUMapEntry NALU_startNumber=\"5\" groupID=\"2\"/>"));
    }
}
