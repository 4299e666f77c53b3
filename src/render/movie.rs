//! Movie structure: moov/trak/mdia/minf, their headers and user data.

use super::{container, container_full, open_full, opt_str, required};
use crate::boxes::{Descriptor, IsoBox, codes};
use crate::dump::{Result, Trace};
use crate::util::{data_uri, format_duration};
use std::io::Write;

/// Opaque MPEG-4 descriptor payload.
pub(crate) fn descriptor(t: &mut Trace<'_>, d: &Descriptor) -> Result<()> {
    writeln!(t, "<DescriptorData tag=\"{}\" data=\"{}\"/>", d.tag, data_uri(&d.data))?;
    Ok(())
}

pub fn unkn(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, Unknown);
    t.open_as("UnknownBox", b, p.original_type)?;
    writeln!(t, ">")?;
    writeln!(t, "</UnknownBox>")?;
    Ok(())
}

pub fn reftype(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, TrackReferenceType);
    if p.reference_type.is_zero() {
        return Ok(());
    }
    t.open_as("TrackReferenceTypeBox", b, p.reference_type)?;
    write!(t, "Tracks=\"")?;
    for id in &p.track_ids {
        write!(t, " {id}")?;
    }
    writeln!(t, "\">")?;
    t.done(Some("TrackReferenceTypeBox"), Some(b))
}

pub fn free(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, FreeSpace);
    let name = if b.typ.0 == *b"free" { "FreeSpaceBox" } else { "SkipBox" };
    t.open(name, b)?;
    writeln!(t, "dataSize=\"{}\"/>", p.data_size)?;
    Ok(())
}

pub fn mdat(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, MediaData);
    t.open("MediaDataBox", b)?;
    writeln!(t, "dataSize=\"{}\"/>", p.data_size)?;
    Ok(())
}

pub fn moov(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, Movie);
    t.open("MovieBox", b)?;
    writeln!(t, ">")?;
    t.child_opt(p.iods.as_deref())?;
    t.child_opt(p.meta.as_deref())?;
    required(t, b, p.mvhd.as_deref(), b"mvhd")?;
    t.child_opt(p.mvex.as_deref())?;
    t.children(&p.tracks)?;
    t.child_opt(p.udta.as_deref())?;
    t.done(Some("MovieBox"), Some(b))
}

pub fn mvhd(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, MovieHeader);
    open_full(t, "MovieHeaderBox", b)?;
    write!(t, "CreationTime=\"{}\" ", p.creation_time)?;
    write!(t, "ModificationTime=\"{}\" ", p.modification_time)?;
    write!(t, "TimeScale=\"{}\" ", p.timescale)?;
    write!(t, "Duration=\"{}\" ", p.duration)?;
    writeln!(t, "NextTrackID=\"{}\">", p.next_track_id)?;
    t.done(Some("MovieHeaderBox"), Some(b))
}

pub fn mdhd(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, MediaHeader);
    open_full(t, "MediaHeaderBox", b)?;
    write!(t, "CreationTime=\"{}\" ", p.creation_time)?;
    write!(t, "ModificationTime=\"{}\" ", p.modification_time)?;
    write!(t, "TimeScale=\"{}\" ", p.timescale)?;
    write!(t, "Duration=\"{}\" ", p.duration)?;
    write!(t, "LanguageCode=\"")?;
    t.text(&p.language)?;
    writeln!(t, "\">")?;
    t.done(Some("MediaHeaderBox"), Some(b))
}

pub fn vmhd(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    container_full(t, "VideoMediaHeaderBox", b)
}

pub fn smhd(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    container_full(t, "SoundMediaHeaderBox", b)
}

pub fn hmhd(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, HintMediaHeader);
    open_full(t, "HintMediaHeaderBox", b)?;
    write!(t, "MaximumPDUSize=\"{}\" ", p.max_pdu_size)?;
    write!(t, "AveragePDUSize=\"{}\" ", p.avg_pdu_size)?;
    write!(t, "MaxBitRate=\"{}\" ", p.max_bitrate)?;
    writeln!(t, "AverageBitRate=\"{}\">", p.avg_bitrate)?;
    t.done(Some("HintMediaHeaderBox"), Some(b))
}

/// nmhd and the MPEG-4 systems media headers (odhd, crhd, sdhd, sthd).
pub fn nmhd(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    container_full(t, "MPEGMediaHeaderBox", b)
}

pub fn dinf(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, DataInformation);
    t.open("DataInformationBox", b)?;
    writeln!(t, ">")?;
    required(t, b, p.dref.as_deref(), b"dref")?;
    t.done(Some("DataInformationBox"), Some(b))
}

pub fn url(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, DataEntryUrl);
    open_full(t, "URLDataEntryBox", b)?;
    match &p.location {
        Some(loc) => {
            write!(t, " URL=\"")?;
            t.text(loc)?;
            writeln!(t, "\">")?;
        }
        None => {
            writeln!(t, ">")?;
            if b.size > 0 {
                if b.flags & 1 == 0 {
                    writeln!(t, "<!--ERROR: No location indicated-->")?;
                } else {
                    writeln!(t, "<!--Data is contained in the movie file-->")?;
                }
            }
        }
    }
    t.done(Some("URLDataEntryBox"), Some(b))
}

pub fn urn(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, DataEntryUrn);
    open_full(t, "URNDataEntryBox", b)?;
    if let Some(name) = &p.name {
        write!(t, " URN=\"")?;
        t.text(name)?;
        write!(t, "\"")?;
    }
    if let Some(loc) = &p.location {
        write!(t, " URL=\"")?;
        t.text(loc)?;
        write!(t, "\"")?;
    }
    writeln!(t, ">")?;
    t.done(Some("URNDataEntryBox"), Some(b))
}

pub fn cprt(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, Copyright);
    open_full(t, "CopyrightBox", b)?;
    write!(t, "LanguageCode=\"")?;
    t.text(&p.language)?;
    write!(t, "\" CopyrightNotice=\"")?;
    t.text(&p.notice)?;
    writeln!(t, "\">")?;
    t.done(Some("CopyrightBox"), Some(b))
}

pub fn kind(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, Kind);
    open_full(t, "KindBox", b)?;
    write!(t, "schemeURI=\"")?;
    t.text(&p.scheme_uri)?;
    write!(t, "\" value=\"")?;
    t.text(opt_str(&p.value))?;
    writeln!(t, "\">")?;
    t.done(Some("KindBox"), Some(b))
}

pub fn chpl(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ChapterList);
    open_full(t, "ChapterListBox", b)?;
    writeln!(t, ">")?;
    if b.size > 0 {
        for c in &p.chapters {
            write!(t, "<Chapter name=\"")?;
            t.text(opt_str(&c.name))?;
            // start times count 100ns units
            writeln!(t, "\" startTime=\"{}\" />", format_duration(c.start_time, 10_000_000, '.'))?;
        }
    } else {
        writeln!(t, "<Chapter name=\"\" startTime=\"\"/>")?;
    }
    t.done(Some("ChapterListBox"), Some(b))
}

pub fn pdin(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ProgressiveDownload);
    open_full(t, "ProgressiveDownloadBox", b)?;
    writeln!(t, ">")?;
    if b.size > 0 {
        for e in &p.entries {
            writeln!(
                t,
                "<DownloadInfo rate=\"{}\" estimatedTime=\"{}\" />",
                e.rate, e.estimated_time
            )?;
        }
    } else {
        writeln!(t, "<DownloadInfo rate=\"\" estimatedTime=\"\" />")?;
    }
    t.done(Some("ProgressiveDownloadBox"), Some(b))
}

pub fn hdlr(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, Handler);
    open_full(t, "HandlerBox", b)?;
    write!(t, "hdlrType=\"")?;
    t.text(&p.handler_type.as_str_lossy())?;
    write!(t, "\" Name=\"")?;
    t.text(opt_str(&p.name))?;
    write!(t, "\" ")?;
    write!(t, "reserved1=\"{}\" reserved2=\"{}\"", p.reserved1, data_uri(&p.reserved2))?;
    writeln!(t, ">")?;
    t.done(Some("HandlerBox"), Some(b))
}

pub fn iods(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, Descriptor);
    open_full(t, "ObjectDescriptorBox", b)?;
    writeln!(t, ">")?;
    match &p.descriptor {
        Some(d) => descriptor(t, d)?,
        None if b.size > 0 => writeln!(t, "<!--WARNING: Object Descriptor not present-->")?,
        None => {}
    }
    t.done(Some("ObjectDescriptorBox"), Some(b))
}

pub fn esds(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, Descriptor);
    open_full(t, "MPEG4ESDescriptorBox", b)?;
    writeln!(t, ">")?;
    match &p.descriptor {
        Some(d) => descriptor(t, d)?,
        None if b.size > 0 => writeln!(
            t,
            "<!--INVALID MP4 FILE: ESD not present in MPEG Sample Description or corrupted-->"
        )?,
        None => {}
    }
    t.done(Some("MPEG4ESDescriptorBox"), Some(b))
}

pub fn trak(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, Track);
    t.open("TrackBox", b)?;
    writeln!(t, ">")?;
    match p.tkhd.as_deref() {
        Some(tkhd) => t.child(Some(tkhd))?,
        None if b.size > 0 => writeln!(t, "<!--INVALID FILE: Missing Track Header-->")?,
        None => {}
    }
    t.child_opt(p.tref.as_deref())?;
    t.child_opt(p.meta.as_deref())?;
    t.child_opt(p.edts.as_deref())?;
    t.child_opt(p.mdia.as_deref())?;
    t.child_opt(p.trgr.as_deref())?;
    t.child_opt(p.udta.as_deref())?;
    t.done(Some("TrackBox"), Some(b))
}

pub fn edts(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, Edit);
    t.open("EditBox", b)?;
    writeln!(t, ">")?;
    required(t, b, p.elst.as_deref(), b"elst")?;
    t.done(Some("EditBox"), Some(b))
}

pub fn udta(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, UserData);
    t.open("UserDataBox", b)?;
    writeln!(t, ">")?;
    t.children(&p.records)?;
    t.done(Some("UserDataBox"), Some(b))
}

/// Data entries are unattached children of the reference box.
pub fn dref(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    container_full(t, "DataReferenceBox", b)
}

pub fn elst(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, EditList);
    open_full(t, "EditListBox", b)?;
    writeln!(t, "EntryCount=\"{}\">", p.entries.len())?;
    for e in &p.entries {
        writeln!(
            t,
            "<EditListEntry Duration=\"{}\" MediaTime=\"{}\" MediaRate=\"{}\"/>",
            e.segment_duration, e.media_time, e.media_rate
        )?;
    }
    if b.size == 0 {
        writeln!(t, "<EditListEntry Duration=\"\" MediaTime=\"\" MediaRate=\"\"/>")?;
    }
    t.done(Some("EditListBox"), Some(b))
}

pub fn minf(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, MediaInformation);
    t.open("MediaInformationBox", b)?;
    writeln!(t, ">")?;
    required(t, b, p.header.as_deref(), b"nmhd")?;
    required(t, b, p.dinf.as_deref(), b"dinf")?;
    required(t, b, p.stbl.as_deref(), b"stbl")?;
    t.done(Some("MediaInformationBox"), Some(b))
}

pub fn tkhd(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, TrackHeader);
    open_full(t, "TrackHeaderBox", b)?;
    write!(
        t,
        "CreationTime=\"{}\" ModificationTime=\"{}\" TrackID=\"{}\" Duration=\"{}\"",
        p.creation_time, p.modification_time, p.track_id, p.duration
    )?;
    if p.alternate_group != 0 {
        write!(t, " AlternateGroupID=\"{}\"", p.alternate_group)?;
    }
    let visual = p.width != 0 || p.height != 0;
    if p.volume != 0 {
        write!(t, " Volume=\"{:.2}\"", f64::from(p.volume) / 256.0)?;
    } else if visual {
        write!(
            t,
            " Width=\"{:.2}\" Height=\"{:.2}\"",
            f64::from(p.width) / 65536.0,
            f64::from(p.height) / 65536.0
        )?;
        if p.layer != 0 {
            write!(t, " Layer=\"{}\"", p.layer)?;
        }
    }
    writeln!(t, ">")?;
    if visual {
        let m = &p.matrix;
        write!(t, "<Matrix m11=\"0x{:08x}\" m12=\"0x{:08x}\" m13=\"0x{:08x}\" ", m[0], m[1], m[2])?;
        write!(t, "m21=\"0x{:08x}\" m22=\"0x{:08x}\" m23=\"0x{:08x}\" ", m[3], m[4], m[5])?;
        writeln!(t, "m31=\"0x{:08x}\" m32=\"0x{:08x}\" m33=\"0x{:08x}\"/>", m[6], m[7], m[8])?;
    }
    t.done(Some("TrackHeaderBox"), Some(b))
}

/// Reference kinds are unattached children of `tref`.
pub fn tref(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    container(t, "TrackReferenceBox", b)
}

pub fn mdia(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, Media);
    t.open("MediaBox", b)?;
    writeln!(t, ">")?;
    required(t, b, p.mdhd.as_deref(), b"mdhd")?;
    required(t, b, p.hdlr.as_deref(), b"hdlr")?;
    required(t, b, p.minf.as_deref(), b"minf")?;
    t.done(Some("MediaBox"), Some(b))
}

pub fn elng(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ExtendedLanguage);
    t.open("ExtendedLanguageBox", b)?;
    write!(t, "LanguageCode=\"")?;
    t.text(&p.extended_language)?;
    writeln!(t, "\">")?;
    t.done(Some("ExtendedLanguageBox"), Some(b))
}

pub fn ftyp(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, FileType);
    let name = if b.typ == codes::FTYP { "FileTypeBox" } else { "SegmentTypeBox" };
    t.open(name, b)?;
    write!(t, "MajorBrand=\"")?;
    t.text(&p.major_brand.as_str_lossy())?;
    writeln!(t, "\" MinorVersion=\"{}\">", p.minor_version)?;
    for brand in &p.compatible_brands {
        write!(t, "<BrandEntry AlternateBrand=\"")?;
        t.text(&brand.as_str_lossy())?;
        writeln!(t, "\"/>")?;
    }
    if b.size == 0 {
        writeln!(t, "<BrandEntry AlternateBrand=\"4CC\"/>")?;
    }
    t.done(Some(name), Some(b))
}

pub fn trgr(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, TrackGroup);
    t.open("TrackGroupBox", b)?;
    writeln!(t, ">")?;
    t.children(&p.groups)?;
    t.done(Some("TrackGroupBox"), Some(b))
}

pub fn trgt(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, TrackGroupType);
    t.open_as("TrackGroupTypeBox", b, p.group_type)?;
    t.full(b)?;
    writeln!(t, "track_group_id=\"{}\">", p.track_group_id)?;
    t.done(Some("TrackGroupTypeBox"), Some(b))
}

pub fn void(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    t.open("VoidBox", b)?;
    writeln!(t, ">")?;
    writeln!(t, "</VoidBox>")?;
    Ok(())
}

/// `uuid` box with no recognised extension payload.
pub(crate) fn unknown_uuid(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    t.open("UnknownUUIDBox", b)?;
    writeln!(t, ">")?;
    writeln!(t, "</UnknownUUIDBox>")?;
    Ok(())
}
