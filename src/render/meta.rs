//! Meta boxes, item information, HEIF image properties, track selection
//! and iTunes metadata tags.

use super::{container, joined, open_full, opt_str};
use crate::boxes::{BoxBody, FourCC, IsoBox, TagData};
use crate::dump::{Result, Trace};
use crate::util::{data_uri, xml_escape, xml_escape_bytes};
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Cursor, Write};

/// One item reference kind. Rendered under the kind's own code, with the
/// element named after it (`dimgItemReferenceBox`, ...).
pub fn ireftype(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ItemReferenceType);
    if p.reference_type.is_zero() {
        return Ok(());
    }
    let name = format!("{}ItemReferenceBox", p.reference_type.as_str_lossy());
    t.open_as(&name, b, p.reference_type)?;
    write!(t, "from_item_id=\"{}\" to_item_ids=\"", p.from_item_id)?;
    for id in &p.to_item_ids {
        write!(t, " {id}")?;
    }
    writeln!(t, "\">")?;
    t.done(Some(&name), Some(b))
}

pub fn meta(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, Meta);
    open_full(t, "MetaBox", b)?;
    writeln!(t, ">")?;
    for child in [
        &p.handler,
        &p.primary_resource,
        &p.file_locations,
        &p.item_locations,
        &p.protections,
        &p.item_infos,
        &p.ipmp_control,
        &p.item_refs,
        &p.item_props,
    ] {
        t.child_opt(child.as_deref())?;
    }
    t.done(Some("MetaBox"), Some(b))
}

pub fn xml(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, Xml);
    open_full(t, "XMLBox", b)?;
    writeln!(t, ">")?;
    let doc = crate::util::cdata(&format!("\n{}", p.xml));
    writeln!(t, "{doc}")?;
    t.done(Some("XMLBox"), Some(b))
}

pub fn bxml(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, BinaryXml);
    open_full(t, "BinaryXMLBox", b)?;
    writeln!(t, "binarySize=\"{}\">", p.data.len())?;
    t.done(Some("BinaryXMLBox"), Some(b))
}

pub fn pitm(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, PrimaryItem);
    open_full(t, "PrimaryItemBox", b)?;
    writeln!(t, "item_ID=\"{}\">", p.item_id)?;
    t.done(Some("PrimaryItemBox"), Some(b))
}

pub fn ipro(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ItemProtection);
    open_full(t, "ItemProtectionBox", b)?;
    writeln!(t, ">")?;
    t.children(&p.protection_information)?;
    t.done(Some("ItemProtectionBox"), Some(b))
}

pub fn infe(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ItemInfoEntry);
    open_full(t, "ItemInfoEntryBox", b)?;
    writeln!(
        t,
        "item_ID=\"{}\" item_protection_index=\"{}\" item_name=\"{}\" content_type=\"{}\" content_encoding=\"{}\" item_type=\"{}\">",
        p.item_id,
        p.item_protection_index,
        xml_escape(opt_str(&p.item_name)),
        xml_escape(opt_str(&p.content_type)),
        xml_escape(opt_str(&p.content_encoding)),
        p.item_type
    )?;
    t.done(Some("ItemInfoEntryBox"), Some(b))
}

pub fn iinf(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ItemInfo);
    open_full(t, "ItemInfoBox", b)?;
    writeln!(t, ">")?;
    t.children(&p.item_infos)?;
    t.done(Some("ItemInfoBox"), Some(b))
}

pub fn iloc(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ItemLocation);
    open_full(t, "ItemLocationBox", b)?;
    writeln!(
        t,
        "offset_size=\"{}\" length_size=\"{}\" base_offset_size=\"{}\" index_size=\"{}\">",
        p.offset_size, p.length_size, p.base_offset_size, p.index_size
    )?;
    for e in &p.entries {
        writeln!(
            t,
            "<ItemLocationEntry item_ID=\"{}\" data_reference_index=\"{}\" base_offset=\"{}\" construction_method=\"{}\">",
            e.item_id, e.data_reference_index, e.base_offset, e.construction_method
        )?;
        for x in &e.extents {
            writeln!(
                t,
                "<ItemExtentEntry extent_offset=\"{}\" extent_length=\"{}\" extent_index=\"{}\" />",
                x.extent_offset, x.extent_length, x.extent_index
            )?;
        }
        writeln!(t, "</ItemLocationEntry>")?;
    }
    if b.size == 0 {
        writeln!(
            t,
            "<ItemLocationEntry item_ID=\"\" data_reference_index=\"\" base_offset=\"\" construction_method=\"\">"
        )?;
        writeln!(t, "<ItemExtentEntry extent_offset=\"\" extent_length=\"\" extent_index=\"\" />")?;
        writeln!(t, "</ItemLocationEntry>")?;
    }
    t.done(Some("ItemLocationBox"), Some(b))
}

pub fn iref(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ItemReference);
    open_full(t, "ItemReferenceBox", b)?;
    writeln!(t, ">")?;
    t.children(&p.references)?;
    t.done(Some("ItemReferenceBox"), Some(b))
}

/// Element name of an iTunes tag, and whether its value is left out.
fn apple_tag_name(code: FourCC) -> (&'static str, bool) {
    match &code.0 {
        b"\xA9nam" => ("NameBox", false),
        b"\xA9cmt" => ("CommentBox", false),
        b"\xA9day" => ("CreatedBox", false),
        b"\xA9ART" => ("ArtistBox", false),
        b"\xA9trk" => ("TrackBox", false),
        b"\xA9alb" => ("AlbumBox", false),
        b"\xA9com" => ("CompositorBox", false),
        b"\xA9wrt" => ("WriterBox", false),
        b"\xA9too" => ("ToolBox", false),
        b"\xA9cpy" => ("CopyrightBox", false),
        b"\xA9des" => ("DescriptionBox", false),
        b"\xA9gen" | b"gnre" => ("GenreBox", false),
        b"\xA9grp" => ("GroupBox", false),
        b"aART" => ("AlbumArtistBox", false),
        b"pgap" => ("GapelessBox", false),
        b"disk" => ("DiskBox", false),
        b"trkn" => ("TrackNumberBox", false),
        b"tmpo" => ("TempoBox", false),
        b"cpil" => ("CompilationBox", false),
        b"covr" => ("CoverArtBox", true),
        b"----" => ("iTunesSpecificBox", true),
        _ => ("UnknownBox", true),
    }
}

fn yes_no(data: Option<&TagData>) -> &'static str {
    match data.and_then(|d| d.data.first()) {
        Some(&v) if v != 0 => "yes",
        _ => "no",
    }
}

/// `(number, total)` of a disk or track number tag. Missing bytes read as 0.
fn number_pair(data: &[u8]) -> (u16, u16) {
    let mut c = Cursor::new(data);
    let _reserved = c.read_u16::<BigEndian>().unwrap_or(0);
    let number = c.read_u16::<BigEndian>().unwrap_or(0);
    let total = c.read_u16::<BigEndian>().unwrap_or(0);
    (number, total)
}

pub fn apple_tag(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, AppleTag);
    let (name, no_value) = apple_tag_name(b.typ);
    let data = p.data.as_ref();
    t.open(name, b)?;
    if !no_value {
        let bytes = data.map(|d| d.data.as_slice()).unwrap_or_default();
        match &b.typ.0 {
            b"disk" => {
                let (n, total) = number_pair(bytes);
                write!(t, " DiskNumber=\"{n}\" NbDisks=\"{total}\" ")?;
            }
            b"trkn" => {
                let (n, total) = number_pair(bytes);
                write!(t, " TrackNumber=\"{n}\" NbTracks=\"{total}\" ")?;
            }
            b"tmpo" => {
                let bpm = Cursor::new(bytes).read_u16::<BigEndian>().unwrap_or(0);
                write!(t, " BPM=\"{bpm}\" ")?;
            }
            b"cpil" => write!(t, " IsCompilation=\"{}\" ", yes_no(data))?,
            b"pgap" => write!(t, " IsGapeless=\"{}\" ", yes_no(data))?,
            _ => {
                if let Some(d) = data {
                    write!(t, " value=\"")?;
                    // text tags start with a printable byte, binary ones get a data URI
                    if d.data.first().is_some_and(|&c| c != 0) {
                        t.write_all(&xml_escape_bytes(&d.data))?;
                    } else {
                        write!(t, "{}", data_uri(&d.data))?;
                    }
                    write!(t, "\" ")?;
                }
            }
        }
    }
    writeln!(t, ">")?;
    if name != "UnknownBox" {
        if let Some(d) = data {
            writeln!(t, "<FullBoxInfo Version=\"{}\" Flags=\"0x{:X}\"/>", d.version, d.flags)?;
        }
    }
    t.done(Some(name), Some(b))
}

pub fn ilst(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ItemList);
    t.open("ItemListBox", b)?;
    writeln!(t, ">")?;
    for tag in &p.tags {
        // tags are listed even when their code has no registry row
        match tag.body {
            BoxBody::AppleTag(_) => apple_tag(tag, t)?,
            _ => t.child(Some(tag))?,
        }
    }
    t.done(Some("ItemListBox"), Some(b))
}

pub fn tsel(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, TrackSelection);
    open_full(t, "TrackSelectionBox", b)?;
    writeln!(
        t,
        "switchGroup=\"{}\" criteria=\"{}\">",
        p.switch_group,
        xml_escape(&joined(&p.attribute_list, ";"))
    )?;
    t.done(Some("TrackSelectionBox"), Some(b))
}

pub fn strk(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, SubTrack);
    t.open("SubTrackBox", b)?;
    writeln!(t, ">")?;
    t.child_opt(p.info.as_deref())?;
    t.done(Some("SubTrackBox"), Some(b))
}

/// Self closing; unattached children are not listed.
pub fn stri(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, SubTrackInformation);
    open_full(t, "SubTrackInformationBox", b)?;
    write!(
        t,
        "switch_group=\"{}\" alternate_group=\"{}\" sub_track_id=\"{}\" ",
        p.switch_group, p.alternate_group, p.sub_track_id
    )?;
    write!(t, "attribute_list=\"")?;
    for a in &p.attribute_list {
        write!(t, "{} ", xml_escape(&a.as_str_lossy()))?;
    }
    writeln!(t, "\" />")?;
    Ok(())
}

pub fn ispe(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ImageSpatialExtents);
    open_full(t, "ImageSpatialExtentsPropertyBox", b)?;
    writeln!(
        t,
        "image_width=\"{}\" image_height=\"{}\">",
        p.image_width, p.image_height
    )?;
    t.done(Some("ImageSpatialExtentsPropertyBox"), Some(b))
}

pub fn colr(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ColourInformation);
    open_full(t, "ColourInformationBox", b)?;
    writeln!(
        t,
        "colour_type=\"{}\" colour_primaries=\"{}\" transfer_characteristics=\"{}\" matrix_coefficients=\"{}\" full_range_flag=\"{}\">",
        xml_escape(&p.colour_type.as_str_lossy()),
        p.colour_primaries,
        p.transfer_characteristics,
        p.matrix_coefficients,
        u8::from(p.full_range_flag)
    )?;
    t.done(Some("ColourInformationBox"), Some(b))
}

pub fn pixi(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, PixelInformation);
    open_full(t, "PixelInformationPropertyBox", b)?;
    writeln!(
        t,
        "num_channels=\"{}\" bits_per_channel=\"{}\">",
        p.bits_per_channel.len(),
        joined(&p.bits_per_channel, ", ")
    )?;
    t.done(Some("PixelInformationPropertyBox"), Some(b))
}

pub fn rloc(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, RelativeLocation);
    open_full(t, "RelativeLocationPropertyBox", b)?;
    writeln!(
        t,
        "horizontal_offset=\"{}\" vertical_offset=\"{}\">",
        p.horizontal_offset, p.vertical_offset
    )?;
    t.done(Some("RelativeLocationPropertyBox"), Some(b))
}

pub fn irot(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ImageRotation);
    open_full(t, "ImageRotationBox", b)?;
    writeln!(t, "angle=\"{}\">", u32::from(p.angle) * 90)?;
    t.done(Some("ImageRotationBox"), Some(b))
}

pub fn ipco(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    container(t, "ItemPropertyContainerBox", b)
}

pub fn iprp(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ItemProperties);
    t.open("ItemPropertiesBox", b)?;
    writeln!(t, ">")?;
    t.child_opt(p.property_container.as_deref())?;
    t.done(Some("ItemPropertiesBox"), Some(b))
}

pub fn ipma(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    let p = body!(b, ItemPropertyAssociation);
    open_full(t, "ItemPropertyAssociationBox", b)?;
    writeln!(t, "entry_count=\"{}\">", p.entries.len())?;
    for e in &p.entries {
        writeln!(
            t,
            "<AssociationEntry item_ID=\"{}\" association_count=\"{}\">",
            e.item_id,
            e.associations.len()
        )?;
        for a in &e.associations {
            writeln!(
                t,
                "<Property index=\"{}\" essential=\"{}\"/>",
                a.property_index,
                u8::from(a.essential)
            )?;
        }
        writeln!(t, "</AssociationEntry>")?;
    }
    if b.size == 0 {
        writeln!(t, "<AssociationEntry item_ID=\"\" association_count=\"\">")?;
        writeln!(t, "<Property index=\"\" essential=\"\"/>")?;
        writeln!(t, "</AssociationEntry>")?;
    }
    t.done(Some("ItemPropertyAssociationBox"), Some(b))
}

pub fn grpl(b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
    container(t, "GroupListBox", b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_pairs_tolerate_short_payloads() {
        assert_eq!(number_pair(&[0, 0, 0, 3, 0, 12]), (3, 12));
        assert_eq!(number_pair(&[0, 0, 0, 7]), (7, 0));
        assert_eq!(number_pair(&[]), (0, 0));
    }

    #[test]
    fn tag_names() {
        assert_eq!(apple_tag_name(FourCC::new(b"\xA9nam")), ("NameBox", false));
        assert_eq!(apple_tag_name(FourCC::new(b"covr")), ("CoverArtBox", true));
        assert_eq!(apple_tag_name(FourCC::new(b"zzzz")).0, "UnknownBox");
    }
}
