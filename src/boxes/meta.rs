//! Meta boxes, items, image properties, track selection and iTunes tags.

use super::{FourCC, IsoBox};

type Child = Option<Box<IsoBox>>;

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Meta {
    pub handler: Child,
    pub primary_resource: Child,
    pub file_locations: Child,
    pub item_locations: Child,
    pub protections: Child,
    pub item_infos: Child,
    pub ipmp_control: Child,
    pub item_refs: Child,
    pub item_props: Child,
}

/// xml
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct XmlBox {
    pub xml: String,
}

/// bxml
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BinaryXml {
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PrimaryItem {
    pub item_id: u32,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ItemProtection {
    pub protection_information: Vec<IsoBox>,
}

/// infe
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ItemInfoEntry {
    pub item_id: u32,
    pub item_protection_index: u16,
    pub item_name: Option<String>,
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub item_type: FourCC,
}

/// iinf
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ItemInfo {
    pub item_infos: Vec<IsoBox>,
}

/// iloc
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ItemLocation {
    pub offset_size: u8,
    pub length_size: u8,
    pub base_offset_size: u8,
    pub index_size: u8,
    pub entries: Vec<ItemLocationEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ItemLocationEntry {
    pub item_id: u32,
    pub data_reference_index: u16,
    pub base_offset: u64,
    pub construction_method: u8,
    pub extents: Vec<ItemExtent>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ItemExtent {
    pub extent_offset: u64,
    pub extent_length: u64,
    pub extent_index: u64,
}

/// iref
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ItemReference {
    pub references: Vec<IsoBox>,
}

/// One reference kind inside `iref` (internal code `REFI`).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ItemReferenceType {
    pub reference_type: FourCC,
    pub from_item_id: u32,
    pub to_item_ids: Vec<u32>,
}

/// iprp
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ItemProperties {
    pub property_container: Child,
}

/// ipma
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ItemPropertyAssociation {
    pub entries: Vec<AssociationEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AssociationEntry {
    pub item_id: u32,
    pub associations: Vec<PropertyAssociation>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PropertyAssociation {
    pub property_index: u16,
    pub essential: bool,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ImageSpatialExtents {
    pub image_width: u32,
    pub image_height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ColourInformation {
    pub colour_type: FourCC,
    pub colour_primaries: u16,
    pub transfer_characteristics: u16,
    pub matrix_coefficients: u16,
    pub full_range_flag: bool,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PixelInformation {
    pub bits_per_channel: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RelativeLocation {
    pub horizontal_offset: u32,
    pub vertical_offset: u32,
}

/// irot; the angle is stored in quarter turns.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ImageRotation {
    pub angle: u8,
}

/// tsel
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrackSelection {
    pub switch_group: i32,
    pub attribute_list: Vec<FourCC>,
}

/// strk
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SubTrack {
    pub info: Child,
}

/// stri
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SubTrackInformation {
    pub switch_group: i16,
    pub alternate_group: i16,
    pub sub_track_id: u32,
    pub attribute_list: Vec<FourCC>,
}

/// ilst
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ItemList {
    pub tags: Vec<IsoBox>,
}

/// One iTunes metadata tag (`©nam`, `trkn`, `covr`, ...).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppleTag {
    pub data: Option<TagData>,
}

/// The `data` atom carried by a tag.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TagData {
    pub version: u8,
    pub flags: u32,
    pub data: Vec<u8>,
}
