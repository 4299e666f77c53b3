//! In-memory node tree handed to the tracer.
//!
//! The tree is produced by an external parser (or loaded from JSON) and is
//! only ever borrowed immutably while rendering.

use std::fmt;

pub mod fragment;
pub mod hint;
pub mod meta;
pub mod movie;
pub mod protection;
pub mod sample_entry;
pub mod sample_table;
pub mod text;

pub use fragment::*;
pub use hint::*;
pub use meta::*;
pub use movie::*;
pub use protection::*;
pub use sample_entry::*;
pub use sample_table::*;
pub use text::*;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const fn new(code: &[u8; 4]) -> Self {
        FourCC(*code)
    }

    /// Parse a four character code. Characters up to U+00FF map to one byte
    /// each, so `©nam` is accepted.
    pub fn from_str(s: &str) -> Option<Self> {
        let mut out = [0u8; 4];
        let mut n = 0;
        for c in s.chars() {
            if n == 4 || (c as u32) > 0xFF {
                return None;
            }
            out[n] = c as u32 as u8;
            n += 1;
        }
        if n == 4 { Some(FourCC(out)) } else { None }
    }

    pub fn from_u32(v: u32) -> Self {
        FourCC(v.to_be_bytes())
    }

    pub fn as_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 4]
    }

    /// Printable form: Latin-1 for high bytes, `.` for control bytes.
    pub fn as_str_lossy(&self) -> String {
        self.0
            .iter()
            .map(|&c| match c {
                32..=126 | 0xA0..=0xFF => c as char,
                _ => '.',
            })
            .collect()
    }

    fn as_latin1(&self) -> String {
        self.0.iter().map(|&c| c as char).collect()
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

impl serde::Serialize for FourCC {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.as_latin1())
    }
}

impl<'de> serde::Deserialize<'de> for FourCC {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        FourCC::from_str(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid four character code {s:?}")))
    }
}

// ---------- Type codes ----------

/// Well known type codes, including the internal pseudo codes used to give
/// shared on-disk codes a distinct logical identity.
pub mod codes {
    use super::FourCC;

    pub const UNKN: FourCC = FourCC::new(b"UNKN");
    pub const REFT: FourCC = FourCC::new(b"REFT");
    pub const REFI: FourCC = FourCC::new(b"REFI");
    pub const TRGT: FourCC = FourCC::new(b"TRGT");
    pub const VOID: FourCC = FourCC::new(b"VOID");
    pub const UUID: FourCC = FourCC::new(b"uuid");

    pub const FTYP: FourCC = FourCC::new(b"ftyp");
    pub const MOOV: FourCC = FourCC::new(b"moov");
    pub const TRAK: FourCC = FourCC::new(b"trak");
    pub const STSD: FourCC = FourCC::new(b"stsd");
    pub const RTP: FourCC = FourCC::new(b"rtp ");

    pub const ENCA: FourCC = FourCC::new(b"enca");
    pub const ENCV: FourCC = FourCC::new(b"encv");
    pub const ENCT: FourCC = FourCC::new(b"enct");
    pub const ENCS: FourCC = FourCC::new(b"encs");

    pub const TX3G: FourCC = FourCC::new(b"tx3g");
    pub const TEXT: FourCC = FourCC::new(b"text");
    pub const SBTL: FourCC = FourCC::new(b"sbtl");
}

// ---------- Errors ----------

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid node tree: {0}")]
    Json(#[from] serde_json::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------- Node ----------

/// One node of the box tree.
///
/// `version` and `flags` are only meaningful for full boxes. `other_boxes`
/// holds children the parser did not attach to a typed field; they are
/// rendered after the typed content, just before the closing tag.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct IsoBox {
    #[serde(rename = "type")]
    pub typ: FourCC,
    pub size: u64,
    pub version: u8,
    pub flags: u32,
    #[serde(with = "uuid_hex", skip_serializing_if = "Option::is_none")]
    pub uuid: Option<[u8; 16]>,
    pub body: BoxBody,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub other_boxes: Vec<IsoBox>,
}

impl IsoBox {
    /// Default synthetic node for `code`: size 0, version 0, flags 0 and the
    /// default payload of the variant registered for that code.
    pub fn new(code: FourCC) -> Self {
        IsoBox {
            typ: code,
            body: BoxBody::for_code(code),
            ..Default::default()
        }
    }

    pub fn with_body(code: FourCC, size: u64, body: BoxBody) -> Self {
        IsoBox { typ: code, size, body, ..Default::default() }
    }

    /// The `trak` children of a `moov`; empty for any other box.
    pub fn tracks(&self) -> &[IsoBox] {
        match &self.body {
            BoxBody::Movie(m) => &m.tracks,
            _ => &[],
        }
    }

    /// Replace missing payloads (an `Empty` body on a code that owns one)
    /// with the default payload, recursively.
    pub fn normalize(&mut self) {
        if matches!(self.body, BoxBody::Empty) {
            self.body = BoxBody::for_code(self.typ);
        }
        self.body.for_each_child_mut(&mut |b| b.normalize());
        for b in &mut self.other_boxes {
            b.normalize();
        }
    }
}

/// Named list of top level boxes, the unit the `mp4dump` binary reads.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TreeDocument {
    pub name: String,
    pub boxes: Vec<IsoBox>,
}

impl TreeDocument {
    pub fn from_reader<R: std::io::Read>(r: R) -> Result<Self, ModelError> {
        let mut doc: TreeDocument = serde_json::from_reader(r)?;
        for b in &mut doc.boxes {
            b.normalize();
        }
        Ok(doc)
    }
}

/// Load a single node (for example a `trak`) from JSON.
pub fn box_from_reader<R: std::io::Read>(r: R) -> Result<IsoBox, ModelError> {
    let mut b: IsoBox = serde_json::from_reader(r)?;
    b.normalize();
    Ok(b)
}

mod uuid_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &Option<[u8; 16]>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(u) => s.serialize_str(&hex::encode_upper(u)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<[u8; 16]>, D::Error> {
        let s: Option<String> = Option::deserialize(d)?;
        let Some(s) = s else { return Ok(None) };
        let mut out = [0u8; 16];
        hex::decode_to_slice(s.replace('-', ""), &mut out).map_err(serde::de::Error::custom)?;
        Ok(Some(out))
    }
}

// ---------- Payloads ----------

/// Typed payload of a node. One variant per payload layout; several codes
/// may share a layout (and a renderer).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum BoxBody {
    /// No typed fields; children, if any, live in `other_boxes`.
    #[default]
    Empty,

    // movie structure
    FreeSpace(FreeSpace),
    MediaData(MediaData),
    Unknown(UnknownBox),
    UnknownUuid(RawData),
    Movie(Movie),
    MovieHeader(MovieHeader),
    MediaHeader(MediaHeader),
    HintMediaHeader(HintMediaHeader),
    Track(Track),
    TrackHeader(TrackHeader),
    TrackReferenceType(TrackReferenceType),
    Media(Media),
    MediaInformation(MediaInformation),
    DataInformation(DataInformation),
    DataEntryUrl(DataEntryUrl),
    DataEntryUrn(DataEntryUrn),
    Handler(Handler),
    Edit(Edit),
    EditList(EditList),
    UserData(UserData),
    Copyright(Copyright),
    Kind(Kind),
    ExtendedLanguage(ExtendedLanguage),
    ChapterList(ChapterList),
    ProgressiveDownload(ProgressiveDownload),
    Descriptor(DescriptorBox),
    FileType(FileType),
    TrackGroup(TrackGroup),
    TrackGroupType(TrackGroupType),

    // sample tables
    SampleTable(SampleTable),
    TimeToSample(TimeToSample),
    CompositionOffset(CompositionOffset),
    CompositionToDecode(CompositionToDecode),
    ShadowSync(ShadowSync),
    SampleToChunk(SampleToChunk),
    SampleSize(SampleSize),
    ChunkOffset(ChunkOffset),
    ChunkLargeOffset(ChunkLargeOffset),
    SyncSample(SyncSample),
    DegradationPriority(DegradationPriority),
    SampleDependencyType(SampleDependencyType),
    PaddingBits(PaddingBits),
    SampleFragment(SampleFragment),
    SubSampleInformation(SubSampleInformation),
    SampleGroup(SampleGroup),
    SampleGroupDescription(SampleGroupDescription),
    SampleAuxInfoSizes(SampleAuxInfoSizes),
    SampleAuxInfoOffsets(SampleAuxInfoOffsets),

    // sample entries and decoder configuration
    MpegSampleEntry(MpegSampleEntry),
    VisualSampleEntry(VisualSampleEntry),
    AudioSampleEntry(AudioSampleEntry),
    GenericSampleEntry(GenericSampleEntry),
    GenericVisualSampleEntry(GenericVisualSampleEntry),
    GenericAudioSampleEntry(GenericAudioSampleEntry),
    GppConfig(GppConfig),
    AvcConfig(AvcConfig),
    HevcConfig(HevcConfig),
    BitRate(BitRate),
    ExtensionDescriptors(ExtensionDescriptors),
    PixelAspectRatio(PixelAspectRatio),
    RvcConfig(RvcConfig),
    MetaDataSampleEntry(MetaDataSampleEntry),
    TextConfig(TextConfig),
    DimsSampleEntry(DimsSampleEntry),
    DimsSceneConfig(DimsSceneConfig),
    DimsScriptTypes(DimsScriptTypes),
    Ac3Config(Ac3Config),
    LaserConfig(LaserConfig),
    LaserSampleEntry(LaserSampleEntry),
    StringBox(StringBox),
    WebVttSampleEntry(WebVttSampleEntry),

    // timed text
    FontTable(FontTable),
    Tx3gSampleEntry(Tx3gSampleEntry),
    TextSampleEntry(TextSampleEntry),
    TextStyle(TextStyle),
    TextHighlight(TextHighlight),
    TextHighlightColor(TextHighlightColor),
    TextKaraoke(TextKaraoke),
    TextScrollDelay(TextScrollDelay),
    TextHyperText(TextHyperText),
    TextBox(TextBoxRecord),
    TextBlink(TextBlink),
    TextWrap(TextWrap),

    // fragments and segments
    MovieExtends(MovieExtends),
    MovieExtendsHeader(MovieExtendsHeader),
    TrackExtends(TrackExtends),
    TrackExtensionProperties(TrackExtensionProperties),
    MovieFragment(MovieFragment),
    MovieFragmentHeader(MovieFragmentHeader),
    TrackFragment(TrackFragment),
    TrackFragmentHeader(TrackFragmentHeader),
    TrackFragmentDecodeTime(TrackFragmentDecodeTime),
    TrackRun(TrackRun),
    MovieFragmentRandomAccess(MovieFragmentRandomAccess),
    TrackFragmentRandomAccess(TrackFragmentRandomAccess),
    SegmentIndex(SegmentIndex),
    SubsegmentIndex(SubsegmentIndex),
    LevelAssignment(LevelAssignment),
    PcrInfo(PcrInfo),
    ProducerReferenceTime(ProducerReferenceTime),
    MssTimeExtension(MssTimeExtension),
    AdobeBootstrapInfo(AdobeBootstrapInfo),
    AdobeFragmentRandomAccess(AdobeFragmentRandomAccess),
    AdobeSegmentRunTable(AdobeSegmentRunTable),
    AdobeFragmentRunTable(AdobeFragmentRunTable),

    // protection
    ProtectionInfo(ProtectionInfo),
    OriginalFormat(OriginalFormat),
    SchemeType(SchemeType),
    SchemeInformation(SchemeInformation),
    IsmaKms(IsmaKms),
    IsmaSampleFormat(IsmaSampleFormat),
    ProtectionSystemHeader(ProtectionSystemHeader),
    TrackEncryption(TrackEncryption),
    SampleEncryption(SampleEncryption),
    PiffTrackEncryption(PiffTrackEncryption),
    PiffSampleEncryption(PiffSampleEncryption),
    PiffProtectionSystemHeader(PiffProtectionSystemHeader),
    OmaCommonHeaders(OmaCommonHeaders),
    OmaGroupId(OmaGroupId),
    OmaTransactionTracking(OmaTransactionTracking),
    OmaRightsObject(OmaRightsObject),
    OmaKeyManagement(OmaKeyManagement),
    AdobeKeyManagement(AdobeKeyManagement),
    AdobeDrmHeader(AdobeDrmHeader),
    AdobeDrmAuFormat(AdobeDrmAuFormat),
    AdobeStdEncParams(AdobeStdEncParams),
    AdobeEncryptionInfo(AdobeEncryptionInfo),
    AdobeKeyInfo(AdobeKeyInfo),
    AdobeFlashAccessParams(AdobeFlashAccessParams),

    // meta, items, HEIF
    Meta(Meta),
    Xml(XmlBox),
    BinaryXml(BinaryXml),
    PrimaryItem(PrimaryItem),
    ItemProtection(ItemProtection),
    ItemInfoEntry(ItemInfoEntry),
    ItemInfo(ItemInfo),
    ItemLocation(ItemLocation),
    ItemReference(ItemReference),
    ItemReferenceType(ItemReferenceType),
    ItemProperties(ItemProperties),
    ItemPropertyAssociation(ItemPropertyAssociation),
    ImageSpatialExtents(ImageSpatialExtents),
    ColourInformation(ColourInformation),
    PixelInformation(PixelInformation),
    RelativeLocation(RelativeLocation),
    ImageRotation(ImageRotation),
    TrackSelection(TrackSelection),
    SubTrack(SubTrack),
    SubTrackInformation(SubTrackInformation),
    ItemList(ItemList),
    AppleTag(AppleTag),

    // hinting
    HintSampleEntry(HintSampleEntry),
    RtpInfo(RtpInfo),
    Sdp(Sdp),
    HintCounter(HintCounter),
    MaxDataRate(MaxDataRate),
    PayloadType(PayloadType),
    HintName(HintName),
    RelyHint(RelyHint),
}

impl BoxBody {
    /// Default payload for the variant registered under `code`.
    pub fn for_code(code: FourCC) -> BoxBody {
        use BoxBody as B;
        match &code.0 {
            b"UNKN" => B::Unknown(Default::default()),
            b"REFT" => B::TrackReferenceType(Default::default()),
            b"REFI" => B::ItemReferenceType(Default::default()),
            b"TRGT" => B::TrackGroupType(Default::default()),
            b"uuid" => B::UnknownUuid(Default::default()),
            b"free" | b"skip" => B::FreeSpace(Default::default()),
            b"mdat" => B::MediaData(Default::default()),
            b"moov" => B::Movie(Default::default()),
            b"mvhd" => B::MovieHeader(Default::default()),
            b"mdhd" => B::MediaHeader(Default::default()),
            b"hmhd" => B::HintMediaHeader(Default::default()),
            b"trak" => B::Track(Default::default()),
            b"tkhd" => B::TrackHeader(Default::default()),
            b"mdia" => B::Media(Default::default()),
            b"minf" => B::MediaInformation(Default::default()),
            b"dinf" => B::DataInformation(Default::default()),
            b"url " => B::DataEntryUrl(Default::default()),
            b"urn " => B::DataEntryUrn(Default::default()),
            b"hdlr" => B::Handler(Default::default()),
            b"edts" => B::Edit(Default::default()),
            b"elst" => B::EditList(Default::default()),
            b"udta" => B::UserData(Default::default()),
            b"cprt" => B::Copyright(Default::default()),
            b"kind" => B::Kind(Default::default()),
            b"elng" => B::ExtendedLanguage(Default::default()),
            b"chpl" => B::ChapterList(Default::default()),
            b"pdin" => B::ProgressiveDownload(Default::default()),
            b"iods" | b"esds" => B::Descriptor(Default::default()),
            b"ftyp" | b"styp" => B::FileType(Default::default()),
            b"trgr" => B::TrackGroup(Default::default()),

            b"stbl" => B::SampleTable(Default::default()),
            b"stts" => B::TimeToSample(Default::default()),
            b"ctts" => B::CompositionOffset(Default::default()),
            b"cslg" => B::CompositionToDecode(Default::default()),
            b"stsh" => B::ShadowSync(Default::default()),
            b"stsc" => B::SampleToChunk(Default::default()),
            b"stsz" | b"stz2" => B::SampleSize(Default::default()),
            b"stco" => B::ChunkOffset(Default::default()),
            b"co64" => B::ChunkLargeOffset(Default::default()),
            b"stss" => B::SyncSample(Default::default()),
            b"stdp" => B::DegradationPriority(Default::default()),
            b"sdtp" => B::SampleDependencyType(Default::default()),
            b"padb" => B::PaddingBits(Default::default()),
            b"stsf" => B::SampleFragment(Default::default()),
            b"subs" => B::SubSampleInformation(Default::default()),
            b"sbgp" => B::SampleGroup(Default::default()),
            b"sgpd" => B::SampleGroupDescription(Default::default()),
            b"saiz" => B::SampleAuxInfoSizes(Default::default()),
            b"saio" => B::SampleAuxInfoOffsets(Default::default()),

            b"mp4s" | b"encs" => B::MpegSampleEntry(Default::default()),
            b"mp4v" | b"encv" | b"s263" | b"avc1" | b"avc2" | b"avc3" | b"avc4" | b"svc1"
            | b"hvc1" | b"hev1" | b"hvc2" | b"hev2" | b"lhv1" | b"lhe1" | b"hvt1" => {
                B::VisualSampleEntry(Default::default())
            }
            b"mp4a" | b"enca" | b"samr" | b"sawb" | b"sqcp" | b"sevc" | b"ssmv" | b"ac-3"
            | b"ec-3" => B::AudioSampleEntry(Default::default()),
            b"gnrm" => B::GenericSampleEntry(Default::default()),
            b"gnrv" => B::GenericVisualSampleEntry(Default::default()),
            b"gnra" => B::GenericAudioSampleEntry(Default::default()),
            b"damr" | b"devc" | b"dqcp" | b"dsmv" | b"d263" => B::GppConfig(Default::default()),
            b"avcC" | b"svcC" => B::AvcConfig(Default::default()),
            b"hvcC" | b"lhvC" => B::HevcConfig(Default::default()),
            b"btrt" => B::BitRate(Default::default()),
            b"m4ds" => B::ExtensionDescriptors(Default::default()),
            b"pasp" => B::PixelAspectRatio(Default::default()),
            b"rvcc" => B::RvcConfig(Default::default()),
            b"metx" | b"mett" | b"stxt" | b"stpp" | b"sbtt" => {
                B::MetaDataSampleEntry(Default::default())
            }
            b"txtC" => B::TextConfig(Default::default()),
            b"dims" => B::DimsSampleEntry(Default::default()),
            b"dimC" => B::DimsSceneConfig(Default::default()),
            b"diST" => B::DimsScriptTypes(Default::default()),
            b"dac3" | b"dec3" => B::Ac3Config(Default::default()),
            b"lsrC" => B::LaserConfig(Default::default()),
            b"lsr1" => B::LaserSampleEntry(Default::default()),
            b"vttc" | b"ctim" | b"iden" | b"sttg" | b"payl" | b"vtta" => {
                B::StringBox(Default::default())
            }
            b"wvtt" => B::WebVttSampleEntry(Default::default()),

            b"ftab" => B::FontTable(Default::default()),
            b"tx3g" => B::Tx3gSampleEntry(Default::default()),
            b"text" => B::TextSampleEntry(Default::default()),
            b"styl" => B::TextStyle(Default::default()),
            b"hlit" => B::TextHighlight(Default::default()),
            b"hclr" => B::TextHighlightColor(Default::default()),
            b"krok" => B::TextKaraoke(Default::default()),
            b"dlay" => B::TextScrollDelay(Default::default()),
            b"href" => B::TextHyperText(Default::default()),
            b"tbox" => B::TextBox(Default::default()),
            b"blnk" => B::TextBlink(Default::default()),
            b"twrp" => B::TextWrap(Default::default()),

            b"mvex" => B::MovieExtends(Default::default()),
            b"mehd" => B::MovieExtendsHeader(Default::default()),
            b"trex" => B::TrackExtends(Default::default()),
            b"trep" => B::TrackExtensionProperties(Default::default()),
            b"moof" => B::MovieFragment(Default::default()),
            b"mfhd" => B::MovieFragmentHeader(Default::default()),
            b"traf" => B::TrackFragment(Default::default()),
            b"tfhd" => B::TrackFragmentHeader(Default::default()),
            b"tfdt" => B::TrackFragmentDecodeTime(Default::default()),
            b"trun" => B::TrackRun(Default::default()),
            b"mfra" => B::MovieFragmentRandomAccess(Default::default()),
            b"tfra" => B::TrackFragmentRandomAccess(Default::default()),
            b"sidx" => B::SegmentIndex(Default::default()),
            b"ssix" => B::SubsegmentIndex(Default::default()),
            b"leva" => B::LevelAssignment(Default::default()),
            b"pcrb" => B::PcrInfo(Default::default()),
            b"prft" => B::ProducerReferenceTime(Default::default()),
            b"abst" => B::AdobeBootstrapInfo(Default::default()),
            b"afra" => B::AdobeFragmentRandomAccess(Default::default()),
            b"asrt" => B::AdobeSegmentRunTable(Default::default()),
            b"afrt" => B::AdobeFragmentRunTable(Default::default()),

            b"sinf" => B::ProtectionInfo(Default::default()),
            b"frma" => B::OriginalFormat(Default::default()),
            b"schm" => B::SchemeType(Default::default()),
            b"schi" => B::SchemeInformation(Default::default()),
            b"iKMS" => B::IsmaKms(Default::default()),
            b"iSFM" | b"odaf" => B::IsmaSampleFormat(Default::default()),
            b"pssh" => B::ProtectionSystemHeader(Default::default()),
            b"tenc" => B::TrackEncryption(Default::default()),
            b"senc" => B::SampleEncryption(Default::default()),
            b"ohdr" => B::OmaCommonHeaders(Default::default()),
            b"grpi" => B::OmaGroupId(Default::default()),
            b"odtt" => B::OmaTransactionTracking(Default::default()),
            b"odrb" => B::OmaRightsObject(Default::default()),
            b"odkm" => B::OmaKeyManagement(Default::default()),
            b"adkm" => B::AdobeKeyManagement(Default::default()),
            b"ahdr" => B::AdobeDrmHeader(Default::default()),
            b"adaf" => B::AdobeDrmAuFormat(Default::default()),
            b"aprm" => B::AdobeStdEncParams(Default::default()),
            b"aeib" => B::AdobeEncryptionInfo(Default::default()),
            b"akey" => B::AdobeKeyInfo(Default::default()),
            b"flxs" => B::AdobeFlashAccessParams(Default::default()),

            b"meta" => B::Meta(Default::default()),
            b"xml " => B::Xml(Default::default()),
            b"bxml" => B::BinaryXml(Default::default()),
            b"pitm" => B::PrimaryItem(Default::default()),
            b"ipro" => B::ItemProtection(Default::default()),
            b"infe" => B::ItemInfoEntry(Default::default()),
            b"iinf" => B::ItemInfo(Default::default()),
            b"iloc" => B::ItemLocation(Default::default()),
            b"iref" => B::ItemReference(Default::default()),
            b"iprp" => B::ItemProperties(Default::default()),
            b"ipma" => B::ItemPropertyAssociation(Default::default()),
            b"ispe" => B::ImageSpatialExtents(Default::default()),
            b"colr" => B::ColourInformation(Default::default()),
            b"pixi" => B::PixelInformation(Default::default()),
            b"rloc" => B::RelativeLocation(Default::default()),
            b"irot" => B::ImageRotation(Default::default()),
            b"tsel" => B::TrackSelection(Default::default()),
            b"strk" => B::SubTrack(Default::default()),
            b"stri" => B::SubTrackInformation(Default::default()),
            b"ilst" => B::ItemList(Default::default()),
            [0xA9, b'n', b'a', b'm']
            | [0xA9, b'c', b'm', b't']
            | [0xA9, b'd', b'a', b'y']
            | [0xA9, b'A', b'R', b'T']
            | [0xA9, b't', b'r', b'k']
            | [0xA9, b'a', b'l', b'b']
            | [0xA9, b'c', b'o', b'm']
            | [0xA9, b'w', b'r', b't']
            | [0xA9, b't', b'o', b'o']
            | [0xA9, b'c', b'p', b'y']
            | [0xA9, b'd', b'e', b's']
            | [0xA9, b'g', b'e', b'n']
            | [0xA9, b'g', b'r', b'p']
            | b"gnre" | b"disk" | b"trkn" | b"tmpo" | b"cpil" | b"covr" | b"----" => {
                B::AppleTag(Default::default())
            }

            b"rtp " => B::HintSampleEntry(Default::default()),
            b"sdp " => B::Sdp(Default::default()),
            b"trpy" | b"totl" | b"nump" | b"npck" | b"tpyl" | b"tpay" | b"dmed" | b"dimm"
            | b"drep" | b"tmin" | b"tmax" | b"pmax" | b"dmax" | b"snro" | b"tims" | b"tsro"
            | b"rtpo" => B::HintCounter(Default::default()),
            b"maxr" => B::MaxDataRate(Default::default()),
            b"payt" => B::PayloadType(Default::default()),
            b"name" => B::HintName(Default::default()),
            b"rely" => B::RelyHint(Default::default()),

            _ => B::Empty,
        }
    }

    /// Visit every typed child node (not `other_boxes`).
    pub fn for_each_child_mut(&mut self, f: &mut dyn FnMut(&mut IsoBox)) {
        fn opt(b: &mut Option<Box<IsoBox>>, f: &mut dyn FnMut(&mut IsoBox)) {
            if let Some(b) = b {
                f(b);
            }
        }
        fn list(l: &mut [IsoBox], f: &mut dyn FnMut(&mut IsoBox)) {
            l.iter_mut().for_each(|b| f(b));
        }
        use BoxBody as B;
        match self {
            B::Movie(m) => {
                opt(&mut m.iods, f);
                opt(&mut m.meta, f);
                opt(&mut m.mvhd, f);
                opt(&mut m.mvex, f);
                list(&mut m.tracks, f);
                opt(&mut m.udta, f);
            }
            B::Track(t) => {
                opt(&mut t.tkhd, f);
                opt(&mut t.tref, f);
                opt(&mut t.meta, f);
                opt(&mut t.edts, f);
                opt(&mut t.mdia, f);
                opt(&mut t.trgr, f);
                opt(&mut t.udta, f);
            }
            B::Media(m) => {
                opt(&mut m.mdhd, f);
                opt(&mut m.hdlr, f);
                opt(&mut m.minf, f);
            }
            B::MediaInformation(m) => {
                opt(&mut m.header, f);
                opt(&mut m.dinf, f);
                opt(&mut m.stbl, f);
            }
            B::DataInformation(d) => opt(&mut d.dref, f),
            B::Edit(e) => opt(&mut e.elst, f),
            B::UserData(u) => list(&mut u.records, f),
            B::TrackGroup(g) => list(&mut g.groups, f),
            B::SampleTable(s) => {
                for b in [
                    &mut s.stsd, &mut s.stts, &mut s.ctts, &mut s.cslg, &mut s.stss,
                    &mut s.stsh, &mut s.stsc, &mut s.stsz, &mut s.stco, &mut s.stdp,
                    &mut s.sdtp, &mut s.padb, &mut s.stsf,
                ] {
                    opt(b, f);
                }
                list(&mut s.subs, f);
                list(&mut s.sgpd, f);
                list(&mut s.sbgp, f);
                list(&mut s.saiz, f);
                list(&mut s.saio, f);
            }
            B::MpegSampleEntry(e) => {
                opt(&mut e.esd, f);
                list(&mut e.protections, f);
            }
            B::VisualSampleEntry(e) => {
                for b in [
                    &mut e.esd, &mut e.hevc_config, &mut e.avc_config, &mut e.ipod_ext,
                    &mut e.descr, &mut e.svc_config, &mut e.lhvc_config, &mut e.info,
                    &mut e.pasp, &mut e.rvcc,
                ] {
                    opt(b, f);
                }
                list(&mut e.protections, f);
            }
            B::AudioSampleEntry(e) => {
                opt(&mut e.esd, f);
                opt(&mut e.info, f);
                list(&mut e.protections, f);
            }
            B::MetaDataSampleEntry(e) => {
                opt(&mut e.config, f);
                list(&mut e.protections, f);
            }
            B::DimsSampleEntry(e) => {
                opt(&mut e.config, f);
                opt(&mut e.scripts, f);
                list(&mut e.protections, f);
            }
            B::LaserSampleEntry(e) => {
                opt(&mut e.lsr_config, f);
                opt(&mut e.descr, f);
            }
            B::WebVttSampleEntry(e) => opt(&mut e.config, f),
            B::Tx3gSampleEntry(e) => opt(&mut e.font_table, f),
            B::MovieExtends(m) => {
                opt(&mut m.mehd, f);
                list(&mut m.trex, f);
                list(&mut m.trep, f);
            }
            B::MovieFragment(m) => {
                opt(&mut m.mfhd, f);
                list(&mut m.trafs, f);
            }
            B::TrackFragment(t) => {
                for b in [
                    &mut t.tfhd, &mut t.sdtp, &mut t.tfdt, &mut t.piff_sample_encryption,
                    &mut t.sample_encryption,
                ] {
                    opt(b, f);
                }
                for l in [
                    &mut t.subs, &mut t.sgpd, &mut t.sbgp, &mut t.truns, &mut t.saiz,
                    &mut t.saio,
                ] {
                    list(l, f);
                }
            }
            B::MovieFragmentRandomAccess(m) => list(&mut m.tfra, f),
            B::AdobeBootstrapInfo(a) => {
                list(&mut a.segment_run_tables, f);
                list(&mut a.fragment_run_tables, f);
            }
            B::ProtectionInfo(p) => {
                opt(&mut p.original_format, f);
                opt(&mut p.scheme_type, f);
                opt(&mut p.info, f);
            }
            B::SchemeInformation(s) => {
                for b in [&mut s.ikms, &mut s.isfm, &mut s.okms, &mut s.tenc, &mut s.adkm] {
                    opt(b, f);
                }
            }
            B::OmaKeyManagement(o) => {
                opt(&mut o.hdr, f);
                opt(&mut o.fmt, f);
            }
            B::OmaCommonHeaders(o) => list(&mut o.extensions, f),
            B::AdobeKeyManagement(a) => {
                opt(&mut a.header, f);
                opt(&mut a.au_format, f);
            }
            B::AdobeDrmHeader(a) => opt(&mut a.std_enc_params, f),
            B::AdobeStdEncParams(a) => {
                opt(&mut a.enc_info, f);
                opt(&mut a.key_info, f);
            }
            B::AdobeKeyInfo(a) => opt(&mut a.params, f),
            B::Meta(m) => {
                for b in [
                    &mut m.handler, &mut m.primary_resource, &mut m.file_locations,
                    &mut m.item_locations, &mut m.protections, &mut m.item_infos,
                    &mut m.ipmp_control, &mut m.item_refs, &mut m.item_props,
                ] {
                    opt(b, f);
                }
            }
            B::ItemProtection(p) => list(&mut p.protection_information, f),
            B::ItemInfo(i) => list(&mut i.item_infos, f),
            B::ItemReference(r) => list(&mut r.references, f),
            B::ItemProperties(p) => opt(&mut p.property_container, f),
            B::SubTrack(s) => opt(&mut s.info, f),
            B::ItemList(l) => list(&mut l.tags, f),
            B::HintSampleEntry(h) => list(&mut h.hint_data_table, f),
            _ => {}
        }
    }
}

/// Raw payload bytes of a node the tracer does not interpret.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RawData {
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourcc_latin1_roundtrip() {
        let c = FourCC([0xA9, b'n', b'a', b'm']);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"©nam\"");
        let back: FourCC = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn normalize_fills_missing_body() {
        let mut b: IsoBox = serde_json::from_str(r#"{"type":"mvhd","size":108}"#).unwrap();
        b.normalize();
        assert!(matches!(b.body, BoxBody::MovieHeader(_)));
    }
}
