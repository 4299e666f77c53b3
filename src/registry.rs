//! Type registry: which renderer draws which box, and the synthesis hints
//! (subtype, version, flags) used when enumerating the schema.

use crate::boxes::{BoxBody, FourCC, IsoBox};
use crate::dump::{Result, Trace};
use crate::render::{fragment, hint, meta, movie, protection, sample_entry, sample_table, text};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Renderer signature shared by every box type.
pub type RenderFn = fn(&IsoBox, &mut Trace<'_>) -> Result<()>;

/// One registry entry.
///
/// `alt` disambiguates rows sharing a code (reference kinds, sample group
/// kinds, track group kinds); `max_version` and `flags` are forced onto the
/// synthetic node built for the schema.
#[derive(Clone, Copy)]
pub struct RegistryRow {
    pub code: FourCC,
    pub alt: Option<FourCC>,
    pub max_version: u8,
    pub flags: u32,
    func: RenderFn,
}

impl RegistryRow {
    pub fn new(code: &[u8; 4], func: RenderFn) -> Self {
        RegistryRow { code: FourCC::new(code), alt: None, max_version: 0, flags: 0, func }
    }

    pub fn alt(mut self, alt: &[u8; 4]) -> Self {
        self.alt = Some(FourCC::new(alt));
        self
    }

    pub fn max_version(mut self, v: u8) -> Self {
        self.max_version = v;
        self
    }

    pub fn flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    pub fn render(&self, b: &IsoBox, t: &mut Trace<'_>) -> Result<()> {
        (self.func)(b, t)
    }

    /// Default node for this row: size 0, with the subtype, version and
    /// flags of the row applied.
    pub fn synthesize(&self) -> IsoBox {
        let mut b = IsoBox::new(self.code);
        if let Some(alt) = self.alt {
            match &mut b.body {
                BoxBody::TrackReferenceType(r) => r.reference_type = alt,
                BoxBody::ItemReferenceType(r) => r.reference_type = alt,
                BoxBody::TrackGroupType(g) => g.group_type = alt,
                BoxBody::SampleGroupDescription(g) => g.grouping_type = alt,
                _ => {}
            }
        }
        b.version = self.max_version;
        b.flags = self.flags;
        b
    }
}

impl std::fmt::Debug for RegistryRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryRow")
            .field("code", &self.code)
            .field("alt", &self.alt)
            .field("max_version", &self.max_version)
            .field("flags", &format_args!("0x{:X}", self.flags))
            .finish()
    }
}

/// Ordered table of renderers.
///
/// Immutable once built; use [`Registry::with_renderer`] to build it
/// fluently. Live lookup returns the first row declared for a code.
pub struct Registry {
    rows: Vec<RegistryRow>,
    first: HashMap<FourCC, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self { rows: Vec::new(), first: HashMap::new() }
    }

    /// Return a new registry with `row` appended.
    pub fn with_renderer(mut self, row: RegistryRow) -> Self {
        self.first.entry(row.code).or_insert(self.rows.len());
        self.rows.push(row);
        self
    }

    pub fn lookup(&self, code: FourCC) -> Option<&RegistryRow> {
        self.first.get(&code).map(|&i| &self.rows[i])
    }

    /// Every row in declaration order.
    pub fn rows(&self) -> &[RegistryRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// The process wide registry of every supported box type.
pub fn default_registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(build)
}

fn build() -> Registry {
    use RegistryRow as R;

    let mut reg = Registry::new().with_renderer(R::new(b"UNKN", movie::unkn));
    for kind in [
        b"mpod", b"dpnd", b"sync", b"ipir", b"cdsc", b"hint", b"chap", b"sbas", b"scal", b"tbas",
        b"sabt", b"oref", b"font", b"hind", b"vdep", b"vplx", b"subt",
    ] {
        reg = reg.with_renderer(R::new(b"REFT", movie::reftype).alt(kind));
    }
    reg = reg
        .with_renderer(R::new(b"REFI", meta::ireftype).alt(b"tbas"))
        .with_renderer(R::new(b"REFI", meta::ireftype).alt(b"iloc"))
        .with_renderer(R::new(b"free", movie::free))
        .with_renderer(R::new(b"skip", movie::free))
        .with_renderer(R::new(b"mdat", movie::mdat))
        .with_renderer(R::new(b"moov", movie::moov))
        .with_renderer(R::new(b"mvhd", movie::mvhd).max_version(1))
        .with_renderer(R::new(b"mdhd", movie::mdhd).max_version(1))
        .with_renderer(R::new(b"vmhd", movie::vmhd))
        .with_renderer(R::new(b"smhd", movie::smhd))
        .with_renderer(R::new(b"hmhd", movie::hmhd))
        .with_renderer(R::new(b"odhd", movie::nmhd))
        .with_renderer(R::new(b"crhd", movie::nmhd))
        .with_renderer(R::new(b"sdhd", movie::nmhd))
        .with_renderer(R::new(b"nmhd", movie::nmhd))
        .with_renderer(R::new(b"sthd", movie::nmhd))
        .with_renderer(R::new(b"stbl", sample_table::stbl))
        .with_renderer(R::new(b"dinf", movie::dinf))
        .with_renderer(R::new(b"url ", movie::url))
        .with_renderer(R::new(b"urn ", movie::urn))
        .with_renderer(R::new(b"cprt", movie::cprt).max_version(1))
        .with_renderer(R::new(b"kind", movie::kind))
        .with_renderer(R::new(b"hdlr", movie::hdlr))
        .with_renderer(R::new(b"iods", movie::iods))
        .with_renderer(R::new(b"trak", movie::trak))
        .with_renderer(R::new(b"mp4s", sample_entry::mp4s))
        .with_renderer(R::new(b"mp4v", sample_entry::mp4v))
        .with_renderer(R::new(b"mp4a", sample_entry::mp4a))
        .with_renderer(R::new(b"gnrm", sample_entry::gnrm))
        .with_renderer(R::new(b"gnrv", sample_entry::gnrv))
        .with_renderer(R::new(b"gnra", sample_entry::gnra))
        .with_renderer(R::new(b"edts", movie::edts))
        .with_renderer(R::new(b"udta", movie::udta))
        .with_renderer(R::new(b"dref", movie::dref))
        .with_renderer(R::new(b"stsd", sample_table::stsd))
        .with_renderer(R::new(b"stts", sample_table::stts))
        .with_renderer(R::new(b"ctts", sample_table::ctts).max_version(1))
        .with_renderer(R::new(b"cslg", sample_table::cslg).max_version(1))
        .with_renderer(R::new(b"stsh", sample_table::stsh))
        .with_renderer(R::new(b"elst", movie::elst).max_version(1))
        .with_renderer(R::new(b"stsc", sample_table::stsc))
        .with_renderer(R::new(b"stz2", sample_table::stsz))
        .with_renderer(R::new(b"stsz", sample_table::stsz))
        .with_renderer(R::new(b"stco", sample_table::stco))
        .with_renderer(R::new(b"stss", sample_table::stss))
        .with_renderer(R::new(b"stdp", sample_table::stdp))
        .with_renderer(R::new(b"sdtp", sample_table::sdtp))
        .with_renderer(R::new(b"co64", sample_table::co64))
        .with_renderer(R::new(b"esds", movie::esds))
        .with_renderer(R::new(b"minf", movie::minf))
        .with_renderer(R::new(b"tkhd", movie::tkhd).max_version(1))
        .with_renderer(R::new(b"tref", movie::tref))
        .with_renderer(R::new(b"mdia", movie::mdia))
        .with_renderer(R::new(b"mfra", fragment::mfra))
        .with_renderer(R::new(b"tfra", fragment::tfra).max_version(1))
        .with_renderer(R::new(b"elng", movie::elng))
        .with_renderer(R::new(b"chpl", movie::chpl))
        .with_renderer(R::new(b"pdin", movie::pdin))
        .with_renderer(R::new(b"sbgp", sample_table::sbgp).max_version(1))
        .with_renderer(R::new(b"sgpd", sample_table::sgpd).max_version(2));
    for kind in [b"roll", b"seig", b"oinf", b"linf", b"trif", b"nalm"] {
        reg = reg.with_renderer(R::new(b"sgpd", sample_table::sgpd).alt(kind));
    }
    reg = reg
        .with_renderer(R::new(b"saiz", sample_table::saiz))
        .with_renderer(R::new(b"saiz", sample_table::saiz).flags(1))
        .with_renderer(R::new(b"saio", sample_table::saio))
        .with_renderer(R::new(b"saio", sample_table::saio).flags(1))
        .with_renderer(R::new(b"rtp ", hint::ghnt))
        .with_renderer(R::new(b"rtpo", hint::counter))
        .with_renderer(R::new(b"hnti", hint::hnti))
        .with_renderer(R::new(b"sdp ", hint::sdp))
        .with_renderer(R::new(b"hinf", hint::hinf))
        .with_renderer(R::new(b"rely", hint::rely));
    for code in [
        b"tims", b"tsro", b"snro", b"trpy", b"nump", b"totl", b"npck", b"tpyl", b"tpay",
    ] {
        reg = reg.with_renderer(R::new(code, hint::counter));
    }
    reg = reg.with_renderer(R::new(b"maxr", hint::maxr));
    for code in [b"dmed", b"dimm", b"drep", b"tmin", b"tmax", b"pmax", b"dmax"] {
        reg = reg.with_renderer(R::new(code, hint::counter));
    }
    reg = reg
        .with_renderer(R::new(b"payt", hint::payt))
        .with_renderer(R::new(b"name", hint::name))
        .with_renderer(R::new(b"ftyp", movie::ftyp))
        .with_renderer(R::new(b"styp", movie::ftyp))
        .with_renderer(R::new(b"padb", sample_table::padb))
        .with_renderer(R::new(b"mvex", fragment::mvex))
        .with_renderer(R::new(b"mehd", fragment::mehd).max_version(1))
        .with_renderer(R::new(b"trex", fragment::trex))
        .with_renderer(R::new(b"trep", fragment::trep))
        .with_renderer(R::new(b"moof", fragment::moof))
        .with_renderer(R::new(b"mfhd", fragment::mfhd))
        .with_renderer(R::new(b"traf", fragment::traf))
        // every optional field present
        .with_renderer(R::new(b"tfhd", fragment::tfhd).flags(0x0003_003B))
        .with_renderer(R::new(b"trun", fragment::trun).flags(0x0000_0F05))
        .with_renderer(R::new(b"tfdt", fragment::tfdt).max_version(1))
        .with_renderer(R::new(b"subs", sample_table::subs).max_version(1))
        .with_renderer(R::new(b"rvcc", sample_entry::rvcc))
        .with_renderer(R::new(b"trgr", movie::trgr))
        .with_renderer(R::new(b"TRGT", movie::trgt))
        .with_renderer(R::new(b"VOID", movie::void))
        .with_renderer(R::new(b"stsf", sample_table::stsf));
    for code in [b"samr", b"sawb", b"sqcp", b"sevc", b"ssmv"] {
        reg = reg.with_renderer(R::new(code, sample_entry::gppa));
    }
    reg = reg.with_renderer(R::new(b"s263", sample_entry::gppv));
    for code in [b"damr", b"devc", b"dqcp", b"dsmv", b"d263"] {
        reg = reg.with_renderer(R::new(code, sample_entry::gppc));
    }
    reg = reg
        .with_renderer(R::new(b"avcC", sample_entry::avcc))
        .with_renderer(R::new(b"svcC", sample_entry::avcc))
        .with_renderer(R::new(b"hvcC", sample_entry::hvcc))
        .with_renderer(R::new(b"lhvC", sample_entry::hvcc))
        .with_renderer(R::new(b"btrt", sample_entry::btrt))
        .with_renderer(R::new(b"m4ds", sample_entry::m4ds));
    for code in [
        b"avc1", b"avc2", b"avc3", b"avc4", b"svc1", b"hvc1", b"hev1", b"hvc2", b"hev2", b"lhv1",
        b"lhe1", b"hvt1",
    ] {
        reg = reg.with_renderer(R::new(code, sample_entry::mp4v));
    }
    reg.with_renderer(R::new(b"pasp", sample_entry::pasp))
        .with_renderer(R::new(b"ftab", text::ftab))
        .with_renderer(R::new(b"tx3g", text::tx3g))
        .with_renderer(R::new(b"text", text::text))
        .with_renderer(R::new(b"styl", text::styl))
        .with_renderer(R::new(b"hlit", text::hlit))
        .with_renderer(R::new(b"hclr", text::hclr))
        .with_renderer(R::new(b"krok", text::krok))
        .with_renderer(R::new(b"dlay", text::dlay))
        .with_renderer(R::new(b"href", text::href))
        .with_renderer(R::new(b"tbox", text::tbox))
        .with_renderer(R::new(b"blnk", text::blnk))
        .with_renderer(R::new(b"twrp", text::twrp))
        .with_renderer(R::new(b"pssh", protection::pssh))
        .with_renderer(R::new(b"tenc", protection::tenc))
        .with_renderer(R::new(b"iKMS", protection::ikms))
        .with_renderer(R::new(b"iSFM", protection::isfm))
        .with_renderer(R::new(b"meta", meta::meta))
        .with_renderer(R::new(b"xml ", meta::xml))
        .with_renderer(R::new(b"bxml", meta::bxml))
        .with_renderer(R::new(b"iloc", meta::iloc).max_version(2))
        .with_renderer(R::new(b"pitm", meta::pitm).max_version(1))
        .with_renderer(R::new(b"ipro", meta::ipro))
        .with_renderer(R::new(b"infe", meta::infe).max_version(1))
        .with_renderer(R::new(b"infe", meta::infe).max_version(2))
        .with_renderer(R::new(b"iinf", meta::iinf).max_version(1))
        .with_renderer(R::new(b"iref", meta::iref).max_version(1))
        .with_renderer(R::new(b"sinf", protection::sinf))
        .with_renderer(R::new(b"frma", protection::frma))
        .with_renderer(R::new(b"schm", protection::schm).flags(1))
        .with_renderer(R::new(b"schi", protection::schi))
        .with_renderer(R::new(b"enca", sample_entry::mp4a))
        .with_renderer(R::new(b"encv", sample_entry::mp4v))
        .with_renderer(R::new(b"encs", sample_entry::mp4s))
        .with_renderer(R::new(b"prft", fragment::prft).max_version(1))
        .with_renderer(R::new(b"\xA9nam", meta::apple_tag))
        .with_renderer(R::new(b"\xA9cmt", meta::apple_tag))
        .with_renderer(R::new(b"\xA9day", meta::apple_tag))
        .with_renderer(R::new(b"\xA9ART", meta::apple_tag))
        .with_renderer(R::new(b"\xA9trk", meta::apple_tag))
        .with_renderer(R::new(b"\xA9alb", meta::apple_tag))
        .with_renderer(R::new(b"\xA9com", meta::apple_tag))
        .with_renderer(R::new(b"\xA9wrt", meta::apple_tag))
        .with_renderer(R::new(b"\xA9too", meta::apple_tag))
        .with_renderer(R::new(b"\xA9cpy", meta::apple_tag))
        .with_renderer(R::new(b"\xA9des", meta::apple_tag))
        .with_renderer(R::new(b"\xA9gen", meta::apple_tag))
        .with_renderer(R::new(b"\xA9grp", meta::apple_tag))
        .with_renderer(R::new(b"gnre", meta::apple_tag))
        .with_renderer(R::new(b"disk", meta::apple_tag))
        .with_renderer(R::new(b"trkn", meta::apple_tag))
        .with_renderer(R::new(b"tmpo", meta::apple_tag))
        .with_renderer(R::new(b"cpil", meta::apple_tag))
        .with_renderer(R::new(b"covr", meta::apple_tag))
        .with_renderer(R::new(b"----", meta::apple_tag))
        .with_renderer(R::new(b"abst", fragment::abst))
        .with_renderer(R::new(b"afra", fragment::afra))
        .with_renderer(R::new(b"asrt", fragment::asrt))
        .with_renderer(R::new(b"afrt", fragment::afrt))
        .with_renderer(R::new(b"ilst", meta::ilst))
        .with_renderer(R::new(b"ohdr", protection::ohdr))
        .with_renderer(R::new(b"grpi", protection::grpi))
        .with_renderer(R::new(b"mdri", protection::mdri))
        .with_renderer(R::new(b"odtt", protection::odtt))
        .with_renderer(R::new(b"odrb", protection::odrb))
        .with_renderer(R::new(b"odkm", protection::odkm))
        .with_renderer(R::new(b"odaf", protection::isfm))
        .with_renderer(R::new(b"tsel", meta::tsel))
        .with_renderer(R::new(b"strk", meta::strk))
        .with_renderer(R::new(b"stri", meta::stri))
        .with_renderer(R::new(b"metx", sample_entry::metx))
        .with_renderer(R::new(b"mett", sample_entry::metx))
        .with_renderer(R::new(b"dims", sample_entry::dims))
        .with_renderer(R::new(b"dimC", sample_entry::dimc))
        .with_renderer(R::new(b"diST", sample_entry::dist))
        .with_renderer(R::new(b"ac-3", sample_entry::ac3))
        .with_renderer(R::new(b"dac3", sample_entry::dac3))
        .with_renderer(R::new(b"lsr1", sample_entry::lsr1))
        .with_renderer(R::new(b"lsrC", sample_entry::lsrc))
        .with_renderer(R::new(b"sidx", fragment::sidx).max_version(1))
        .with_renderer(R::new(b"ssix", fragment::ssix))
        .with_renderer(R::new(b"leva", fragment::leva))
        .with_renderer(R::new(b"pcrb", fragment::pcrb))
        .with_renderer(R::new(b"senc", protection::senc))
        .with_renderer(R::new(b"uuid", protection::uuid_ex))
        .with_renderer(R::new(b"stxt", sample_entry::metx))
        .with_renderer(R::new(b"txtC", sample_entry::txtc))
        .with_renderer(R::new(b"vttc", sample_entry::boxstring))
        .with_renderer(R::new(b"ctim", sample_entry::boxstring))
        .with_renderer(R::new(b"iden", sample_entry::boxstring))
        .with_renderer(R::new(b"sttg", sample_entry::boxstring))
        .with_renderer(R::new(b"payl", sample_entry::boxstring))
        .with_renderer(R::new(b"vtta", sample_entry::boxstring))
        .with_renderer(R::new(b"vtcu", sample_entry::vtcu))
        .with_renderer(R::new(b"vtte", sample_entry::vtte))
        .with_renderer(R::new(b"wvtt", sample_entry::wvtt))
        .with_renderer(R::new(b"stpp", sample_entry::metx))
        .with_renderer(R::new(b"sbtt", sample_entry::metx))
        .with_renderer(R::new(b"adkm", protection::adkm))
        .with_renderer(R::new(b"ahdr", protection::ahdr))
        .with_renderer(R::new(b"adaf", protection::adaf))
        .with_renderer(R::new(b"aprm", protection::aprm))
        .with_renderer(R::new(b"aeib", protection::aeib))
        .with_renderer(R::new(b"akey", protection::akey))
        .with_renderer(R::new(b"flxs", protection::flxs))
        .with_renderer(R::new(b"ispe", meta::ispe))
        .with_renderer(R::new(b"colr", meta::colr))
        .with_renderer(R::new(b"pixi", meta::pixi))
        .with_renderer(R::new(b"rloc", meta::rloc))
        .with_renderer(R::new(b"irot", meta::irot))
        .with_renderer(R::new(b"ipco", meta::ipco))
        .with_renderer(R::new(b"iprp", meta::iprp))
        .with_renderer(R::new(b"ipma", meta::ipma))
        .with_renderer(R::new(b"grpl", meta::grpl))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_first_row() {
        let reg = default_registry();
        let row = reg.lookup(FourCC::new(b"REFT")).unwrap();
        assert_eq!(row.alt, Some(FourCC::new(b"mpod")));
        let row = reg.lookup(FourCC::new(b"infe")).unwrap();
        assert_eq!(row.max_version, 1);
    }

    #[test]
    fn synthesized_node_carries_row_hints() {
        let reg = default_registry();
        let row = reg
            .rows()
            .iter()
            .find(|r| r.code == FourCC::new(b"sgpd") && r.alt == Some(FourCC::new(b"seig")))
            .unwrap();
        let b = row.synthesize();
        assert_eq!(b.size, 0);
        match b.body {
            BoxBody::SampleGroupDescription(g) => assert_eq!(g.grouping_type, FourCC::new(b"seig")),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn track_group_row_has_no_alternate_code() {
        let row = default_registry().lookup(FourCC::new(b"TRGT")).unwrap();
        assert_eq!(row.alt, None);
        match row.synthesize().body {
            BoxBody::TrackGroupType(g) => assert_eq!(g.group_type, FourCC::default()),
            other => panic!("unexpected body {other:?}"),
        }
    }
}
