//! XML trace of ISOBMFF box trees, with a placeholder schema of every
//! supported box type and exporters for 3GPP timed text tracks.

pub mod boxes;
pub mod dump;
pub mod registry;
pub mod render;
pub mod schema;
pub mod text;
pub mod util;

pub use boxes::{BoxBody, FourCC, IsoBox, ModelError, TreeDocument, box_from_reader};
pub use dump::{
    DumpError, Trace, dump_box, dump_box_expect, dump_file, dump_hint_sample, dump_isma_sample,
    dump_protected_entries,
};
pub use registry::{Registry, RegistryRow, default_registry};
pub use schema::dump_schema;
pub use text::{MediaSample, SampleSource, TextError, TextExportFormat, export_text};
