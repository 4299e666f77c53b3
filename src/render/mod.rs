//! Per-type renderers, one function per registry row.
//!
//! Every renderer writes exactly one root element (or nothing, for the
//! reference kinds without a kind). A node of size 0 is a placeholder: list
//! valued fields then render a single exemplar entry with empty attributes.

use crate::boxes::{FourCC, IsoBox};
use crate::dump::{Result, Trace};
use std::io::Write;

/// Borrow the typed payload of `$b`, failing the node when the payload
/// does not have the expected layout.
macro_rules! body {
    ($b:expr, $variant:ident) => {
        match &$b.body {
            $crate::boxes::BoxBody::$variant(p) => p,
            _ => return Err($crate::dump::mismatch($b)),
        }
    };
}

pub mod fragment;
pub mod hint;
pub mod meta;
pub mod movie;
pub mod protection;
pub mod sample_entry;
pub mod sample_table;
pub mod text;

/// A child the format requires. A missing one is reported with a null
/// comment, except under a placeholder parent where it is simply omitted.
pub(crate) fn required(
    t: &mut Trace<'_>,
    parent: &IsoBox,
    child: Option<&IsoBox>,
    code: &[u8; 4],
) -> Result<()> {
    if parent.size > 0 || child.is_some() {
        t.child_expect(child, FourCC::new(code))?;
    }
    Ok(())
}

/// Header plus full box attributes.
pub(crate) fn open_full(t: &mut Trace<'_>, name: &str, b: &IsoBox) -> Result<()> {
    t.open(name, b)?;
    t.full(b)
}

/// Element with no attributes of its own: header, `>`, unattached
/// children, closer.
pub(crate) fn container(t: &mut Trace<'_>, name: &str, b: &IsoBox) -> Result<()> {
    t.open(name, b)?;
    writeln!(t, ">")?;
    t.done(Some(name), Some(b))
}

/// Full box with no attributes of its own.
pub(crate) fn container_full(t: &mut Trace<'_>, name: &str, b: &IsoBox) -> Result<()> {
    open_full(t, name, b)?;
    writeln!(t, ">")?;
    t.done(Some(name), Some(b))
}

pub(crate) fn opt_str(s: &Option<String>) -> &str {
    s.as_deref().unwrap_or("")
}

/// Space separated list, as used by attribute lists of ids.
pub(crate) fn joined<T: std::fmt::Display>(items: &[T], sep: &str) -> String {
    items.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(sep)
}
