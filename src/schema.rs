//! Schema mode: one placeholder element per registry row.

use crate::dump::{Result, Trace, dump_box_ex, swallow};
use crate::registry::default_registry;
use std::io::Write;

/// Render a synthetic, size 0 node for every registered row, in registry
/// order, inside a `<Boxes>` root. No file is consulted.
pub fn dump_schema(out: &mut dyn Write) -> Result<()> {
    let registry = default_registry();
    log::info!("writing schema for {} box types", registry.row_count());

    let mut t = Trace::new(out);
    writeln!(t, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(t, "<!--MP4Box dump trace-->")?;
    writeln!(t, "<Boxes>")?;
    for row in registry.rows() {
        let b = row.synthesize();
        swallow(dump_box_ex(Some(&b), None, &mut t))?;
    }
    writeln!(t, "</Boxes>")?;
    Ok(())
}
