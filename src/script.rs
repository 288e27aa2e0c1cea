//! C14: the linker-script emitter (§4.10). Reads the `Application` and
//! `Optional` link sets back out of the graph and writes one
//! `EXTERN( symbol )` directive per exported symbol of every object in each
//! set, in link-set iteration order (LIFO with respect to linking time,
//! per §5). Grounded on `writeScript`/`writeLinkSet` in
//! `original_source/ldep.c`; no symbol sorting or deduplication, matching
//! the reference tool, so the output stays diffable against it.

use std::io::{self, Write};

use crate::graph::LinkGraph;
use crate::graph::linkset::LinkSetKind;

/// Writes the full script: the `Application` block (unless
/// `optional_only`), then the `Optional` block.
pub fn write_script(
    graph: &LinkGraph<'_>,
    out: &mut dyn Write,
    optional_only: bool,
) -> io::Result<()> {
    if !optional_only {
        write_link_set(graph, out, LinkSetKind::Application)?;
    }
    write_link_set(graph, out, LinkSetKind::Optional)
}

fn write_link_set(graph: &LinkGraph<'_>, out: &mut dyn Write, kind: LinkSetKind) -> io::Result<()> {
    writeln!(out, "/* ----- {} Link Set ----- */", kind.title())?;

    let mut cursor = graph.link_sets().get(kind).head();
    while let Some(obj) = cursor {
        writeln!(out, "/* {}: */", graph.object_display(obj))?;

        for &export_id in graph.objects().get(obj).exports() {
            let sym = graph.export_xrefs().get(export_id).sym;
            writeln!(out, "EXTERN( {} )", graph.symbols().get(sym).name())?;
        }

        cursor = graph.objects().get(obj).next_in_set();
    }

    Ok(())
}
