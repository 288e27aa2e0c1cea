//! Glue between the graph-agnostic scanner (§4.9) and the ingestor (§4.3):
//! reads an input stream line by line, hands each line to
//! [`crate::scan::scan_line`], and feeds whatever record comes back to a
//! fresh [`crate::graph::ingest::Ingestor`]. Kept out of both `scan` and
//! `graph::ingest` themselves so each stays decoupled from the other, the
//! way SPEC_FULL §4.9 asks for; this is the "surrounding layer" that wires
//! them together for a single input, grounded on the combined
//! read-loop-plus-`scan_file` shape of `original_source/ldep.c`.

use std::io::BufRead;

use crate::error::PipelineError;
use crate::graph::LinkGraph;
use crate::graph::ingest::Ingestor;
use crate::ids::ObjId;
use crate::scan;

/// Ingests every line of `reader` into `graph`, naming the stream
/// `input_name` for error messages and for the synthesized object name a
/// header-less leading symbol falls back to (§4.3). Returns the id of the
/// last object this call opened, or `None` if the stream contained no
/// object headers at all (in which case the ingestor will have synthesized
/// one only if it also saw at least one symbol entry).
pub fn ingest_reader<'arena>(
    graph: &mut LinkGraph<'arena>,
    input_name: &str,
    mut reader: impl BufRead,
    force: bool,
) -> Result<Option<ObjId>, PipelineError> {
    let mut ingestor = Ingestor::new(graph, input_name, force);
    let mut last_obj = None;
    let mut line_no = 0usize;
    let mut line = String::new();

    loop {
        line.clear();
        let read = reader.read_line(&mut line).map_err(|source| PipelineError::Io {
            input: input_name.to_string(),
            source,
        })?;
        if read == 0 {
            break;
        }
        line_no += 1;

        if let Some(record) = scan::scan_line(input_name, line_no, &line)? {
            if let Some(obj) = ingestor.feed(record)? {
                last_obj = Some(obj);
            }
        }
    }

    ingestor.finish();
    Ok(last_obj)
}
