//! Crate-wide error types that sit above the individual module-local
//! `thiserror` enums (§7). [`PipelineError`] is what [`crate::pipeline`]
//! surfaces to callers; the binary crate converts it (and everything else)
//! to `anyhow::Error` at the CLI boundary, mirroring the teacher's
//! per-module `thiserror` enums feeding one `anyhow`-wrapped error at
//! `bin/boflink/main.rs`.

use crate::graph::ingest::IngestError;
use crate::scan::ScanError;

/// Everything that can go wrong turning one input stream into graph entries:
/// a malformed line (§4.9), a structurally invalid record (§4.3), or an I/O
/// failure reading the stream itself. All three are `FatalParse` per §7 —
/// ingestion of the current input stops immediately.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("{input}: {source}")]
    Io {
        input: String,
        #[source]
        source: std::io::Error,
    },
}
