//! The bulk report sink (`-o`): where symbol/object dumps, the
//! undefined-symbol listing, the multiple-definition report, and
//! `trackSym`/`trackObj` output go. Kept entirely separate from the leveled
//! `log` output the binary crate's `CliLogger` writes to stderr/stdout
//! (SPEC_FULL §4.11) — this mirrors the reference tool's split between
//! `fprintf(logf, ...)` and `fprintf(stderr, ...)`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Either standard output or a file opened with `-o`. Implements [`Write`]
/// so every report-producing [`crate::graph::LinkGraph`] method can take it
/// as a plain `&mut dyn Write`.
pub enum ReportSink {
    Stdout(io::Stdout),
    File(BufWriter<File>),
}

impl ReportSink {
    pub fn stdout() -> Self {
        ReportSink::Stdout(io::stdout())
    }

    pub fn to_file(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(ReportSink::File(BufWriter::new(File::create(path)?)))
    }
}

impl Write for ReportSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            ReportSink::Stdout(s) => s.write(buf),
            ReportSink::File(f) => f.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            ReportSink::Stdout(s) => s.flush(),
            ReportSink::File(f) => f.flush(),
        }
    }
}
