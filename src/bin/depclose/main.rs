use std::io::{self, Cursor, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use arguments::CliArgs;
use log::error;

use depclose::arena::NameArena;
use depclose::graph::LinkGraph;
use depclose::graph::linkset::LinkSetKind;
use depclose::ids::ObjId;
use depclose::pathed_item::PathedItem;
use depclose::pipeline::ingest_reader;
use depclose::report::ReportSink;
use depclose::script;

mod arguments;
mod interactive;
mod logging;
mod removal;

/// Suppresses a second `error!` print for failures already reported
/// (e.g. per-file open errors collected in [`open_inputs`]).
#[derive(Debug)]
struct EmptyError;

impl std::fmt::Display for EmptyError {
    fn fmt(&self, _f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Ok(())
    }
}

impl std::error::Error for EmptyError {}

fn main() {
    if let Err(e) = try_main() {
        if !e.is::<EmptyError>() {
            error!("{e}");
        }
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let args = arguments::parse_arguments()?;
    run(&args)
}

fn run(args: &CliArgs) -> Result<()> {
    let arena = NameArena::new();
    let mut graph = LinkGraph::new(&arena);

    let last_mandatory = ingest_inputs(&mut graph, &args.files, args.force)?;

    graph.gather_dangling_undefs();

    let mut report = match &args.report_path {
        Some(path) => ReportSink::to_file(path)
            .with_context(|| format!("could not open report file {}", path.display()))?,
        None => ReportSink::stdout(),
    };

    writeln!(report, "Looking for UNDEFINED symbols:")?;
    for &export_id in graph.objects().get(graph.sentinel()).exports() {
        let sym = graph.export_xrefs().get(export_id).sym;
        writeln!(report, " - '{}'", graph.symbols().get(sym).name())?;
    }

    graph.link_all(last_mandatory);

    if args.quiet {
        return Ok(());
    }

    if args.dump_syms {
        for sym in graph.symbols().walk() {
            graph.track_sym(&mut report, sym)?;
        }
    }

    if args.dump_deps {
        for obj in graph.objects().ids() {
            graph.track_obj(&mut report, obj)?;
        }
    }

    graph.unlink_undefs();

    if let Some(removal_path) = &args.removal_list {
        removal::process_removal_list(&mut graph, removal_path)?;
    }

    if args.multiple_defs {
        graph.check_multiple_defs(LinkSetKind::Application);
        graph.check_multiple_defs(LinkSetKind::Optional);
    }

    if args.interactive {
        interactive::run_interactive(&graph, &mut report)?;
    }

    if let Some(script_path) = &args.script_path {
        let mut out = std::fs::File::create(script_path)
            .with_context(|| format!("could not create linker script {}", script_path.display()))?;
        script::write_script(&graph, &mut out, false)?;
    }

    Ok(())
}

/// Ingests every input file (first = mandatory, rest = optional) or, with
/// no files given, standard input entirely as mandatory. Returns the last
/// object ingested from the mandatory portion, the boundary [`LinkGraph::link_all`]
/// needs to seed `Application` vs `Optional`.
fn ingest_inputs<'arena>(
    graph: &mut LinkGraph<'arena>,
    files: &[PathBuf],
    force: bool,
) -> Result<ObjId> {
    let Some((first, rest)) = files.split_first() else {
        let stdin = io::stdin();
        return ingest_reader(graph, "stdin", stdin.lock(), force)?
            .ok_or_else(|| anyhow::anyhow!("no objects ingested from standard input"));
    };

    let inputs = open_inputs(std::slice::from_ref(first))?;
    let mandatory = &inputs[0];
    let last_mandatory = ingest_reader(
        graph,
        &mandatory.path().display().to_string(),
        Cursor::new(mandatory.as_slice()),
        force,
    )?
    .ok_or_else(|| anyhow::anyhow!("no objects ingested from {}", mandatory.path().display()))?;

    let optional_inputs = open_inputs(rest)?;
    for input in &optional_inputs {
        ingest_reader(
            graph,
            &input.path().display().to_string(),
            Cursor::new(input.as_slice()),
            force,
        )?;
    }

    Ok(last_mandatory)
}

/// Reads every file in `paths` fully into memory, collecting individual
/// open/read failures via `error!` rather than stopping at the first one,
/// then bailing once if any occurred.
fn open_inputs(paths: &[PathBuf]) -> Result<Vec<PathedItem<PathBuf, Vec<u8>>>> {
    let mut error_flag = false;
    let inputs = paths
        .iter()
        .cloned()
        .filter_map(|path| match std::fs::read(&path) {
            Ok(bytes) => Some(PathedItem::new(path, bytes)),
            Err(e) => {
                error!("could not open {}: {e}", path.display());
                error_flag = true;
                None
            }
        })
        .collect::<Vec<_>>();

    if error_flag {
        bail!(EmptyError);
    }

    Ok(inputs)
}
