use std::io::{self, BufRead, Write};

use depclose::graph::LinkGraph;

/// Runs `-i`'s query loop: a line ending in `]` is an object query (§4.8,
/// disambiguated interactively on multiple matches), anything else a
/// symbol query (§4.2 + `trackSym`). A sole `.` line exits. Grounded on
/// `interactive()` in `original_source/ldep.c`.
pub fn run_interactive(graph: &LinkGraph<'_>, report: &mut dyn Write) -> io::Result<()> {
    writeln!(
        report,
        "Entering interactive mode. Enter a symbol name, an object or \
         library[member] query, or '.' to quit."
    )?;

    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        write!(report, "> ")?;
        report.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query == "." {
            break;
        }

        if query.ends_with(']') {
            query_object(graph, report, query)?;
        } else {
            query_symbol(graph, report, query)?;
        }
    }

    Ok(())
}

fn query_object(graph: &LinkGraph<'_>, report: &mut dyn Write, query: &str) -> io::Result<()> {
    match graph.find_objects(query) {
        Err(e) => writeln!(report, "{e}"),
        Ok(matches) if matches.is_empty() => writeln!(report, "no object matches '{query}'"),
        Ok(matches) if matches.len() == 1 => graph.track_obj(report, matches[0]),
        Ok(matches) => {
            writeln!(report, "{} objects match '{query}':", matches.len())?;
            for (i, &obj) in matches.iter().enumerate() {
                writeln!(report, "  [{}] {}", i + 1, graph.object_display(obj))?;
            }
            write!(report, "pick one (1-{}), or blank to cancel: ", matches.len())?;
            report.flush()?;

            let mut pick = String::new();
            io::stdin().lock().read_line(&mut pick)?;
            if let Ok(n) = pick.trim().parse::<usize>() {
                if n >= 1 && n <= matches.len() {
                    return graph.track_obj(report, matches[n - 1]);
                }
            }
            Ok(())
        }
    }
}

fn query_symbol(graph: &LinkGraph<'_>, report: &mut dyn Write, query: &str) -> io::Result<()> {
    match graph.symbols().find(query) {
        Some(sym) => graph.track_sym(report, sym),
        None => writeln!(report, "no symbol named '{query}'"),
    }
}
