use std::path::Path;

use anyhow::Context;
use log::warn;

use depclose::graph::LinkGraph;

/// Drives `-r`: one object name per line, in the `library[member]` /
/// `[member]` / `objectname` forms §4.8 accepts. Grounded on `removeObjs`
/// in `original_source/ldep.c`. Zero matches warns and moves on; more than
/// one lists every candidate and skips the line; exactly one attempts
/// [`LinkGraph::unlink_obj`], which itself may reject the removal.
pub fn process_removal_list(graph: &mut LinkGraph<'_>, path: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("could not read removal list {}", path.display()))?;

    for line in text.lines() {
        let name = line.trim();
        if name.is_empty() {
            continue;
        }

        match graph.find_objects(name) {
            Ok(matches) if matches.is_empty() => {
                warn!("removal list: no object matches '{name}'");
            }
            Ok(matches) if matches.len() == 1 => {
                if graph.unlink_obj(matches[0]) {
                    warn!("removal list: '{name}' is required by the application, not removed");
                }
            }
            Ok(matches) => {
                warn!("removal list: '{name}' is ambiguous, candidates:");
                for obj in matches {
                    warn!("  {}", graph.object_display(obj));
                }
            }
            Err(e) => warn!("removal list: {e}"),
        }
    }

    Ok(())
}
