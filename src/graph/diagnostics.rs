//! C11: diagnostics — multiple-definition scanning and human-readable
//! object/symbol dumps. Grounded on `checkMultipleDefs` / `trackSym` /
//! `trackObj` / `depPrint` in `original_source/ldep.c`.

use std::io::{self, Write};

use log::warn;

use crate::ids::{ObjId, SymId};
use crate::graph::LinkGraph;
use crate::graph::linkset::LinkSetKind;
use crate::graph::symtab::SymbolType;
use crate::graph::traverse::WalkMode;

impl<'arena> LinkGraph<'arena> {
    /// Scans every object in `kind`'s link set for symbols exported more
    /// than once and logs a warning per clash (skipped for `Common`
    /// symbols, which tolerate multiple definitions by convention).
    /// Returns the number of clashes found. Leaves every object's
    /// `visited` flag clear when it returns.
    pub fn check_multiple_defs(&self, kind: LinkSetKind) -> usize {
        log::info!(
            "checking for multiply defined symbols in the {} link set",
            kind.title()
        );

        let mut clashes = 0;
        let mut cursor = self.link_sets.get(kind).head();

        while let Some(obj) = cursor {
            if !self.objects.get(obj).visited() {
                for &export_id in self.objects.get(obj).exports() {
                    let sym = self.export_xrefs.get(export_id).sym;
                    if self.report_clash_if_any(sym) {
                        clashes += 1;
                    }
                }
            }
            cursor = self.objects.get(obj).next_in_set();
        }

        for obj in self.objects.ids() {
            self.objects.get(obj).set_visited(false);
        }

        clashes
    }

    /// Reports (and busy-marks every exporter of) `sym` if it has more than
    /// one exporter, unless it is a `Common` symbol. Returns whether a
    /// clash was reported.
    fn report_clash_if_any(&self, sym: SymId) -> bool {
        let symbol = self.symbols.get(sym);
        let Some(head_id) = symbol.exporter_head() else {
            return false;
        };
        if self.export_xrefs.get(head_id).next().is_none() {
            return false;
        }

        let is_common = symbol.typ() == SymbolType::Common;
        if !is_common {
            warn!(
                "name clash detected; symbol '{}' (type '{}') exported by multiple objects:",
                symbol.name(),
                char::from(symbol.typ()),
            );
        }

        for (_, xref) in self.export_xrefs.iter_from(Some(head_id)) {
            if !is_common {
                warn!(
                    "  in '{}'{}",
                    self.object_display(xref.obj),
                    if xref.weak { " (weak)" } else { "" }
                );
            }
            self.objects.get(xref.obj).set_visited(true);
        }

        !is_common
    }

    /// Writes a human-readable report of everything known about `sym`:
    /// its exporter(s), what linking its first exporter pulls in, and
    /// what (maybe indirectly) depends on it. Mirrors `trackSym`.
    pub fn track_sym(&self, out: &mut dyn Write, sym: SymId) -> io::Result<()> {
        let symbol = self.symbols.get(sym);
        writeln!(out, "What I know about symbol '{}':", symbol.name())?;

        write!(out, "  Defined in object: ")?;
        match symbol.exporter_head() {
            None => writeln!(out, "NOWHERE!!!")?,
            Some(head_id) => {
                for (_, xref) in self.export_xrefs.iter_from(Some(head_id)) {
                    writeln!(
                        out,
                        "{}{}",
                        self.object_display(xref.obj),
                        if xref.weak { " (WEAK)" } else { "" }
                    )?;
                }
            }
        }

        if let Some(head_id) = symbol.exporter_head() {
            let definer = self.export_xrefs.get(head_id).obj;
            write!(out, "  Depending on objects (triggers linkage of):")?;
            if self.objects.get(definer).imports().is_empty() {
                writeln!(out, " NONE")?;
            } else {
                writeln!(out)?;
                let list = self.walk_build_list(definer, WalkMode::BUILD_LIST);
                for obj in list.iter().skip(1) {
                    writeln!(out, "    {}", self.object_display(obj))?;
                }
                list.release(self);
            }
        }

        writeln!(out, "  Objects depending (maybe indirectly) on this symbol:")?;
        writeln!(
            out,
            "  Note: the host object may depend on yet more objects due to other symbols..."
        )?;

        match symbol.importer_head() {
            None => writeln!(out, "  NONE")?,
            Some(head) => {
                for (_, imp) in self.import_xrefs.iter_from(Some(head)) {
                    let list = self.walk_build_list(imp.obj, WalkMode::EXPORTS | WalkMode::BUILD_LIST);
                    for obj in list.iter() {
                        writeln!(out, "    {}", self.object_display(obj))?;
                    }
                    list.release(self);
                }
            }
        }

        Ok(())
    }

    /// Writes a human-readable report of everything known about `obj`:
    /// its own exports and imports, and both of its transitive dependency
    /// directions. Mirrors `trackObj`.
    pub fn track_obj(&self, out: &mut dyn Write, obj: ObjId) -> io::Result<()> {
        writeln!(out, "What I know about object '{}':", self.object_display(obj))?;

        writeln!(out, "  Exported symbols:")?;
        for &export_id in self.objects.get(obj).exports() {
            let sym = self.export_xrefs.get(export_id).sym;
            writeln!(out, "    {}", self.symbols.get(sym).name())?;
        }

        writeln!(out, "  Imported symbols:")?;
        for &import_id in self.objects.get(obj).imports() {
            let sym = self.import_xrefs.get(import_id).sym;
            writeln!(out, "    {}", self.symbols.get(sym).name())?;
        }

        writeln!(out, "  Objects depending on me (including indirect dependencies):")?;
        let dependents = self.walk_build_list(obj, WalkMode::EXPORTS | WalkMode::BUILD_LIST);
        for dep in dependents.iter() {
            writeln!(out, "    {}", self.object_display(dep))?;
        }
        dependents.release(self);

        writeln!(out, "  Objects I depend on (including indirect dependencies):")?;
        let dependencies = self.walk_build_list(obj, WalkMode::BUILD_LIST);
        for dep in dependencies.iter() {
            writeln!(out, "    {}", self.object_display(dep))?;
        }
        dependencies.release(self);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::NameArena;
    use crate::graph::ingest::{Ingestor, Record};

    fn sym(name: &str, type_char: char) -> Record<'_> {
        Record::SymbolEntry { name, type_char }
    }

    #[test]
    fn detects_symbol_exported_twice() {
        let arena = NameArena::new();
        let mut graph = LinkGraph::new(&arena);

        let last_mandatory;
        {
            let mut ingestor = Ingestor::new(&mut graph, "a.nm", false);
            ingestor.feed(Record::ObjectHeader("a.o")).unwrap();
            ingestor.feed(sym("shared", 'T')).unwrap();
            ingestor.finish();
        }
        {
            let mut ingestor = Ingestor::new(&mut graph, "b.nm", false);
            ingestor.feed(Record::ObjectHeader("b.o")).unwrap();
            ingestor.feed(sym("shared", 'T')).unwrap();
            ingestor.finish();
        }
        last_mandatory = crate::ids::ObjId::new(graph.objects().len() - 1);

        graph.gather_dangling_undefs();
        graph.link_all(last_mandatory);

        let clashes = graph.check_multiple_defs(LinkSetKind::Application);
        assert_eq!(clashes, 1);

        for id in graph.objects().ids() {
            assert!(!graph.objects().get(id).visited());
        }
    }

    #[test]
    fn common_symbols_are_not_clashes() {
        let arena = NameArena::new();
        let mut graph = LinkGraph::new(&arena);

        let last_mandatory;
        {
            let mut ingestor = Ingestor::new(&mut graph, "a.nm", false);
            ingestor.feed(Record::ObjectHeader("a.o")).unwrap();
            ingestor.feed(sym("counter", 'C')).unwrap();
            ingestor.finish();
        }
        {
            let mut ingestor = Ingestor::new(&mut graph, "b.nm", false);
            ingestor.feed(Record::ObjectHeader("b.o")).unwrap();
            ingestor.feed(sym("counter", 'C')).unwrap();
            ingestor.finish();
        }
        last_mandatory = crate::ids::ObjId::new(graph.objects().len() - 1);

        graph.gather_dangling_undefs();
        graph.link_all(last_mandatory);

        assert_eq!(graph.check_multiple_defs(LinkSetKind::Application), 0);
    }

    #[test]
    fn track_sym_reports_no_definition() {
        let arena = NameArena::new();
        let mut graph = LinkGraph::new(&arena);

        {
            let mut ingestor = Ingestor::new(&mut graph, "a.nm", false);
            ingestor.feed(Record::ObjectHeader("a.o")).unwrap();
            ingestor.feed(sym("missing", 'U')).unwrap();
            ingestor.finish();
        }

        let missing = graph.symbols().find("missing").unwrap();
        let mut buf = Vec::new();
        graph.track_sym(&mut buf, missing).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("NOWHERE!!!"));
    }
}
