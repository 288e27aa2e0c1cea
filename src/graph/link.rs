//! C8: the link engine (§4.4).
//!
//! Computes the transitive closure of each link set by walking an object's
//! imports, following only the *first* exporter of each symbol (later
//! exporters are diagnostic-only, see [`crate::graph::diagnostics`]).
//! Grounded directly on `linkObj` in `original_source/ldep.c`; the
//! driving loop below mirrors the `main()` loop that seeds the `Application`
//! set from the first input file and everything after it as `Optional`.

use log::{debug, warn};

use crate::ids::{ObjId, SymId};
use crate::graph::LinkGraph;
use crate::graph::linkset::LinkSetKind;

impl<'arena> LinkGraph<'arena> {
    /// Drives linking over every object in ingest order. Objects up to and
    /// including `last_mandatory` seed the `Application` set; everything
    /// ingested afterwards seeds `Optional`. The sentinel `U*` object is
    /// skipped — it already belongs to `UNDEFINED`.
    pub fn link_all(&mut self, last_mandatory: ObjId) {
        let mut seed_kind = LinkSetKind::Application;

        for obj in self.objects.ids() {
            if obj == self.sentinel() {
                continue;
            }

            if self.objects.get(obj).link_set().is_none() {
                self.assign_link_set(obj, seed_kind);
                self.link_obj(obj, None);
            }

            if obj == last_mandatory {
                seed_kind = LinkSetKind::Optional;
            }
        }
    }

    /// Marks `obj` as belonging to `kind`, without yet inserting it into
    /// that set's list — insertion happens when [`Self::link_obj`] for `obj`
    /// returns, so that an object's position in its set reflects when its
    /// own dependency walk finished, not when it was first reached.
    fn assign_link_set(&self, obj: ObjId, kind: LinkSetKind) {
        self.objects.get(obj).set_link_set(Some(kind));
    }

    /// Recursively links `obj`'s imports into the link set `obj` was just
    /// assigned to. `via` names the symbol that pulled `obj` in, for
    /// tracing only. Caller must have already called
    /// [`Self::assign_link_set`] for `obj`.
    fn link_obj(&mut self, obj: ObjId, via: Option<SymId>) {
        let kind = self
            .objects
            .get(obj)
            .link_set()
            .expect("link_obj requires obj's link set to already be assigned");

        if log::log_enabled!(log::Level::Debug) {
            let because = via
                .map(|s| format!(" because of '{}'", self.symbols.get(s).name()))
                .unwrap_or_default();
            debug!(
                "linking '{}'{because} to the {} link set",
                self.object_display(obj),
                kind.title()
            );
        }

        let imports = self.objects.get(obj).imports().to_vec();
        for imp_id in imports {
            let imp = self.import_xrefs.get(imp_id);
            let sym_id = imp.sym;
            debug_assert!(imp.next().is_none(), "import xref linked twice");

            let symbol = self.symbols.get(sym_id);
            let new_head = self
                .import_xrefs
                .push_front(symbol.importer_head(), imp_id)
                .expect("push_front always yields a head");
            symbol.set_importer_head(new_head);

            match symbol.exporter_head() {
                None => {
                    warn!(
                        "symbol {} undefined, referenced from {}",
                        symbol.name(),
                        self.object_display(obj)
                    );
                }
                Some(export_id) => {
                    let dep = self.export_xrefs.get(export_id).obj;
                    if self.objects.get(dep).link_set().is_none() {
                        self.assign_link_set(dep, kind);
                        self.link_obj(dep, Some(sym_id));
                    }
                }
            }
        }

        self.push_into_own_set(obj, kind);
    }

    fn push_into_own_set(&self, obj: ObjId, kind: LinkSetKind) {
        let set = self.link_sets.get(kind);
        let old_head = set.head();
        self.objects.get(obj).set_next_in_set(old_head);
        set.set_head(Some(obj));
    }
}

#[cfg(test)]
mod tests {
    use crate::arena::NameArena;
    use crate::graph::LinkGraph;
    use crate::graph::ingest::{Ingestor, Record};
    use crate::graph::linkset::LinkSetKind;

    fn sym<'a>(name: &'a str, type_char: char) -> Record<'a> {
        Record::SymbolEntry { name, type_char }
    }

    #[test]
    fn mandatory_object_pulls_in_its_optional_dependency() {
        let arena = NameArena::new();
        let mut graph = LinkGraph::new(&arena);

        let last_mandatory;
        {
            let mut ingestor = Ingestor::new(&mut graph, "main.nm", false);
            ingestor.feed(Record::ObjectHeader("main.o")).unwrap();
            ingestor.feed(sym("main", 'T')).unwrap();
            ingestor.feed(sym("helper", 'U')).unwrap();
            ingestor.finish();
        }
        last_mandatory = crate::ids::ObjId::new(graph.objects().len() - 1);

        {
            let mut ingestor = Ingestor::new(&mut graph, "helper.nm", false);
            ingestor.feed(Record::ObjectHeader("helper.o")).unwrap();
            ingestor.feed(sym("helper", 'T')).unwrap();
            ingestor.finish();
        }

        graph.gather_dangling_undefs();
        graph.link_all(last_mandatory);

        let helper_obj = graph
            .objects()
            .ids()
            .find(|&id| graph.objects().get(id).name() == "helper.o")
            .unwrap();
        assert_eq!(
            graph.objects().get(helper_obj).link_set(),
            Some(LinkSetKind::Application)
        );
    }

    #[test]
    fn optional_object_with_no_mandatory_dependent_stays_optional() {
        let arena = NameArena::new();
        let mut graph = LinkGraph::new(&arena);

        let last_mandatory;
        {
            let mut ingestor = Ingestor::new(&mut graph, "main.nm", false);
            ingestor.feed(Record::ObjectHeader("main.o")).unwrap();
            ingestor.feed(sym("main", 'T')).unwrap();
            ingestor.finish();
        }
        last_mandatory = crate::ids::ObjId::new(graph.objects().len() - 1);

        {
            let mut ingestor = Ingestor::new(&mut graph, "extra.nm", false);
            ingestor.feed(Record::ObjectHeader("extra.o")).unwrap();
            ingestor.feed(sym("extra", 'T')).unwrap();
            ingestor.finish();
        }

        graph.gather_dangling_undefs();
        graph.link_all(last_mandatory);

        let extra_obj = graph
            .objects()
            .ids()
            .find(|&id| graph.objects().get(id).name() == "extra.o")
            .unwrap();
        assert_eq!(
            graph.objects().get(extra_obj).link_set(),
            Some(LinkSetKind::Optional)
        );
    }

    #[test]
    fn undefined_symbol_links_against_the_sentinel() {
        let arena = NameArena::new();
        let mut graph = LinkGraph::new(&arena);

        {
            let mut ingestor = Ingestor::new(&mut graph, "main.nm", false);
            ingestor.feed(Record::ObjectHeader("main.o")).unwrap();
            ingestor.feed(sym("main", 'T')).unwrap();
            ingestor.feed(sym("missing", 'U')).unwrap();
            ingestor.finish();
        }
        let last_mandatory = crate::ids::ObjId::new(graph.objects().len() - 1);

        graph.gather_dangling_undefs();
        graph.link_all(last_mandatory);

        let missing = graph.symbols().find("missing").unwrap();
        let export_id = graph.symbols().get(missing).exporter_head().unwrap();
        assert_eq!(graph.export_xrefs().get(export_id).obj, graph.sentinel());
    }
}
