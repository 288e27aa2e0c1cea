//! C10: the unlink engine (§4.6).
//!
//! Grounded on `unlinkObj` / `doUnlink` / `unlinkUndefs` in
//! `original_source/ldep.c`. Removing an object detaches every one of its
//! imports from the symbols it referenced and splices it out of its link
//! set; an object still needed by the `Application` set is never removed.

use log::debug;

use crate::ids::{ObjId, SymId};
use crate::graph::LinkGraph;
use crate::graph::linkset::LinkSetKind;
use crate::graph::traverse::WalkMode;

impl<'arena> LinkGraph<'arena> {
    /// Attempts to remove `obj` and everything that depends on it (directly
    /// or transitively, via the `EXPORTS` direction). Returns `true` if the
    /// removal was rejected because the dependency set includes an object
    /// belonging to `Application`, in which case nothing is changed.
    pub fn unlink_obj(&mut self, obj: ObjId) -> bool {
        let list = self.walk_build_list(obj, WalkMode::EXPORTS | WalkMode::BUILD_LIST);

        let rejected = list
            .iter()
            .find(|&member| self.objects.get(member).link_set() == Some(LinkSetKind::Application));

        if let Some(needed_by) = rejected {
            debug!(
                "rejected removal of '{}': needed by application ('{}')",
                self.object_display(obj),
                self.object_display(needed_by)
            );
        } else {
            let members: Vec<ObjId> = list.iter().collect();
            for &member in &members {
                self.do_unlink(member);
            }
            for &member in &members {
                self.check_unlink_sanity(member);
            }
        }

        list.release(self);
        rejected.is_some()
    }

    /// Detaches every import of `obj` from the symbol it referenced, and
    /// splices `obj` itself out of its link set.
    fn do_unlink(&self, obj: ObjId) {
        debug!("removing object '{}'", self.object_display(obj));

        for &imp_id in self.objects.get(obj).imports() {
            let sym = self.import_xrefs.get(imp_id).sym;
            let symbol = self.symbols.get(sym);
            let new_head = self.import_xrefs.remove(symbol.importer_head(), imp_id);
            symbol.set_importer_head(new_head);
        }

        let kind = self
            .objects
            .get(obj)
            .link_set()
            .expect("unlinking an object with no assigned link set");
        self.splice_out_of_set(obj, kind);

        self.objects.get(obj).set_link_set(None);
    }

    fn splice_out_of_set(&self, obj: ObjId, kind: LinkSetKind) {
        let set = self.link_sets.get(kind);
        let mut prev: Option<ObjId> = None;
        let mut cursor = set.head();

        loop {
            let cur = cursor.expect("object missing from its own link set");
            if cur == obj {
                let next = self.objects.get(cur).next_in_set();
                match prev {
                    Some(prev_id) => self.objects.get(prev_id).set_next_in_set(next),
                    None => set.set_head(next),
                }
                self.objects.get(obj).set_next_in_set(None);
                return;
            }
            prev = Some(cur);
            cursor = self.objects.get(cur).next_in_set();
        }
    }

    /// §4.6's post-condition: after removing a node, none of its exported
    /// symbols may still have an importer.
    fn check_unlink_sanity(&self, obj: ObjId) {
        for &export_id in self.objects.get(obj).exports() {
            let sym = self.export_xrefs.get(export_id).sym;
            debug_assert!(
                self.symbols.get(sym).importer_head().is_none(),
                "symbol '{}' still imported after its exporter was removed",
                self.symbols.get(sym).name()
            );
        }
    }

    /// Unlinks everything depending, directly or transitively, on an
    /// undefined symbol, skipping past (and leaving in place) whatever
    /// turns out to be needed by the `Application` set. Grounded on
    /// `unlinkUndefs`.
    pub fn unlink_undefs(&mut self) {
        let sentinel = self.sentinel();
        let exports: Vec<_> = self.objects.get(sentinel).exports().to_vec();

        for export_id in exports {
            let sym = self.export_xrefs.get(export_id).sym;
            if log::log_enabled!(log::Level::Debug) {
                debug!(
                    "removing objects depending on '{}'...",
                    self.symbols.get(sym).name()
                );
            }
            self.unlink_importers_of(sym);
        }
    }

    fn unlink_importers_of(&mut self, sym: SymId) {
        let mut anchor = None;

        loop {
            let candidate = match anchor {
                None => self.symbols.get(sym).importer_head(),
                Some(a) => self.import_xrefs.get(a).next(),
            };
            let Some(candidate_id) = candidate else {
                break;
            };

            let obj = self.import_xrefs.get(candidate_id).obj;
            if self.unlink_obj(obj) {
                debug!(
                    "skipping application dependency; object '{}'",
                    self.object_display(obj)
                );
                anchor = Some(candidate_id);
            }
        }
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
    fn unlinking_an_optional_leaf_succeeds() {
        let arena = NameArena::new();
        let mut graph = LinkGraph::new(&arena);

        {
            let mut ingestor = Ingestor::new(&mut graph, "main.nm", false);
            ingestor.feed(Record::ObjectHeader("main.o")).unwrap();
            ingestor.feed(sym("main", 'T')).unwrap();
            ingestor.finish();
        }
        let last_mandatory = crate::ids::ObjId::new(graph.objects().len() - 1);

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

        assert!(!graph.unlink_obj(extra_obj));
        assert_eq!(graph.objects().get(extra_obj).link_set(), None);
    }

    #[test]
    fn unlinking_an_application_object_is_rejected() {
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

        graph.gather_dangling_undefs();
        graph.link_all(last_mandatory);

        let main_obj = graph
            .objects()
            .ids()
            .find(|&id| graph.objects().get(id).name() == "main.o")
            .unwrap();

        assert!(graph.unlink_obj(main_obj));
        assert_eq!(
            graph.objects().get(main_obj).link_set(),
            Some(LinkSetKind::Application)
        );
    }

    #[test]
    fn unlink_undefs_removes_the_sole_dependent() {
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
            let mut ingestor = Ingestor::new(&mut graph, "broken.nm", false);
            ingestor.feed(Record::ObjectHeader("broken.o")).unwrap();
            ingestor.feed(sym("broken", 'T')).unwrap();
            ingestor.feed(sym("missing", 'U')).unwrap();
            ingestor.finish();
        }

        graph.gather_dangling_undefs();
        graph.link_all(last_mandatory);

        let broken_obj = graph
            .objects()
            .ids()
            .find(|&id| graph.objects().get(id).name() == "broken.o")
            .unwrap();
        assert_eq!(
            graph.objects().get(broken_obj).link_set(),
            Some(LinkSetKind::Optional)
        );

        graph.unlink_undefs();
        assert_eq!(graph.objects().get(broken_obj).link_set(), None);
    }
}
