//! C9: the traversal engine (§4.5).
//!
//! Two walk directions — `EXPORTS` (who depends on me, following every
//! importer of everything I export) and the default `IMPORTS` (what do I
//! depend on, following only the first exporter of everything I import) —
//! and two modes: "direct action", where the visitor runs inline as each
//! node is first entered, and "list-building", where visits are recorded
//! into an ordered [`WorkList`] and the visitor runs afterwards, once per
//! distinct node.
//!
//! The original engine (`depwalk_rec` in `original_source/ldep.c`) threads
//! its worklist through a single overloaded pointer field per object and an
//! address-as-sentinel `BUSY` marker. This version uses a plain `Cell<bool>`
//! per object ([`crate::graph::object::Object::visited`]) plus an owned
//! `Vec<ObjId>` for the worklist — the spec's §9 design note sanctions
//! either approach, and the explicit structure is easier to follow.

use bitflags::bitflags;

use crate::ids::ObjId;
use crate::graph::LinkGraph;

bitflags! {
    /// Direction and mode bits for a traversal. Mirrors the reference
    /// tool's `WALK_EXPORTS` / `WALK_BUILD_LIST`; `WALK_IMPORTS` has no bit
    /// of its own; it is simply the absence of `EXPORTS`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WalkMode: u8 {
        /// Follow every importer of everything this object exports. Absent,
        /// the walk follows the (single) first exporter of everything this
        /// object imports.
        const EXPORTS = 1 << 0;
        /// Defer the visitor and record an ordered, deduplicated
        /// [`WorkList`] instead of invoking it inline.
        const BUILD_LIST = 1 << 1;
    }
}

/// An ordered, deduplicated record of every object reached by a
/// [`LinkGraph::walk_build_list`] call, in first-visit (preorder) order.
/// The root is always the first entry.
///
/// Every object recorded here has its `visited` scratch flag set until
/// [`WorkList::release`] is called; a second traversal started before that
/// would trip the "already visited" `debug_assert!` in [`LinkGraph::walk`]
/// or [`LinkGraph::walk_build_list`] (I5).
pub struct WorkList {
    order: Vec<ObjId>,
}

impl WorkList {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ObjId> + '_ {
        self.order.iter().copied()
    }

    pub fn contains(&self, obj: ObjId) -> bool {
        self.order.contains(&obj)
    }

    /// Clears every member's `visited` flag, restoring the graph to the
    /// state [`LinkGraph::walk`] or another [`LinkGraph::walk_build_list`]
    /// requires on entry.
    pub fn release(self, graph: &LinkGraph<'_>) {
        for obj in self.order {
            graph.objects().get(obj).set_visited(false);
        }
    }
}

impl<'arena> LinkGraph<'arena> {
    /// Direct-action walk from `root`: `action(object, depth)` runs inline
    /// the moment each node is first entered, including `root` itself at
    /// depth 0. A node's `visited` flag is cleared as soon as its own
    /// subtree finishes, so the same node may be revisited from a sibling
    /// branch within one walk — only back-edges to an ancestor still being
    /// processed are suppressed.
    pub fn walk(&self, root: ObjId, mode: WalkMode, mut action: impl FnMut(ObjId, usize)) {
        debug_assert!(
            !mode.contains(WalkMode::BUILD_LIST),
            "use walk_build_list for WalkMode::BUILD_LIST"
        );
        debug_assert!(
            !self.objects.get(root).visited(),
            "walk root already marked visited by an unreleased traversal"
        );
        self.walk_rec(root, mode, 0, &mut action);
    }

    fn walk_rec(&self, obj: ObjId, mode: WalkMode, depth: usize, action: &mut dyn FnMut(ObjId, usize)) {
        action(obj, depth);
        self.objects.get(obj).set_visited(true);

        for neighbor in self.neighbors(obj, mode) {
            if !self.objects.get(neighbor).visited() {
                self.walk_rec(neighbor, mode, depth + 1, action);
            }
        }

        self.objects.get(obj).set_visited(false);
    }

    /// List-building walk from `root`: every distinct reachable node
    /// (including `root`) is recorded into the returned [`WorkList`] in
    /// preorder, with its `visited` flag left set. Call [`WorkList::release`]
    /// once done with it.
    pub fn walk_build_list(&self, root: ObjId, mode: WalkMode) -> WorkList {
        debug_assert!(
            mode.contains(WalkMode::BUILD_LIST),
            "walk_build_list requires WalkMode::BUILD_LIST"
        );
        debug_assert!(
            !self.objects.get(root).visited(),
            "walk_build_list root already marked visited by an unreleased traversal"
        );

        let mut list = WorkList { order: Vec::new() };
        self.build_rec(root, mode, &mut list);
        list
    }

    fn build_rec(&self, obj: ObjId, mode: WalkMode, list: &mut WorkList) {
        self.objects.get(obj).set_visited(true);
        list.order.push(obj);

        for neighbor in self.neighbors(obj, mode) {
            if !self.objects.get(neighbor).visited() {
                self.build_rec(neighbor, mode, list);
            }
        }
    }

    fn neighbors(&self, obj: ObjId, mode: WalkMode) -> Vec<ObjId> {
        let mut found = Vec::new();

        if mode.contains(WalkMode::EXPORTS) {
            for &export_id in self.objects.get(obj).exports() {
                let sym = self.export_xrefs.get(export_id).sym;
                let symbol = self.symbols.get(sym);
                for (_, imp) in self.import_xrefs.iter_from(symbol.importer_head()) {
                    found.push(imp.obj);
                }
            }
        } else {
            for &import_id in self.objects.get(obj).imports() {
                let sym = self.import_xrefs.get(import_id).sym;
                let symbol = self.symbols.get(sym);
                if let Some(export_id) = symbol.exporter_head() {
                    found.push(self.export_xrefs.get(export_id).obj);
                }
            }
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::NameArena;
    use crate::graph::ingest::{Ingestor, Record};

    fn chain_graph() -> LinkGraph<'static> {
        let arena = Box::leak(Box::new(NameArena::new()));
        let mut graph = LinkGraph::new(arena);

        let mut ingestor = Ingestor::new(&mut graph, "chain.nm", false);
        ingestor.feed(Record::ObjectHeader("a.o")).unwrap();
        ingestor
            .feed(Record::SymbolEntry { name: "a", type_char: 'T' })
            .unwrap();
        ingestor
            .feed(Record::SymbolEntry { name: "b", type_char: 'U' })
            .unwrap();
        ingestor.feed(Record::ObjectHeader("b.o")).unwrap();
        ingestor
            .feed(Record::SymbolEntry { name: "b", type_char: 'T' })
            .unwrap();
        ingestor
            .feed(Record::SymbolEntry { name: "c", type_char: 'U' })
            .unwrap();
        ingestor.feed(Record::ObjectHeader("c.o")).unwrap();
        ingestor
            .feed(Record::SymbolEntry { name: "c", type_char: 'T' })
            .unwrap();
        ingestor.finish();
        graph.gather_dangling_undefs();
        graph
    }

    #[test]
    fn walk_build_list_visits_each_node_once_in_preorder() {
        let graph = chain_graph();
        let a = graph
            .objects()
            .ids()
            .find(|&id| graph.objects().get(id).name() == "a.o")
            .unwrap();

        let list = graph.walk_build_list(a, WalkMode::BUILD_LIST);
        let names: Vec<_> = list
            .iter()
            .map(|id| graph.objects().get(id).name())
            .collect();
        assert_eq!(names, vec!["a.o", "b.o", "c.o"]);

        list.release(&graph);
        for id in graph.objects().ids() {
            assert!(!graph.objects().get(id).visited());
        }
    }

    #[test]
    fn direct_walk_clears_visited_flags_when_done() {
        let graph = chain_graph();
        let a = graph
            .objects()
            .ids()
            .find(|&id| graph.objects().get(id).name() == "a.o")
            .unwrap();

        let mut seen = Vec::new();
        graph.walk(a, WalkMode::empty(), |obj, depth| seen.push((obj, depth)));

        assert_eq!(seen.len(), 3);
        for id in graph.objects().ids() {
            assert!(!graph.objects().get(id).visited());
        }
    }

    #[test]
    fn exports_direction_follows_importers() {
        let graph = chain_graph();
        let c = graph
            .objects()
            .ids()
            .find(|&id| graph.objects().get(id).name() == "c.o")
            .unwrap();

        let list = graph.walk_build_list(c, WalkMode::EXPORTS | WalkMode::BUILD_LIST);
        let names: Vec<_> = list
            .iter()
            .map(|id| graph.objects().get(id).name())
            .collect();
        assert_eq!(names, vec!["c.o", "b.o", "a.o"]);
        list.release(&graph);
    }
}
