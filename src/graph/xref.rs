//! C5: cross-reference lists.
//!
//! An [`ExportXRef`] lives in its owning object's export array and is also
//! chained, tail-appended, into its symbol's exporter list (order = ingest
//! order, per §4.3's fixup step). An [`ImportXRef`] lives in its owning
//! object's import array and, once linked, is chained head-first into its
//! symbol's importer list by the link engine.
//!
//! This mirrors the teacher's `graph::edge::EdgeList` adjacency-list shape
//! (head/tail cells, O(1) push_back) but stores nodes by index in a `Vec`
//! rather than behind arena references, per the spec's "arena-and-index"
//! design note.

use std::cell::Cell;

use crate::ids::{ExportXRefId, ImportXRefId, ObjId, SymId};

/// An export cross-reference: symbol `sym` is defined by object `obj`.
pub struct ExportXRef {
    pub sym: SymId,
    pub obj: ObjId,
    pub weak: bool,
    next: Cell<Option<ExportXRefId>>,
}

impl ExportXRef {
    pub(super) fn new(sym: SymId, obj: ObjId, weak: bool) -> Self {
        Self {
            sym,
            obj,
            weak,
            next: Cell::new(None),
        }
    }

    #[inline]
    pub fn next(&self) -> Option<ExportXRefId> {
        self.next.get()
    }
}

/// An import cross-reference: symbol `sym` is referenced by object `obj`.
pub struct ImportXRef {
    pub sym: SymId,
    pub obj: ObjId,
    next: Cell<Option<ImportXRefId>>,
}

impl ImportXRef {
    pub(super) fn new(sym: SymId, obj: ObjId) -> Self {
        Self {
            sym,
            obj,
            next: Cell::new(None),
        }
    }

    #[inline]
    pub fn next(&self) -> Option<ImportXRefId> {
        self.next.get()
    }
}

/// Append-only arena of [`ExportXRef`]s, indexed by [`ExportXRefId`].
#[derive(Default)]
pub struct ExportXRefArena {
    entries: Vec<ExportXRef>,
}

impl ExportXRefArena {
    pub fn push(&mut self, xref: ExportXRef) -> ExportXRefId {
        let id = ExportXRefId::new(self.entries.len());
        self.entries.push(xref);
        id
    }

    #[inline]
    pub fn get(&self, id: ExportXRefId) -> &ExportXRef {
        &self.entries[id.index()]
    }

    /// Appends `id` to the tail of the exporter list rooted at `head`/`tail`,
    /// returning the new `(head, tail)` pair. This is the fixup-time
    /// list-append described in §4.3: order is preserved as ingest order.
    pub fn push_back(
        &self,
        head: Option<ExportXRefId>,
        tail: Option<ExportXRefId>,
        id: ExportXRefId,
    ) -> (Option<ExportXRefId>, Option<ExportXRefId>) {
        match tail {
            Some(tail_id) => {
                self.get(tail_id).next.set(Some(id));
                (head, Some(id))
            }
            None => (Some(id), Some(id)),
        }
    }

    /// Iterates an exporter list head-first.
    pub fn iter_from(&self, head: Option<ExportXRefId>) -> ExportXRefIter<'_> {
        ExportXRefIter {
            arena: self,
            cursor: head,
        }
    }
}

pub struct ExportXRefIter<'a> {
    arena: &'a ExportXRefArena,
    cursor: Option<ExportXRefId>,
}

impl<'a> Iterator for ExportXRefIter<'a> {
    type Item = (ExportXRefId, &'a ExportXRef);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let xref = self.arena.get(id);
        self.cursor = xref.next();
        Some((id, xref))
    }
}

/// Append-only arena of [`ImportXRef`]s, indexed by [`ImportXRefId`].
#[derive(Default)]
pub struct ImportXRefArena {
    entries: Vec<ImportXRef>,
}

impl ImportXRefArena {
    pub fn push(&mut self, xref: ImportXRef) -> ImportXRefId {
        let id = ImportXRefId::new(self.entries.len());
        self.entries.push(xref);
        id
    }

    #[inline]
    pub fn get(&self, id: ImportXRefId) -> &ImportXRef {
        &self.entries[id.index()]
    }

    #[inline]
    fn set_next(&self, id: ImportXRefId, next: Option<ImportXRefId>) {
        self.get(id).next.set(next);
    }

    /// Pushes `id` onto the head of the importer list, as the link engine
    /// does in step 3 of §4.4's `linkObj` contract.
    pub fn push_front(&self, head: Option<ImportXRefId>, id: ImportXRefId) -> Option<ImportXRefId> {
        debug_assert!(
            self.get(id).next().is_none(),
            "import xref linked into an importer list twice"
        );
        self.set_next(id, head);
        Some(id)
    }

    /// Removes `id` from the importer list rooted at `head`, first-match,
    /// splicing around it. Returns the (possibly unchanged) new head.
    ///
    /// Used by the unlink engine (§4.6), which must detach every import of a
    /// removed object from the symbols it referenced.
    pub fn remove(&self, head: Option<ImportXRefId>, id: ImportXRefId) -> Option<ImportXRefId> {
        let mut prev: Option<ImportXRefId> = None;
        let mut cursor = head;

        while let Some(cur) = cursor {
            if cur == id {
                let next = self.get(cur).next();
                self.get(cur).next.set(None);
                return match prev {
                    Some(prev_id) => {
                        self.set_next(prev_id, next);
                        head
                    }
                    None => next,
                };
            }
            prev = Some(cur);
            cursor = self.get(cur).next();
        }

        unreachable!("import xref not found in its own symbol's importer list");
    }

    pub fn iter_from(&self, head: Option<ImportXRefId>) -> ImportXRefIter<'_> {
        ImportXRefIter {
            arena: self,
            cursor: head,
        }
    }
}

pub struct ImportXRefIter<'a> {
    arena: &'a ImportXRefArena,
    cursor: Option<ImportXRefId>,
}

impl<'a> Iterator for ImportXRefIter<'a> {
    type Item = (ImportXRefId, &'a ImportXRef);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let xref = self.arena.get(id);
        self.cursor = xref.next();
        Some((id, xref))
    }
}
