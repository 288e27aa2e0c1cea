//! C3: object store.

use std::cell::Cell;

use crate::ids::{ExportXRefId, ImportXRefId, LibId, ObjId};
use crate::graph::linkset::LinkSetKind;

/// A single compilation unit, possibly a member of a [`crate::graph::library::Library`]
/// (§3). Objects are never deleted; unlinking only detaches them from a
/// [`crate::graph::linkset::LinkSet`].
pub struct Object<'arena> {
    name: &'arena str,
    lib: Option<LibId>,

    /// This object's own exports, in ingest order. Grown only while this is
    /// the "current" object during ingest (§4.3's growth invariant).
    exports: Vec<ExportXRefId>,

    /// This object's own imports, in ingest order.
    imports: Vec<ImportXRefId>,

    link_set: Cell<Option<LinkSetKind>>,
    next_in_set: Cell<Option<ObjId>>,

    /// Scratch slot for the traversal engine (§4.5). `true` while this
    /// object is considered "visited" by the walk currently in progress.
    visited: Cell<bool>,
}

impl<'arena> Object<'arena> {
    pub(super) fn new(name: &'arena str, lib: Option<LibId>) -> Self {
        Self {
            name,
            lib,
            exports: Vec::new(),
            imports: Vec::new(),
            link_set: Cell::new(None),
            next_in_set: Cell::new(None),
            visited: Cell::new(false),
        }
    }

    #[inline]
    pub fn name(&self) -> &'arena str {
        self.name
    }

    #[inline]
    pub fn library(&self) -> Option<LibId> {
        self.lib
    }

    #[inline]
    pub fn exports(&self) -> &[ExportXRefId] {
        &self.exports
    }

    #[inline]
    pub fn imports(&self) -> &[ImportXRefId] {
        &self.imports
    }

    pub(super) fn push_export(&mut self, id: ExportXRefId) {
        self.exports.push(id);
    }

    pub(super) fn push_import(&mut self, id: ImportXRefId) {
        self.imports.push(id);
    }

    #[inline]
    pub fn link_set(&self) -> Option<LinkSetKind> {
        self.link_set.get()
    }

    #[inline]
    pub(super) fn set_link_set(&self, kind: Option<LinkSetKind>) {
        self.link_set.set(kind);
    }

    #[inline]
    pub fn next_in_set(&self) -> Option<ObjId> {
        self.next_in_set.get()
    }

    #[inline]
    pub(super) fn set_next_in_set(&self, next: Option<ObjId>) {
        self.next_in_set.set(next);
    }

    #[inline]
    pub(crate) fn visited(&self) -> bool {
        self.visited.get()
    }

    #[inline]
    pub(crate) fn set_visited(&self, visited: bool) {
        self.visited.set(visited);
    }
}

/// Append-only sequence of [`Object`]s (C3), indexed by [`ObjId`].
#[derive(Default)]
pub struct ObjectStore<'arena> {
    objects: Vec<Object<'arena>>,
}

impl<'arena> ObjectStore<'arena> {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    pub fn push(&mut self, object: Object<'arena>) -> ObjId {
        let id = ObjId::new(self.objects.len());
        self.objects.push(object);
        id
    }

    #[inline]
    pub fn get(&self, id: ObjId) -> &Object<'arena> {
        &self.objects[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: ObjId) -> &mut Object<'arena> {
        &mut self.objects[id.index()]
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjId> {
        (0..self.objects.len()).map(ObjId::new)
    }
}
