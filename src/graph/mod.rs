//! The in-memory object/symbol graph (§2-§5) and the operations over it.
//!
//! [`LinkGraph`] owns every node and cross-reference arena. Individual
//! operations are split across sibling modules the way the teacher spreads
//! `LinkGraph` behavior across `graph/{link,built,spec}.rs`: construction and
//! field access live here, while ingest, linking, traversal, unlinking,
//! diagnostics, and query each get their own `impl<'arena> LinkGraph<'arena>`
//! block in a dedicated file.

pub mod diagnostics;
pub mod ingest;
pub mod library;
pub mod link;
pub mod linkset;
pub mod object;
pub mod query;
pub mod symtab;
pub mod traverse;
pub mod unlink;
pub mod xref;

use crate::arena::NameArena;
use crate::ids::{ObjId, UNDEF_OBJ};

use library::LibraryRegistry;
use linkset::{LinkSetKind, LinkSets};
use object::{Object, ObjectStore};
use symtab::SymbolTable;
use xref::{ExportXRefArena, ImportXRefArena};

/// The sentinel object's display name, matching the reference tool's
/// `<UNDEFINED>`.
pub const UNDEF_OBJ_NAME: &str = "<UNDEFINED>";

/// The full object/symbol graph (§3). Parameterized over the lifetime of the
/// [`NameArena`] backing every interned name.
pub struct LinkGraph<'arena> {
    arena: &'arena NameArena,
    symbols: SymbolTable<'arena>,
    objects: ObjectStore<'arena>,
    libraries: LibraryRegistry<'arena>,
    export_xrefs: ExportXRefArena,
    import_xrefs: ImportXRefArena,
    link_sets: LinkSets,
}

impl<'arena> LinkGraph<'arena> {
    /// Creates an empty graph backed by `arena`, with the sentinel `U*`
    /// object already created and assigned to the `UNDEFINED` link set.
    pub fn new(arena: &'arena NameArena) -> Self {
        let mut objects = ObjectStore::new();
        let sentinel_name = arena.intern(UNDEF_OBJ_NAME);
        let sentinel = objects.push(Object::new(sentinel_name, None));
        debug_assert_eq!(sentinel, UNDEF_OBJ);

        let link_sets = LinkSets::new();
        objects.get(sentinel).set_link_set(Some(LinkSetKind::Undefined));
        link_sets.get(LinkSetKind::Undefined).set_head(Some(sentinel));

        Self {
            arena,
            symbols: SymbolTable::new(),
            objects,
            libraries: LibraryRegistry::new(),
            export_xrefs: ExportXRefArena::default(),
            import_xrefs: ImportXRefArena::default(),
            link_sets,
        }
    }

    #[inline]
    pub fn sentinel(&self) -> ObjId {
        UNDEF_OBJ
    }

    #[inline]
    pub fn arena(&self) -> &'arena NameArena {
        self.arena
    }

    #[inline]
    pub fn symbols(&self) -> &SymbolTable<'arena> {
        &self.symbols
    }

    #[inline]
    pub fn objects(&self) -> &ObjectStore<'arena> {
        &self.objects
    }

    #[inline]
    pub fn libraries(&self) -> &LibraryRegistry<'arena> {
        &self.libraries
    }

    #[inline]
    pub fn link_sets(&self) -> &LinkSets {
        &self.link_sets
    }

    #[inline]
    pub fn export_xrefs(&self) -> &ExportXRefArena {
        &self.export_xrefs
    }

    #[inline]
    pub fn import_xrefs(&self) -> &ImportXRefArena {
        &self.import_xrefs
    }

    /// Renders `obj`'s display name the way the reference tool's
    /// `printObjName` does: `lib[member]` if part of a library, else just
    /// the object name.
    pub fn object_display(&self, obj: ObjId) -> String {
        let object = self.objects.get(obj);
        match object.library() {
            Some(lib) => format!("{}[{}]", self.libraries.get(lib).name(), object.name()),
            None => object.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_graph_has_only_the_sentinel() {
        let arena = NameArena::new();
        let graph = LinkGraph::new(&arena);

        assert_eq!(graph.objects().len(), 1);
        assert_eq!(graph.sentinel(), UNDEF_OBJ);
        assert_eq!(
            graph.link_sets().get(LinkSetKind::Undefined).head(),
            Some(UNDEF_OBJ)
        );
        assert!(graph.link_sets().get(LinkSetKind::Application).head().is_none());
    }
}
