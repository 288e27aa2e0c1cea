//! C4: library registry.

use indexmap::IndexMap;

use crate::ids::{LibId, ObjId};

/// An archive grouping [`crate::graph::object::Object`]s (§3). Member names
/// are unique within one library, enforced at insertion.
pub struct Library<'arena> {
    name: &'arena str,
    members: Vec<ObjId>,
    member_names: Vec<&'arena str>,
}

impl<'arena> Library<'arena> {
    fn new(name: &'arena str) -> Self {
        Self {
            name,
            members: Vec::new(),
            member_names: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &'arena str {
        self.name
    }

    #[inline]
    pub fn members(&self) -> &[ObjId] {
        &self.members
    }
}

#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("duplicate member name in library")]
pub struct DuplicateLibraryMember;

/// Groups objects by their containing archive, looked up by exact name
/// (§4.3). A linear scan over libraries is acceptable per the spec; this
/// uses an [`IndexMap`] instead purely because it is the ordered-map crate
/// already in the dependency stack, not because the scan would be a
/// bottleneck.
#[derive(Default)]
pub struct LibraryRegistry<'arena> {
    libraries: Vec<Library<'arena>>,
    by_name: IndexMap<&'arena str, LibId>,
}

impl<'arena> LibraryRegistry<'arena> {
    pub fn new() -> Self {
        Self {
            libraries: Vec::new(),
            by_name: IndexMap::new(),
        }
    }

    /// Finds the library named `name`, creating it if absent.
    pub fn get_or_create(&mut self, name: &'arena str) -> LibId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }

        let id = LibId::new(self.libraries.len());
        self.libraries.push(Library::new(name));
        self.by_name.insert(name, id);
        id
    }

    pub fn find(&self, name: &str) -> Option<LibId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn get(&self, id: LibId) -> &Library<'arena> {
        &self.libraries[id.index()]
    }

    /// Appends `obj` as a member named `member_name` of `lib`, rejecting a
    /// duplicate member name (§3's "distinctness" invariant).
    pub fn add_member(
        &mut self,
        lib: LibId,
        member_name: &'arena str,
        obj: ObjId,
    ) -> Result<(), DuplicateLibraryMember> {
        let library = &mut self.libraries[lib.index()];
        if library.member_names.iter().any(|&n| n == member_name) {
            return Err(DuplicateLibraryMember);
        }
        library.members.push(obj);
        library.member_names.push(member_name);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}
