//! Stable index types used in place of the raw pointers the reference tool
//! chases. Every node/edge lives in an append-only `Vec` inside [`crate::graph::LinkGraph`]
//! and is referred to by one of these small `Copy` handles instead.

use std::fmt;

macro_rules! index_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub(crate) fn new(index: usize) -> Self {
                Self(index as u32)
            }

            #[inline]
            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

index_id!(SymId, "Handle for a [`crate::graph::symtab::Symbol`].");
index_id!(ObjId, "Handle for a [`crate::graph::object::Object`].");
index_id!(LibId, "Handle for a [`crate::graph::library::Library`].");
index_id!(
    ExportXRefId,
    "Handle for a [`crate::graph::xref::ExportXRef`]."
);
index_id!(
    ImportXRefId,
    "Handle for a [`crate::graph::xref::ImportXRef`]."
);

/// The sentinel object `U*` is always the first object created, so it has a
/// fixed, well-known id.
pub const UNDEF_OBJ: ObjId = ObjId(0);
