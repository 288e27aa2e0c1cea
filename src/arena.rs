//! C1: bump-allocated storage for object, library, and symbol names.
//!
//! The reference tool hand-rolls a 10 000 byte chunked bump allocator
//! (`stralloc` in the original source) and reserves `name[-1]` for the
//! symbol's type byte. This reimplementation uses [`bumpalo`] for the chunked
//! allocation (the same crate the teacher uses for its link graph) and keeps
//! the type byte as an ordinary struct field instead of a pointer trick.

/// Block size used to seed the arena's first chunk, matching the reference
/// tool's `STRCHUNK`.
const NAME_ARENA_BLOCK: usize = 10_000;

/// Arena backing every name ever interned by the graph. Lives for as long as
/// the [`crate::graph::LinkGraph`] it backs.
pub struct NameArena {
    bump: bumpalo::Bump,
}

impl NameArena {
    pub fn new() -> NameArena {
        NameArena {
            bump: bumpalo::Bump::with_capacity(NAME_ARENA_BLOCK),
        }
    }

    /// Copies `s` into the arena and returns a reference with the arena's
    /// lifetime. Equivalent to `stralloc` + `strcpy` in the reference tool.
    pub fn intern<'arena>(&'arena self, s: &str) -> &'arena str {
        self.bump.alloc_str(s)
    }
}

impl Default for NameArena {
    fn default() -> Self {
        Self::new()
    }
}
