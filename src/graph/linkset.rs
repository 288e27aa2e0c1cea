//! Link sets (§3): the `Application`, `Optional`, and `UNDEFINED` buckets
//! that every object belongs to exactly once.

use std::cell::Cell;

use crate::ids::ObjId;

/// Which of the three canonical link sets an object belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSetKind {
    /// Mandatory objects and everything transitively reachable from them.
    Application,
    /// Objects reachable only from the optional seed files.
    Optional,
    /// Holds only the sentinel `U*` pseudo-object.
    Undefined,
}

impl LinkSetKind {
    pub fn title(self) -> &'static str {
        match self {
            LinkSetKind::Application => "Application",
            LinkSetKind::Optional => "Optional",
            LinkSetKind::Undefined => "UNDEFINED",
        }
    }
}

/// A named bucket holding the singly-linked list of objects currently
/// assigned to it. Iteration is LIFO with respect to linking time, since
/// insertion is always at the head (§5).
#[derive(Default)]
pub struct LinkSet {
    head: Cell<Option<ObjId>>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self {
            head: Cell::new(None),
        }
    }

    #[inline]
    pub fn head(&self) -> Option<ObjId> {
        self.head.get()
    }

    #[inline]
    pub(super) fn set_head(&self, head: Option<ObjId>) {
        self.head.set(head);
    }
}

/// The three canonical link sets (§3), addressable by [`LinkSetKind`].
#[derive(Default)]
pub struct LinkSets {
    application: LinkSet,
    optional: LinkSet,
    undefined: LinkSet,
}

impl LinkSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: LinkSetKind) -> &LinkSet {
        match kind {
            LinkSetKind::Application => &self.application,
            LinkSetKind::Optional => &self.optional,
            LinkSetKind::Undefined => &self.undefined,
        }
    }
}
