//=========================================================================
// Identity Allocator
//=========================================================================
//
// Hands out unique, strictly increasing object identities.
//
// Each scheduler owns exactly one allocator and lends it to scenes while
// they populate themselves, so identities never come from hidden global
// state.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::fmt;

//=== ObjectId ============================================================

/// Identity of a game object, unique within the allocator that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Raw numeric value of the identity.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//=== IdAllocator =========================================================

/// Monotonic counter for [`ObjectId`]s.
///
/// Allocation only needs `&self`, so a shared reference can be passed to
/// scene initialization without giving away the scheduler.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: Cell<u64>,
}

impl IdAllocator {
    /// Creates an allocator whose first identity is `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh identity, greater than every one issued before.
    pub fn next(&self) -> ObjectId {
        let id = self.next.get();
        self.next.set(id + 1);
        ObjectId(id)
    }

    /// Number of identities issued so far.
    pub fn issued(&self) -> u64 {
        self.next.get()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
