use jumpgrid_core::{Cost, Direction, PaddedId, UNREACHABLE};

/// Handle of a node inside a [`NodePool`](crate::NodePool).
///
/// Handles stay valid until the pool is cleared.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef(pub(crate) u32);

/// Heap index of a node that is not in any queue.
pub(crate) const NOT_QUEUED: u32 = u32::MAX;

/// Book-keeping for one grid cell during a search.
#[derive(Clone, Debug)]
pub struct SearchNode {
    pub(crate) id: PaddedId,
    pub(crate) g: Cost,
    pub(crate) f: Cost,
    pub(crate) parent: Option<NodeRef>,
    pub(crate) expanded: bool,
    pub(crate) heap_index: u32,
    pub(crate) search_id: u32,
    pub(crate) pdir: Option<Direction>,
}

impl SearchNode {
    pub(crate) fn new(id: PaddedId) -> Self {
        Self {
            id,
            g: UNREACHABLE,
            f: UNREACHABLE,
            parent: None,
            expanded: false,
            heap_index: NOT_QUEUED,
            search_id: 0,
            pdir: None,
        }
    }

    /// Forget everything from earlier searches and stamp the node as live in
    /// `search_id`.
    pub(crate) fn reset(&mut self, search_id: u32) {
        *self = Self {
            search_id,
            ..Self::new(self.id)
        };
    }

    /// Lower g through a new parent, keeping the heuristic part of f.
    pub(crate) fn relax(&mut self, g: Cost, parent: NodeRef, pdir: Option<Direction>) {
        debug_assert!(g < self.g);
        self.f = self.f - self.g + g;
        self.g = g;
        self.parent = Some(parent);
        self.pdir = pdir;
    }

    pub fn id(&self) -> PaddedId {
        self.id
    }

    pub fn g(&self) -> Cost {
        self.g
    }

    pub fn f(&self) -> Cost {
        self.f
    }

    pub fn parent(&self) -> Option<NodeRef> {
        self.parent
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn search_id(&self) -> u32 {
        self.search_id
    }

    /// Direction of travel when the node was reached; `None` for the start.
    pub fn pdir(&self) -> Option<Direction> {
        self.pdir
    }
}
