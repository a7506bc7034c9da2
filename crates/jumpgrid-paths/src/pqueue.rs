//! Binary heap of node handles with decrease-key.
//!
//! Every queued node records its array position in
//! [`SearchNode::heap_index`](crate::SearchNode), so membership tests and key
//! updates are O(1) to locate and O(log n) to repair. Ties on f are broken in
//! favour of the larger g, which prefers nodes closer to the goal.

use crate::node::{NOT_QUEUED, NodeRef};
use crate::pool::NodePool;

/// Initial heap capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Open list for best-first search.
#[derive(Debug, Clone)]
pub struct PriorityQueue {
    heap: Vec<NodeRef>,
    min_queue: bool,
}

impl Default for PriorityQueue {
    fn default() -> Self {
        Self::new(true)
    }
}

impl PriorityQueue {
    /// A min-queue (`min_queue = true`, lowest f on top) or a max-queue.
    pub fn new(min_queue: bool) -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY, min_queue)
    }

    pub fn with_capacity(capacity: usize, min_queue: bool) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            min_queue,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_min_queue(&self) -> bool {
        self.min_queue
    }

    /// Remove every entry, keeping the allocation.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Whether `n` is queued.
    #[inline]
    pub fn contains(&self, n: NodeRef, pool: &NodePool) -> bool {
        let i = pool[n].heap_index as usize;
        i < self.heap.len() && self.heap[i] == n
    }

    /// The best node without removing it.
    #[inline]
    pub fn peek(&self) -> Option<NodeRef> {
        self.heap.first().copied()
    }

    pub fn push(&mut self, n: NodeRef, pool: &mut NodePool) {
        let i = self.heap.len();
        self.heap.push(n);
        pool[n].heap_index = i as u32;
        self.sift_up(i, pool);
    }

    /// Remove and return the best node.
    pub fn pop(&mut self, pool: &mut NodePool) -> Option<NodeRef> {
        let last = self.heap.pop()?;
        let top = match self.heap.first_mut() {
            Some(first) => std::mem::replace(first, last),
            None => last,
        };
        pool[top].heap_index = NOT_QUEUED;
        if !self.heap.is_empty() {
            pool[last].heap_index = 0;
            self.sift_down(0, pool);
        }
        Some(top)
    }

    /// Restore order after `n`'s f has decreased.
    pub fn decrease_key(&mut self, n: NodeRef, pool: &mut NodePool) {
        let i = pool[n].heap_index as usize;
        if self.min_queue {
            self.sift_up(i, pool);
        } else {
            self.sift_down(i, pool);
        }
    }

    /// Restore order after `n`'s f has increased.
    pub fn increase_key(&mut self, n: NodeRef, pool: &mut NodePool) {
        let i = pool[n].heap_index as usize;
        if self.min_queue {
            self.sift_down(i, pool);
        } else {
            self.sift_up(i, pool);
        }
    }

    /// Check the heap order and every stored position.
    pub fn is_valid(&self, pool: &NodePool) -> bool {
        self.heap.iter().enumerate().all(|(i, n)| {
            let ordered = i == 0 || !self.before(*n, self.heap[(i - 1) / 2], pool);
            ordered && pool[*n].heap_index as usize == i
        })
    }

    /// Whether `a` belongs above `b`.
    #[inline]
    fn before(&self, a: NodeRef, b: NodeRef, pool: &NodePool) -> bool {
        let (a, b) = (&pool[a], &pool[b]);
        let better_f = if self.min_queue { a.f < b.f } else { a.f > b.f };
        better_f || (a.f == b.f && a.g > b.g)
    }

    fn swap(&mut self, i: usize, j: usize, pool: &mut NodePool) {
        self.heap.swap(i, j);
        pool[self.heap[i]].heap_index = i as u32;
        pool[self.heap[j]].heap_index = j as u32;
    }

    fn sift_up(&mut self, mut i: usize, pool: &mut NodePool) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.before(self.heap[i], self.heap[parent], pool) {
                break;
            }
            self.swap(i, parent, pool);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize, pool: &mut NodePool) {
        let len = self.heap.len();
        loop {
            let left = 2 * i + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.before(self.heap[right], self.heap[left], pool) {
                right
            } else {
                left
            };
            if !self.before(self.heap[child], self.heap[i], pool) {
                break;
            }
            self.swap(i, child, pool);
            i = child;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};

    fn node(pool: &mut NodePool, id: u32, g: u32, f: u32) -> NodeRef {
        let r = pool.generate(id);
        pool[r].reset(1);
        pool[r].g = g;
        pool[r].f = f;
        r
    }

    #[test]
    fn pops_in_f_order_with_g_tie_break() {
        let mut pool = NodePool::new(64);
        let mut q = PriorityQueue::new(true);
        for (id, g, f) in [(1, 0, 30), (2, 5, 10), (3, 9, 10), (4, 1, 20)] {
            let n = node(&mut pool, id, g, f);
            q.push(n, &mut pool);
        }
        assert!(q.is_valid(&pool));
        let mut order = Vec::new();
        while let Some(n) = q.pop(&mut pool) {
            order.push(pool[n].id());
        }
        assert_eq!(order, vec![3, 2, 4, 1]);
        assert!(q.is_empty());
    }

    #[test]
    fn max_queue_order() {
        let mut pool = NodePool::new(64);
        let mut q = PriorityQueue::new(false);
        for (id, f) in [(1, 3), (2, 9), (3, 5)] {
            let n = node(&mut pool, id, 0, f);
            q.push(n, &mut pool);
        }
        assert_eq!(q.pop(&mut pool).map(|n| pool[n].id()), Some(2));
        assert_eq!(q.pop(&mut pool).map(|n| pool[n].id()), Some(3));
        assert!(q.is_valid(&pool));
    }

    #[test]
    fn contains_and_decrease_key() {
        let mut pool = NodePool::new(64);
        let mut q = PriorityQueue::default();
        let a = node(&mut pool, 1, 0, 50);
        let b = node(&mut pool, 2, 0, 40);
        let c = node(&mut pool, 3, 0, 60);
        q.push(a, &mut pool);
        q.push(b, &mut pool);
        assert!(q.contains(a, &pool));
        assert!(!q.contains(c, &pool));

        pool[a].f = 10;
        q.decrease_key(a, &mut pool);
        assert_eq!(q.peek(), Some(a));
        assert!(q.is_valid(&pool));

        pool[a].f = 90;
        q.increase_key(a, &mut pool);
        assert_eq!(q.peek(), Some(b));
        assert!(q.is_valid(&pool));

        assert_eq!(q.pop(&mut pool), Some(b));
        assert!(!q.contains(b, &pool));
        q.clear();
        assert!(!q.contains(a, &pool));
    }

    #[test]
    fn random_operations_keep_heap_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut pool = NodePool::new(4096);
        let mut q = PriorityQueue::with_capacity(4, true);
        let mut queued = Vec::new();
        for step in 0..2000u32 {
            match rng.random_range(0..3) {
                0 | 1 => {
                    let n = node(&mut pool, step, rng.random_range(0..100), rng.random_range(0..1000));
                    q.push(n, &mut pool);
                    queued.push(n);
                }
                _ => {
                    if let Some(&n) = queued.get(rng.random_range(0..queued.len().max(1))) {
                        if q.contains(n, &pool) && pool[n].f > 0 {
                            let f = rng.random_range(0..pool[n].f);
                            pool[n].f = f;
                            q.decrease_key(n, &mut pool);
                        }
                    }
                    if rng.random_range(0..2) == 0 {
                        let top = q.peek();
                        let popped = q.pop(&mut pool);
                        assert_eq!(top, popped);
                    }
                }
            }
            assert!(q.is_valid(&pool), "heap broken at step {step}");
        }
        let mut last = 0;
        while let Some(n) = q.pop(&mut pool) {
            assert!(pool[n].f >= last);
            last = pool[n].f;
        }
    }
}
