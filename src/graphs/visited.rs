use bit_vec::BitVec;
use std::hash::Hash;

use crate::set::Set;

pub trait Visited<V>: Default {
    /// Marks `value` as visited. Returns true only the first time.
    fn visit(&mut self, value: V) -> bool;

    fn is_visited(&self, value: &V) -> bool;
}

/// Handles that map onto a dense `0..n` range inside their own arena.
///
/// Lets a [`BitVec`] serve as the visited set for a single traversal.
pub trait DenseIndex: Copy {
    fn dense_index(self) -> usize;
}

impl DenseIndex for usize {
    #[inline]
    fn dense_index(self) -> usize {
        self
    }
}

impl<V> Visited<V> for Set<V>
where
    V: Eq + Hash + Copy,
{
    #[inline]
    fn visit(&mut self, value: V) -> bool {
        self.insert(value)
    }

    #[inline]
    fn is_visited(&self, value: &V) -> bool {
        self.contains(value)
    }
}

impl<V: DenseIndex> Visited<V> for BitVec {
    #[inline]
    fn visit(&mut self, value: V) -> bool {
        let index = value.dense_index();
        let len = self.len();
        if index >= len {
            self.grow(index + 1 - len, false);
        }

        if !self[index] {
            self.set(index, true);
            true
        } else {
            false
        }
    }

    #[inline]
    fn is_visited(&self, value: &V) -> bool {
        self.get(value.dense_index()).unwrap_or(false)
    }
}
