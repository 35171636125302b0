use std::{collections::VecDeque, mem};

use thiserror::Error;

/// Failures raised by the bounded frontier containers.
///
/// The traversal engine never swallows these; they reach the caller as
/// [`GraphError::Frontier`](crate::GraphError::Frontier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrontierError {
    #[error("frontier overflow: capacity {capacity} reached")]
    Overflow { capacity: usize },

    #[error("frontier underflow: nothing to remove")]
    Underflow,

    #[error("invalid frontier size {0}")]
    InvalidSize(usize),

    #[error("cannot remove {requested} items from a frontier holding {available}")]
    InvalidAmount { requested: usize, available: usize },
}

/// Working set of items awaiting expansion.
///
/// The removal discipline is what separates depth-first from breadth-first
/// search: [`Stack`] is LIFO, [`Queue`] is FIFO.
pub trait Frontier<T> {
    fn push(&mut self, item: T) -> Result<(), FrontierError>;

    fn pop(&mut self) -> Result<T, FrontierError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_capacity(capacity: Option<usize>, len: usize) -> Result<(), FrontierError> {
    match capacity {
        Some(capacity) if len >= capacity => Err(FrontierError::Overflow { capacity }),
        _ => Ok(()),
    }
}

fn check_amount(requested: usize, available: usize) -> Result<(), FrontierError> {
    if requested == 0 || requested > available {
        return Err(FrontierError::InvalidAmount {
            requested,
            available,
        });
    }
    Ok(())
}

/// LIFO frontier, optionally bounded.
#[derive(Debug, Clone)]
pub struct Stack<T> {
    items: Vec<T>,
    capacity: Option<usize>,
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Stack<T> {
    /// Unbounded stack.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            capacity: None,
        }
    }

    /// Stack that refuses to hold more than `capacity` items.
    ///
    /// A zero capacity could never accept an item and is rejected.
    pub fn with_capacity(capacity: usize) -> Result<Self, FrontierError> {
        if capacity == 0 {
            return Err(FrontierError::InvalidSize(capacity));
        }
        Ok(Self {
            items: Vec::with_capacity(capacity),
            capacity: Some(capacity),
        })
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    /// Removes the `amount` most recently pushed items, newest first.
    pub fn pop_many(&mut self, amount: usize) -> Result<Vec<T>, FrontierError> {
        check_amount(amount, self.items.len())?;
        let split = self.items.len() - amount;
        let mut popped = self.items.split_off(split);
        popped.reverse();
        Ok(popped)
    }
}

impl<T> Frontier<T> for Stack<T> {
    fn push(&mut self, item: T) -> Result<(), FrontierError> {
        check_capacity(self.capacity, self.items.len())?;
        self.items.push(item);
        Ok(())
    }

    fn pop(&mut self) -> Result<T, FrontierError> {
        self.items.pop().ok_or(FrontierError::Underflow)
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// FIFO frontier, optionally bounded.
#[derive(Debug, Clone)]
pub struct Queue<T> {
    items: VecDeque<T>,
    capacity: Option<usize>,
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Queue<T> {
    /// Unbounded queue.
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
            capacity: None,
        }
    }

    /// Queue that refuses to hold more than `capacity` items.
    pub fn with_capacity(capacity: usize) -> Result<Self, FrontierError> {
        if capacity == 0 {
            return Err(FrontierError::InvalidSize(capacity));
        }
        Ok(Self {
            items: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
        })
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    /// Removes the `amount` oldest items, oldest first.
    pub fn dequeue_many(&mut self, amount: usize) -> Result<Vec<T>, FrontierError> {
        check_amount(amount, self.items.len())?;
        Ok(self.items.drain(..amount).collect())
    }
}

impl<T> Frontier<T> for Queue<T> {
    fn push(&mut self, item: T) -> Result<(), FrontierError> {
        check_capacity(self.capacity, self.items.len())?;
        self.items.push_back(item);
        Ok(())
    }

    fn pop(&mut self) -> Result<T, FrontierError> {
        self.items.pop_front().ok_or(FrontierError::Underflow)
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// Frontier processed one whole layer at a time.
///
/// Each [`step`](Self::step) hands the current layer to `expand`, which
/// fills the next one. Used by the layered BFS iterator.
#[derive(Default)]
pub struct LayeredFrontier<T> {
    frontier: Vec<T>,
    next: Vec<T>,
}

impl<T> LayeredFrontier<T> {
    pub fn new<I: IntoIterator<Item = T>>(initial: I) -> Self {
        let mut frontier = Vec::new();
        frontier.extend(initial);
        Self {
            frontier,
            next: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    pub fn layer(&self) -> &[T] {
        &self.frontier
    }

    pub fn len(&self) -> usize {
        self.frontier.len()
    }

    pub fn step<F>(&mut self, expand: F) -> Option<Vec<T>>
    where
        F: FnOnce(&[T], &mut Vec<T>),
    {
        if self.frontier.is_empty() {
            return None;
        }

        let current = mem::take(&mut self.frontier);
        self.next.clear();

        expand(&current, &mut self.next);

        self.frontier = mem::take(&mut self.next);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_is_lifo() {
        let mut stack = Stack::new();
        for v in 0..4 {
            stack.push(v).unwrap();
        }
        assert_eq!(stack.peek(), Some(&3));
        assert_eq!(stack.pop(), Ok(3));
        assert_eq!(stack.pop_many(2), Ok(vec![2, 1]));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn queue_is_fifo() {
        let mut queue = Queue::new();
        for v in 0..4 {
            queue.push(v).unwrap();
        }
        assert_eq!(queue.peek(), Some(&0));
        assert_eq!(queue.pop(), Ok(0));
        assert_eq!(queue.dequeue_many(2), Ok(vec![1, 2]));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn empty_frontiers_underflow() {
        let mut stack: Stack<u8> = Stack::new();
        let mut queue: Queue<u8> = Queue::new();
        assert_eq!(stack.pop(), Err(FrontierError::Underflow));
        assert_eq!(queue.pop(), Err(FrontierError::Underflow));
    }

    #[test]
    fn bounded_frontiers_overflow() {
        let mut stack = Stack::with_capacity(2).unwrap();
        stack.push('a').unwrap();
        stack.push('b').unwrap();
        assert_eq!(stack.push('c'), Err(FrontierError::Overflow { capacity: 2 }));

        let mut queue = Queue::with_capacity(1).unwrap();
        queue.push('a').unwrap();
        assert_eq!(queue.push('b'), Err(FrontierError::Overflow { capacity: 1 }));
        assert_eq!(queue.pop(), Ok('a'));
        assert!(queue.push('b').is_ok());
    }

    #[test]
    fn zero_capacity_is_invalid() {
        assert_eq!(
            Stack::<u8>::with_capacity(0).unwrap_err(),
            FrontierError::InvalidSize(0)
        );
        assert_eq!(
            Queue::<u8>::with_capacity(0).unwrap_err(),
            FrontierError::InvalidSize(0)
        );
    }

    #[test]
    fn bulk_removal_checks_amount() {
        let mut stack: Stack<u8> = Stack::new();
        stack.push(1).unwrap();
        assert_eq!(
            stack.pop_many(2),
            Err(FrontierError::InvalidAmount {
                requested: 2,
                available: 1
            })
        );
        assert_eq!(
            stack.pop_many(0),
            Err(FrontierError::InvalidAmount {
                requested: 0,
                available: 1
            })
        );

        let mut queue: Queue<u8> = Queue::new();
        assert!(matches!(
            queue.dequeue_many(1),
            Err(FrontierError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn layered_frontier_steps_through_layers() {
        let mut frontier = LayeredFrontier::new([1u32]);
        let first = frontier.step(|current, next| {
            for v in current {
                next.push(v * 2);
                next.push(v * 3);
            }
        });
        assert_eq!(first, Some(vec![1]));
        assert_eq!(frontier.layer(), &[2, 3]);

        let second = frontier.step(|_, _| {});
        assert_eq!(second, Some(vec![2, 3]));
        assert!(frontier.is_empty());
        assert_eq!(frontier.step(|_, _| {}), None);
    }
}
