/// Maximum nesting the DFXP traversals descend into
pub const MAX_STACK_DEPTH: usize = 10;

/// Explicit traversal stack with a fixed capacity.
///
/// Pushing onto a full stack fails; callers then skip the subtree instead of
/// descending, so deeply nested documents are truncated rather than rejected.
#[derive(Debug)]
pub(crate) struct DepthStack<T> {
    items: Vec<T>,
}

impl<T> DepthStack<T> {
    pub(crate) fn new() -> Self {
        Self {
            items: Vec::with_capacity(MAX_STACK_DEPTH),
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.items.len() >= MAX_STACK_DEPTH
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.items.len()
    }

    /// Returns false, leaving the stack unchanged, when it is full
    pub(crate) fn try_push(&mut self, item: T) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push(item);
        true
    }

    pub(crate) fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub(crate) fn last(&self) -> Option<&T> {
        self.items.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_push() {
        let mut stack = DepthStack::new();
        for i in 0..MAX_STACK_DEPTH {
            assert!(stack.try_push(i));
        }
        assert!(stack.is_full());
        assert!(!stack.try_push(99));
        assert_eq!(stack.depth(), MAX_STACK_DEPTH);
        assert_eq!(stack.last(), Some(&(MAX_STACK_DEPTH - 1)));
        assert_eq!(stack.pop(), Some(MAX_STACK_DEPTH - 1));
        assert!(!stack.is_full());
        assert!(!stack.is_empty());
    }
}
