use crate::data::Data;
use crate::error::{Error, Result};
use std::io;

// Cell Stack /////////////////////////////////////////////////////////////////
//
// The single integer stack every operation works on. Index 0 is the bottom and
// the last element of `cells` is the top. A `max` of None means no limit.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellStack {
    cells: Vec<Data>,
    max: Option<usize>,
}

impl CellStack {
    pub fn new(max: Option<usize>) -> CellStack {
        CellStack {
            cells: Vec::with_capacity(max.unwrap_or(1024).min(1024)),
            max,
        }
    }

    pub fn unbounded() -> CellStack {
        CellStack::new(None)
    }

    // Free cells left, None when there is no limit
    pub fn free(&self) -> Option<usize> {
        self.max.map(|m| m.saturating_sub(self.cells.len()))
    }

    pub fn push(&mut self, val: Data) -> Result<()> {
        if let Some(max) = self.max {
            if self.cells.len() >= max {
                return Err(Error::StackFull);
            }
        }
        self.cells.push(val);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Data> {
        self.cells.pop().ok_or(Error::StackEmpty)
    }

    // Empty reads as 0 so a loop test on an empty stack is false
    pub fn peek(&self) -> Data {
        self.cells.last().copied().unwrap_or(0)
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn item_at(&self, index: usize) -> Result<Data> {
        self.cells.get(index).copied().ok_or(Error::IndexOutOfRange {
            index,
            size: self.cells.len(),
        })
    }

    // Top goes to the bottom
    pub fn rotate_forward(&mut self) {
        if !self.cells.is_empty() {
            self.cells.rotate_right(1);
        }
    }

    // Bottom comes to the top
    pub fn rotate_backward(&mut self) {
        if !self.cells.is_empty() {
            self.cells.rotate_left(1);
        }
    }

    pub fn reverse(&mut self) {
        self.cells.reverse();
    }

    /// Values from top to bottom.
    pub fn iter_top_down(&self) -> impl Iterator<Item = &Data> {
        self.cells.iter().rev()
    }

    pub fn as_slice(&self) -> &[Data] {
        &self.cells
    }

    /// Writes every value from top to bottom without separators. Does not
    /// change the stack.
    pub fn output<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for val in self.iter_top_down() {
            write!(out, "{}", val)?;
        }
        Ok(())
    }
}

impl Default for CellStack {
    fn default() -> CellStack {
        CellStack::unbounded()
    }
}

// Testing ////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod stack_tests {
    use super::*;

    fn filled() -> CellStack {
        let mut s = CellStack::new(Some(20));
        for v in [10, 20, 30, 40, 50] {
            s.push(v).unwrap();
        }
        s
    }

    #[test]
    fn test_push_and_pop() {
        let mut s = CellStack::unbounded();
        s.push(3).unwrap();
        s.push(4).unwrap();
        assert_eq!(s.pop().unwrap(), 4);
        assert_eq!(s.pop().unwrap(), 3);
        assert!(s.is_empty());
    }

    #[test]
    fn test_pop_empty() {
        let mut s = filled();
        while !s.is_empty() {
            s.pop().unwrap();
        }
        assert!(matches!(s.pop(), Err(Error::StackEmpty)));
        assert!(matches!(CellStack::unbounded().pop(), Err(Error::StackEmpty)));
    }

    #[test]
    fn test_push_full() {
        let mut s = CellStack::new(Some(2));
        s.push(1).unwrap();
        s.push(2).unwrap();
        assert!(matches!(s.push(3), Err(Error::StackFull)));
        assert_eq!(s.size(), 2);
        assert_eq!(s.as_slice(), &[1, 2]);
    }

    #[test]
    fn test_push_zero_max() {
        let mut s = CellStack::new(Some(0));
        assert!(matches!(s.push(1), Err(Error::StackFull)));
    }

    #[test]
    fn test_unbounded_never_full() {
        let mut s = CellStack::unbounded();
        for v in 0..10_000 {
            s.push(v).unwrap();
        }
        assert_eq!(s.size(), 10_000);
        assert_eq!(s.free(), None);
    }

    #[test]
    fn test_peek() {
        let s = filled();
        assert_eq!(s.peek(), 50);
        assert_eq!(s.size(), 5);
        assert_eq!(CellStack::unbounded().peek(), 0);
    }

    #[test]
    fn test_item_at() {
        let s = filled();
        assert_eq!(s.item_at(0).unwrap(), 10);
        assert_eq!(s.item_at(4).unwrap(), 50);
        assert!(matches!(
            s.item_at(5),
            Err(Error::IndexOutOfRange { index: 5, size: 5 })
        ));
    }

    #[test]
    fn test_rotate_forward() {
        let mut s = filled();
        s.rotate_forward();
        assert_eq!(s.as_slice(), &[50, 10, 20, 30, 40]);
    }

    #[test]
    fn test_rotate_backward() {
        let mut s = filled();
        s.rotate_backward();
        assert_eq!(s.as_slice(), &[20, 30, 40, 50, 10]);
    }

    #[test]
    fn test_rotate_inverse() {
        let mut s = filled();
        s.rotate_forward();
        s.rotate_backward();
        assert_eq!(s, filled());
        s.rotate_backward();
        s.rotate_forward();
        assert_eq!(s, filled());
    }

    #[test]
    fn test_rotate_empty_is_noop() {
        let mut s = CellStack::unbounded();
        s.rotate_forward();
        s.rotate_backward();
        assert!(s.is_empty());
    }

    #[test]
    fn test_reverse_involution() {
        let mut s = filled();
        s.reverse();
        assert_eq!(s.as_slice(), &[50, 40, 30, 20, 10]);
        s.reverse();
        assert_eq!(s, filled());
    }

    #[test]
    fn test_clear() {
        let mut s = filled();
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.free(), Some(20));
    }

    #[test]
    fn test_output_top_down() {
        let s = filled();
        let mut out: Vec<u8> = Vec::new();
        s.output(&mut out).unwrap();
        assert_eq!(out, "5040302010".as_bytes());
        assert_eq!(s.size(), 5);
    }
}
