/// Fixed-capacity circular buffer. Fills up to `capacity`, then each push
/// overwrites the oldest value and hands it back.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    buf: Vec<T>,
    capacity: usize,
    /// Index of the oldest value once full.
    next: usize,
}

impl<T: Copy> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer needs room for at least one value");
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
            next: 0,
        }
    }

    /// Append `value`, returning the value it evicted, if any.
    pub fn push(&mut self, value: T) -> Option<T> {
        if self.buf.len() < self.capacity {
            self.buf.push(value);
            return None;
        }
        let evicted = std::mem::replace(&mut self.buf[self.next], value);
        self.next = (self.next + 1) % self.capacity;
        Some(evicted)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn latest(&self) -> Option<T> {
        if self.buf.len() < self.capacity {
            self.buf.last().copied()
        } else {
            let idx = (self.next + self.capacity - 1) % self.capacity;
            Some(self.buf[idx])
        }
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (newer, older) = self.buf.split_at(self.next);
        older.iter().chain(newer.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_oldest_first() {
        let mut ring = RingBuffer::new(3);
        assert_eq!(ring.push(1), None);
        assert_eq!(ring.push(2), None);
        assert_eq!(ring.push(3), None);
        assert_eq!(ring.push(4), Some(1));
        assert_eq!(ring.push(5), Some(2));
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.latest(), Some(5));
        assert_eq!(ring.iter().copied().collect::<Vec<i32>>(), vec![3, 4, 5]);
    }

    #[test]
    fn partial_fill() {
        let mut ring = RingBuffer::new(4);
        assert!(ring.is_empty());
        assert_eq!(ring.latest(), None);
        ring.push(7.5);
        ring.push(8.5);
        assert_eq!(ring.iter().copied().collect::<Vec<f64>>(), vec![7.5, 8.5]);
        assert_eq!(ring.latest(), Some(8.5));
    }
}
