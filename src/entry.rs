//! Entry stored in a `SumTable` bucket

/// A distinct cube sum and how many pairs produced it in the current segment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    value: u64,
    count: u64,
}

impl Entry {
    /// Create an entry seen once
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self { value, count: 1 }
    }

    /// Get the stored sum
    #[inline]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Get the number of occurrences
    #[inline]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Record one more occurrence, returning the new count
    #[inline]
    pub fn bump(&mut self) -> u64 {
        self.count += 1;
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry() {
        let entry = Entry::new(1729);
        assert_eq!(entry.value(), 1729);
        assert_eq!(entry.count(), 1);
    }

    #[test]
    fn test_bump() {
        let mut entry = Entry::new(4104);
        assert_eq!(entry.bump(), 2);
        assert_eq!(entry.bump(), 3);
        assert_eq!(entry.count(), 3);
        assert_eq!(entry.value(), 4104);
    }
}
