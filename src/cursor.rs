//! Bounds-checked sequential reader over a borrowed byte buffer.
//!
//! [`ByteCursor`] never fails: a read that would run past the end of the
//! buffer returns the zero value of its type and leaves the position where it
//! was. Callers that need to tell a genuine zero from exhausted input compare
//! [`ByteCursor::position`] against [`ByteCursor::len`] before reading.

#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

macro_rules! read_le {
    ($($name:ident => $ty:ty),* $(,)?) => {
        $(
            pub fn $name(&mut self) -> $ty {
                self.take_array()
                    .map(<$ty>::from_le_bytes)
                    .unwrap_or_default()
            }
        )*
    };
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    read_le! {
        read_u8 => u8,
        read_i8 => i8,
        read_u16 => u16,
        read_i16 => i16,
        read_u32 => u32,
        read_i32 => i32,
        read_u64 => u64,
        read_i64 => i64,
        read_f32 => f32,
    }

    /// Copies `destination.len()` bytes into `destination`. When fewer bytes
    /// remain, nothing is copied and the cursor does not move.
    pub fn read_into(&mut self, destination: &mut [u8]) -> bool {
        match self.take(destination.len()) {
            Some(bytes) => {
                destination.copy_from_slice(bytes);
                true
            }
            None => false,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Moves to `position` only when it lies strictly inside the buffer.
    pub fn seek(&mut self, position: usize) {
        if position < self.data.len() {
            self.position = position;
        }
    }

    /// Moves forward by `amount`, stopping at the end of the buffer.
    pub fn advance(&mut self, amount: usize) {
        self.position = self
            .position
            .saturating_add(amount)
            .clamp(self.position, self.data.len());
    }

    fn take(&mut self, width: usize) -> Option<&'a [u8]> {
        let end = self.position.checked_add(width)?;
        if end > self.data.len() {
            return None;
        }
        let bytes = &self.data[self.position..end];
        self.position = end;
        Some(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.take(N).and_then(|bytes| bytes.try_into().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_values_in_sequence() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0x1234u16.to_le_bytes());
        bytes.extend_from_slice(&(-7i32).to_le_bytes());
        bytes.extend_from_slice(&1.5f32.to_le_bytes());
        let mut cursor = ByteCursor::new(&bytes);

        assert_eq!(cursor.read_u16(), 0x1234);
        assert_eq!(cursor.read_i32(), -7);
        assert_eq!(cursor.read_f32(), 1.5);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn short_read_returns_zero_without_moving() {
        let bytes = [1u8, 2, 3];
        let mut cursor = ByteCursor::new(&bytes);
        cursor.advance(1);

        assert_eq!(cursor.read_u32(), 0);
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_u16(), u16::from_le_bytes([2, 3]));
        assert_eq!(cursor.read_u8(), 0);
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn advance_saturates_on_huge_offsets() {
        let bytes = [0u8; 4];
        let mut cursor = ByteCursor::new(&bytes);
        cursor.advance(2);
        cursor.advance(usize::MAX);
        assert_eq!(cursor.position(), 4);
    }
}
