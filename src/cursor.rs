//! Byte cursor over a borrowed input buffer.

/// Owns nothing but a borrowed buffer and a read position.
///
/// All slices handed out borrow from the original buffer, so they stay valid
/// for `'a` regardless of how far the cursor advances afterwards.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Cursor { input, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Bytes not yet consumed.
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos.min(self.input.len())..]
    }

    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    #[inline]
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.remaining().starts_with(prefix)
    }

    /// Offset (relative to the current position) of the first byte matching `pred`.
    pub fn find(&self, pred: impl Fn(u8) -> bool) -> Option<usize> {
        self.remaining().iter().position(|&b| pred(b))
    }

    /// Consumes `n` bytes, clamped to the end of input.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    /// Consumes `n` bytes and returns them.
    pub fn take(&mut self, n: usize) -> &'a [u8] {
        let rest = self.remaining();
        let n = n.min(rest.len());
        self.pos += n;
        &rest[..n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_and_peek() {
        let mut cursor = Cursor::new(b".a=1\n");
        assert_eq!(cursor.peek(), Some(b'.'));
        assert_eq!(cursor.take(2), b".a");
        assert_eq!(cursor.peek_at(1), Some(b'1'));
        assert_eq!(cursor.find(|b| b == b'\n'), Some(2));
        assert_eq!(cursor.take(10), b"=1\n");
        assert!(cursor.is_empty());
        assert_eq!(cursor.remaining(), b"");
    }

    #[test]
    fn test_advance_is_clamped() {
        let mut cursor = Cursor::new(b"ab");
        cursor.advance(5);
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.peek(), None);
    }
}
