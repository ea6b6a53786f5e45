//! Byte sources the decoder pulls instruction bytes from.
//!
//! The decoder only needs sequential little-endian fetches, expressed by
//! [`ByteSource`]. Callers that can read arbitrary addresses (a debugger
//! looking at guest memory, the boundary scanner) implement [`CodeMemory`]
//! instead and wrap it in a [`MemorySource`] positioned at the decode start.

/// Sequential pull interface over instruction bytes.
///
/// Each fetch advances the source. `None` means the source is exhausted or
/// the underlying memory could not be read.
pub trait ByteSource {
    /// Fetches the next byte.
    fn fetch_byte(&mut self) -> Option<u8>;

    /// Fetches the next little-endian word.
    fn fetch_word(&mut self) -> Option<u16> {
        let lo = self.fetch_byte()?;
        let hi = self.fetch_byte()?;
        Some(u16::from_le_bytes([lo, hi]))
    }

    /// Fetches the next little-endian doubleword.
    fn fetch_dword(&mut self) -> Option<u32> {
        let lo = self.fetch_word()?;
        let hi = self.fetch_word()?;
        Some(u32::from(lo) | (u32::from(hi) << 16))
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn fetch_byte(&mut self) -> Option<u8> {
        (**self).fetch_byte()
    }

    fn fetch_word(&mut self) -> Option<u16> {
        (**self).fetch_word()
    }

    fn fetch_dword(&mut self) -> Option<u32> {
        (**self).fetch_dword()
    }
}

/// A byte stream over a slice.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> SliceSource<'a> {
    /// Creates a source positioned at the start of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Number of bytes fetched so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes not yet fetched.
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.position..]
    }
}

impl ByteSource for SliceSource<'_> {
    fn fetch_byte(&mut self) -> Option<u8> {
        let byte = *self.bytes.get(self.position)?;
        self.position += 1;
        Some(byte)
    }

    fn fetch_word(&mut self) -> Option<u16> {
        let bytes = self.bytes.get(self.position..self.position + 2)?;
        self.position += 2;
        Some(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn fetch_dword(&mut self) -> Option<u32> {
        let bytes = self.bytes.get(self.position..self.position + 4)?;
        self.position += 4;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

/// Random-access view of code memory by linear address.
pub trait CodeMemory {
    /// Reads the byte at `address`, or `None` if it is not readable.
    fn read_byte(&self, address: u32) -> Option<u8>;

    /// Reads up to `buf.len()` consecutive bytes, stopping at the first
    /// unreadable one. Returns the number of bytes read.
    fn read_bytes(&self, address: u32, buf: &mut [u8]) -> usize {
        let mut count = 0;
        for (i, slot) in buf.iter_mut().enumerate() {
            match self.read_byte(address.wrapping_add(i as u32)) {
                Some(byte) => {
                    *slot = byte;
                    count += 1;
                }
                None => break,
            }
        }
        count
    }
}

impl CodeMemory for [u8] {
    fn read_byte(&self, address: u32) -> Option<u8> {
        self.get(usize::try_from(address).ok()?).copied()
    }
}

impl CodeMemory for Vec<u8> {
    fn read_byte(&self, address: u32) -> Option<u8> {
        self.as_slice().read_byte(address)
    }
}

impl<M: CodeMemory + ?Sized> CodeMemory for &M {
    fn read_byte(&self, address: u32) -> Option<u8> {
        (**self).read_byte(address)
    }
}

/// A flat image of code loaded at a fixed linear origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryImage {
    origin: u32,
    bytes: Vec<u8>,
}

impl MemoryImage {
    /// Creates an image whose first byte sits at `origin`.
    pub fn new(origin: u32, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            origin,
            bytes: bytes.into(),
        }
    }

    /// Linear address of the first byte.
    pub fn origin(&self) -> u32 {
        self.origin
    }

    /// Linear address one past the last byte, saturating at `u32::MAX`.
    pub fn end(&self) -> u32 {
        let len = u32::try_from(self.bytes.len()).unwrap_or(u32::MAX);
        self.origin.saturating_add(len)
    }

    /// Raw image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns true if `address` falls inside the image.
    pub fn contains(&self, address: u32) -> bool {
        address >= self.origin && address < self.end()
    }
}

impl CodeMemory for MemoryImage {
    fn read_byte(&self, address: u32) -> Option<u8> {
        let offset = address.checked_sub(self.origin)?;
        self.bytes.read_byte(offset)
    }
}

/// Sequential source reading from a [`CodeMemory`] at a moving address.
#[derive(Debug)]
pub struct MemorySource<'m, M: ?Sized> {
    memory: &'m M,
    address: u32,
}

impl<'m, M: CodeMemory + ?Sized> MemorySource<'m, M> {
    /// Creates a source that starts fetching at `address`.
    pub fn new(memory: &'m M, address: u32) -> Self {
        Self { memory, address }
    }

    /// Address of the next byte to be fetched.
    pub fn address(&self) -> u32 {
        self.address
    }
}

impl<M: CodeMemory + ?Sized> ByteSource for MemorySource<'_, M> {
    fn fetch_byte(&mut self) -> Option<u8> {
        let byte = self.memory.read_byte(self.address)?;
        self.address = self.address.wrapping_add(1);
        Some(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_source_little_endian() {
        let mut source = SliceSource::new(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07]);
        assert_eq!(source.fetch_byte(), Some(0x01));
        assert_eq!(source.fetch_word(), Some(0x0302));
        assert_eq!(source.fetch_dword(), Some(0x0706_0504));
        assert_eq!(source.fetch_byte(), None);
        assert_eq!(source.position(), 7);
    }

    #[test]
    fn test_slice_source_short_fetch_does_not_advance() {
        let mut source = SliceSource::new(&[0xAA, 0xBB, 0xCC]);
        assert_eq!(source.fetch_dword(), None);
        assert_eq!(source.position(), 0);
        assert_eq!(source.remaining(), &[0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn test_memory_image_bounds() {
        let image = MemoryImage::new(0x100, vec![0x90, 0xC3]);
        assert_eq!(image.read_byte(0xFF), None);
        assert_eq!(image.read_byte(0x100), Some(0x90));
        assert_eq!(image.read_byte(0x101), Some(0xC3));
        assert_eq!(image.read_byte(0x102), None);
        assert_eq!(image.end(), 0x102);
        assert!(image.contains(0x101));
        assert!(!image.contains(0x102));
    }

    #[test]
    fn test_memory_source_default_fetches() {
        let image = MemoryImage::new(0x7C00, vec![0x34, 0x12, 0x78, 0x56, 0x34, 0x12]);
        let mut source = MemorySource::new(&image, 0x7C00);
        assert_eq!(source.fetch_word(), Some(0x1234));
        assert_eq!(source.fetch_dword(), Some(0x1234_5678));
        assert_eq!(source.address(), 0x7C06);
        assert_eq!(source.fetch_byte(), None);
    }

    #[test]
    fn test_read_bytes_stops_at_hole() {
        let image = MemoryImage::new(0x10, vec![1, 2, 3]);
        let mut buf = [0u8; 8];
        assert_eq!(image.read_bytes(0x11, &mut buf), 2);
        assert_eq!(&buf[..2], &[2, 3]);
    }
}
