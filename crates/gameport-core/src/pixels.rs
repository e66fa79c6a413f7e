//! Host-side view of the guest's RGBA pixel buffer.

use crate::error::BridgeError;

pub const BYTES_PER_PIXEL: usize = 4;

/// Largest buffer edge accepted from configuration or from the guest.
pub const MAX_BUFFER_EDGE: u32 = 4096;

/// Read access to guest linear memory.
///
/// Implementations must resolve the backing store on every call: a
/// `memory.grow` inside the guest may replace it, and a view taken before the
/// growth no longer reflects what the guest writes.
pub trait GuestMemory {
    fn byte_len(&self) -> usize;
    fn read_into(&self, offset: usize, out: &mut [u8]) -> Result<(), BridgeError>;

    fn read_vec(&self, offset: usize, len: usize) -> Result<Vec<u8>, BridgeError> {
        let mut out = vec![0; len];
        self.read_into(offset, &mut out)?;
        Ok(out)
    }
}

/// Fixed `width × height` RGBA8 region at a guest address, copied out once per
/// frame. The view is re-bound (bounds re-checked) whenever the memory length
/// changes.
#[derive(Debug)]
pub struct PixelBuffer {
    ptr: usize,
    width: u32,
    height: u32,
    len: usize,
    frame: Vec<u8>,
    bound_len: Option<usize>,
    rebinds: u32,
}

impl PixelBuffer {
    /// Nothing is allocated until the region has been checked against guest
    /// memory on the first [`sync`](Self::sync).
    pub fn new(ptr: usize, width: u32, height: u32) -> Result<Self, BridgeError> {
        let len = (width <= MAX_BUFFER_EDGE && height <= MAX_BUFFER_EDGE)
            .then(|| (width as usize).checked_mul(height as usize))
            .flatten()
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .ok_or(BridgeError::PixelBufferTooLarge { width, height })?;
        Ok(Self {
            ptr,
            width,
            height,
            len,
            frame: Vec::new(),
            bound_len: None,
            rebinds: 0,
        })
    }

    pub fn ptr(&self) -> usize {
        self.ptr
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn byte_len(&self) -> usize {
        self.len
    }

    /// How many times the view was re-bound after a memory size change.
    pub fn rebinds(&self) -> u32 {
        self.rebinds
    }

    /// Last copied frame. Empty before the first successful sync.
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    pub fn sync<M: GuestMemory + ?Sized>(&mut self, memory: &M) -> Result<&[u8], BridgeError> {
        let memory_len = memory.byte_len();
        if self.bound_len != Some(memory_len) {
            self.bind(memory_len)?;
        }
        memory.read_into(self.ptr, &mut self.frame)?;
        Ok(&self.frame)
    }

    fn bind(&mut self, memory_len: usize) -> Result<(), BridgeError> {
        let end = self.ptr.checked_add(self.len);
        if end.map_or(true, |end| end > memory_len) {
            return Err(BridgeError::PixelBufferOutOfBounds {
                ptr: self.ptr,
                len: self.len,
                memory_len,
            });
        }
        if self.frame.len() != self.len {
            self.frame = vec![0; self.len];
        }
        if let Some(prev) = self.bound_len {
            log::debug!(
                "[pixels] guest memory resized {} -> {} bytes, rebinding view",
                prev,
                memory_len
            );
            self.rebinds += 1;
        }
        self.bound_len = Some(memory_len);
        Ok(())
    }
}

/// Slice-backed memory, used by tests and by hosts that snapshot memory.
impl GuestMemory for [u8] {
    fn byte_len(&self) -> usize {
        self.len()
    }

    fn read_into(&self, offset: usize, out: &mut [u8]) -> Result<(), BridgeError> {
        let src = offset
            .checked_add(out.len())
            .and_then(|end| self.get(offset..end))
            .ok_or(BridgeError::MemoryOutOfBounds {
                offset,
                len: out.len(),
            })?;
        out.copy_from_slice(src);
        Ok(())
    }
}

impl GuestMemory for Vec<u8> {
    fn byte_len(&self) -> usize {
        self.len()
    }

    fn read_into(&self, offset: usize, out: &mut [u8]) -> Result<(), BridgeError> {
        self.as_slice().read_into(offset, out)
    }
}
