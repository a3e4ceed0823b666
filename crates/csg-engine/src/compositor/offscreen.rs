use crate::device::FragmentCapture;

use super::OffscreenType;

/// Per-primitive capture storage, kept or discarded between frames depending on
/// the offscreen strategy.
#[derive(Debug, Default)]
pub(crate) struct OffscreenPool {
    captures: Vec<FragmentCapture>,
    allocations: u64,
}

impl OffscreenPool {
    /// Returns `count` capture targets.
    ///
    /// `FrameBufferObject` grows the pool and reuses existing targets;
    /// `PBuffer` discards the pool and allocates fresh targets.
    pub(crate) fn acquire(&mut self, offscreen: OffscreenType, count: usize) -> &mut [FragmentCapture] {
        match offscreen.resolve() {
            OffscreenType::PBuffer => {
                self.captures.clear();
                self.captures.resize_with(count, FragmentCapture::default);
                self.allocations += count as u64;
            }
            _ => {
                if self.captures.len() < count {
                    self.allocations += (count - self.captures.len()) as u64;
                    self.captures.resize_with(count, FragmentCapture::default);
                }
            }
        }
        &mut self.captures[..count]
    }

    /// Capture targets allocated over the pool's lifetime.
    #[inline]
    pub(crate) fn allocations(&self) -> u64 {
        self.allocations
    }
}
