/// Render target extent in physical pixels.
///
/// Pixel buffers are row-major with the origin at the top-left corner.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[inline]
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Linear buffer index of pixel `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn index(self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Iterates `(x, y, index)` for every pixel in buffer order.
    pub fn pixels(self) -> impl Iterator<Item = (u32, u32, usize)> {
        let w = self.width;
        (0..self.height).flat_map(move |y| {
            (0..w).map(move |x| (x, y, y as usize * w as usize + x as usize))
        })
    }
}
