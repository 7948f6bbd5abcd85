//! Row access shared by the single-channel and colour buffers.
//!
//! Every buffer in the crate is contiguous and row-major (no stride padding),
//! so the whole image is also exposed as one slice.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// All pixels in row-major order.
    fn pixels(&self) -> &[Self::Pixel];

    fn row(&self, y: usize) -> &[Self::Pixel] {
        let w = self.width();
        &self.pixels()[y * w..(y + 1) * w]
    }

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { image: self, y: 0 }
    }

    /// `(width, height)`.
    fn size(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    fn same_size<O: ImageView>(&self, other: &O) -> bool
    where
        Self: Sized,
    {
        self.size() == other.size()
    }
}

pub trait ImageViewMut: ImageView {
    fn pixels_mut(&mut self) -> &mut [Self::Pixel];

    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel] {
        let w = self.width();
        &mut self.pixels_mut()[y * w..(y + 1) * w]
    }
}

pub struct Rows<'a, I: ?Sized + ImageView> {
    image: &'a I,
    y: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        let y = self.y;
        self.y += 1;
        Some(self.image.row(y))
    }
}
