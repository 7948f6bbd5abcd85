pub mod gray;
pub mod io;
pub mod rgb;
pub mod traits;

pub use self::gray::ImageF64;
pub use self::rgb::{ImageRgbF64, InterleavedImage, Rgb};
pub use self::traits::{ImageView, ImageViewMut, Rows};
