#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use deskew_image as image;

#[doc(inline)]
pub use deskew_imgproc as imgproc;

#[doc(inline)]
pub use deskew_io as io;
