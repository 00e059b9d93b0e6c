pub mod bucket;
pub mod image;
pub mod object;

pub use bucket::{BucketAcl, BucketConfig, Credentials};
pub use image::ImageFormat;
pub use object::{BlobHandle, SignedUrl};
