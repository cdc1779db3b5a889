pub mod device;
pub mod encoding;
pub mod image_dir;
pub mod surface;
pub mod types;

pub use device::*;
pub use image_dir::ImageDirCamera;
pub use surface::*;
pub use types::*;
