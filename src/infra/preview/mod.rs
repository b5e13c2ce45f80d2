pub mod preview_files;
pub mod renderer;

pub use preview_files::PreviewFiles;
pub use renderer::{PreviewRenderer, AVATAR_FETCH_SIZE};
