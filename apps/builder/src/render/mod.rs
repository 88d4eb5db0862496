pub mod preview;
pub mod screen;
