pub mod font;
pub mod palette;
pub mod primitives;
pub mod screen;
pub mod surface;
