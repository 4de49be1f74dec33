//! Wire-level types shared by the installation server, its tools and viewers.

pub mod color;
pub mod protocol;
pub mod report;
pub mod vec2;
