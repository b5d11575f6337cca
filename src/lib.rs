//! Procedural spiral galaxy rendered as an additive point cloud, with a
//! parameter panel that rebuilds the galaxy on every committed edit.

pub mod galaxy;
pub mod graphics;
pub mod prelude;
pub mod ui;
