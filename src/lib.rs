//! Voxel-space terrain flyover renderer
//!
//! A heightmap ray-casting ("voxel space") renderer: per screen column, a
//! ray marches away from the viewer in increasing depth, terrain heights
//! project to screen rows, and a monotone occlusion frontier makes nearer
//! terrain hide farther terrain without any 3D geometry.

pub mod framebuffer;
pub mod render;
pub mod synth;
pub mod terrain;
pub mod tilemap;
pub mod viewer;
