pub mod dart3d;
