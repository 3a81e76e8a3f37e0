//! Foreign type definitions for the renderer are generated by `build.rs`
//! into `generated/`.
