// src/scaffold/mod.rs
// =============================================================================
// This module turns a template repository into files on disk.
//
// Submodules:
// - traverse: walks the remote tree and decides what happens to each item
// - special: the special directories (license-files, ignore-files, ...)
// - save: downloads a single file into the output directory
// =============================================================================

mod save;
mod special;
mod traverse;

pub use traverse::Scaffolder;
