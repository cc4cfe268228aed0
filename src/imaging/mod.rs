// src/imaging/mod.rs
pub mod encoder;
