//! Arletters - An augmented-reality alphabet learning core

pub mod core;
pub mod assets;
pub mod scene;
pub mod ar;
pub mod quiz;
