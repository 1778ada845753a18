//! Pipeline module - layered verification, answer readers and batch runs.

mod answer;
mod batch;
mod layers;

pub use answer::*;
pub use batch::*;
pub use layers::*;
