mod client;
mod documents;

pub use client::*;
pub use documents::*;
