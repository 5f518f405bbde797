mod author;
mod credentials;
mod error;
mod loading;
mod message;
mod rag;
mod route;
mod slash_commands;

pub use author::*;
pub use credentials::*;
pub use error::*;
pub use loading::*;
pub use message::*;
pub use rag::*;
pub use route::*;
pub use slash_commands::*;
