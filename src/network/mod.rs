pub mod client;
pub mod drafter;
pub mod node;

pub use client::ChatClient;
pub use drafter::OllamaDrafter;
pub use node::HttpNode;
