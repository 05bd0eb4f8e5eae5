// Adapters layer: concrete implementations for external systems (model provider, HTTP surface).

pub mod http;
pub mod openai;
