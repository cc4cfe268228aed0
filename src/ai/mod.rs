// src/ai/mod.rs
pub mod connector;
pub mod error;
pub mod openai_vision;
pub mod protocol;

#[cfg(test)]
pub(crate) mod test_support;
