//! Model collaborator and best-effort augmentation

pub mod client;
pub mod prompts;
pub mod augmenter;
