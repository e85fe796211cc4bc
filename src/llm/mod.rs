//! Generative model clients.

pub mod chat;
