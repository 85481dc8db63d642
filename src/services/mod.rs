//! Backend HTTP clients.

pub mod ollama_service;
