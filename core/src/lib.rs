//! Aula Core
//!
//! Backend core for a self-hosted learning platform: course module
//! progression (requirement-gated sequences of learning content) and
//! account-scoped role permission resolution.
//!
//! Transport, rendering, and durable storage live in outer layers; this
//! crate owns the domain rules and the serialization contract those
//! layers expose.

pub mod config;
pub mod modules;
pub mod roles;
