//! repolens: browse repository digests and chat about code
//!
//! The library turns a generated repository digest (a tagged text document
//! wrapping a directory listing and file bodies) back into a navigable file
//! tree, tracks which files the user attaches to the next LLM prompt, and
//! talks to the digest/chat service through narrow collaborator traits.

pub mod cli;
pub mod config;
pub mod digest;
pub mod remote;
pub mod session;
pub mod utils;
