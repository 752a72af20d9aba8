//! JWT-scoped task management served over REST and MCP.
//!
//! # Architecture
//!
//! - `auth`: bearer credential validation
//! - `db`: SQLite-backed task and conversation stores
//! - `tools`: the closed tool registry shared by both surfaces
//! - `mcp`: MCP Streamable HTTP surface
//! - `api`: REST surface, rate limiting, server entry point

pub mod api;
pub mod auth;
pub mod db;
pub mod mcp;
pub mod tools;
