// Privacy Sentinel shared type definitions
// Each submodule defines types used across the engine, the router and the RPC binary.

pub mod cookie;
pub mod errors;
pub mod event;
pub mod request;
pub mod score;
pub mod session;
pub mod settings;
