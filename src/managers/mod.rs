// Privacy Sentinel state managers
// Managers own mutable per-session state.

pub mod session_manager;
