pub mod commands;
pub mod drag;
pub mod input;
pub mod mutation;
pub mod properties;
pub mod session;
pub mod shortcuts;
