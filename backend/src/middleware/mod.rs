//! Request middleware: trace correlation and the session gate.

pub mod gateway;
pub mod trace;

pub use gateway::Gateway;
pub use trace::Trace;
