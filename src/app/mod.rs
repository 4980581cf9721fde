//! Page state, input dispatch and the actions the event loop carries out.

pub mod action;
pub mod event;
pub mod handler;
pub mod state;
