//! Session lifecycle command and query handlers.

mod lifecycle;
mod user_locks;

pub use lifecycle::{
    ExcludeTimeCommand, SessionLifecycleHandler, StartSessionCommand, StopSessionCommand,
};
