// Wipe sessions: asynchronous wipe jobs polled through `status`
//
// - types.rs: request, response and status snapshot types
// - store.rs: thread-safe session store with snapshot replacement
// - manager.rs: session lifecycle and the background wipe task

pub mod manager;
pub mod store;
pub mod types;


pub use manager::WipeSessionManager;
pub use store::SessionStore;
pub use types::{SessionState, StartWipeRequest, StartWipeResponse, WipeMode, WipeStatus};
