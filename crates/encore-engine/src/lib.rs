pub mod dispatch;
pub mod engine;
pub mod ipc;
pub mod session;

pub use dispatch::*;
pub use engine::*;
pub use ipc::*;
pub use session::*;
