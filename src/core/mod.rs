/// Core pipeline modules
///
/// The command, its result, the plugin contract, the manager that dispatches
/// across plugins, and the pieces a session needs around it.

pub mod command;
pub mod cwd_bridge;
pub mod enhancer;
pub mod manager;
pub mod plugin;
pub mod result;
pub mod session;

pub use command::Command;
pub use cwd_bridge::WorkingDirectoryBridge;
pub use enhancer::{ColorFlagEnhancer, CommandEnhancer, EnhancerManager};
pub use manager::{DispatchOptions, PluginManager};
pub use plugin::Plugin;
pub use result::{ExecutionResult, CANCELLED_EXIT_CODE, CANCELLED_MESSAGE};
pub use session::{Session, SessionOutcome, MAX_HISTORY};
