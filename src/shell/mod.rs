/// Shell integration module
///
/// Finds the user's shell and runs command lines through it.

pub mod runner;
pub mod shell_detector;

pub use runner::{RunOutput, ShellRunner};
pub use shell_detector::{Shell, ShellDetector};
