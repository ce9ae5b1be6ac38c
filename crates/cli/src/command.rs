//! Command trait for the hookmerge CLI
//!
//! Every subcommand implements [`Command`], receiving the shared
//! [`RuntimeContext`] built from configuration and global flags.

use crate::common::RuntimeContext;
use crate::error::Result;

/// Trait for all hookmerge commands
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Debug, Args)]
/// pub struct MyCommand {
///     #[arg(long)]
///     pub dry_run: bool,
/// }
///
/// impl Command for MyCommand {
///     type Output = ();
///
///     fn execute(&self, context: &RuntimeContext) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait Command {
    /// The type returned by this command
    type Output;

    /// Execute the command with the given runtime context
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails. A batch with failed hooks is a
    /// failure even though every other hook was processed.
    fn execute(&self, context: &RuntimeContext) -> Result<Self::Output>;
}
