//! The work-unit contract: what the host executes.

use crate::error::ExecError;
use async_trait::async_trait;

/// One independently schedulable unit of startup logic.
///
/// The host resolves every registered executable and drives it with the
/// process argument vector, either strictly in registration order or
/// concurrently. Executables are opaque to the engine: they may suspend
/// internally or block a worker; the host only awaits completion.
///
/// No cancellation token is threaded through `execute`. An executable that
/// never completes stalls the run that awaits it; bounding execution time is
/// the unit's own responsibility.
///
/// Errors returned from `execute` always surface to the caller of the run;
/// the engine never swallows or retries them.
#[async_trait]
pub trait Executable: Send + Sync {
    /// Perform this unit of work with the process argument vector.
    async fn execute(&self, args: &[String]) -> Result<(), ExecError>;
}
