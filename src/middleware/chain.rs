//! Middleware chain executor.

use crate::error::DispatchError;
use crate::http::{Event, Response};
use crate::middleware::{Flow, SharedMiddleware};
use crate::routing::Context;

/// Result of running a route's middleware.
#[derive(Debug, PartialEq)]
pub enum ChainOutcome {
    /// Every middleware continued; the handler should run.
    Completed,
    /// Middleware at `index` answered the request.
    ShortCircuit { index: usize, response: Response },
}

/// Run `chain` in order against the shared context.
pub async fn run_chain(
    chain: &[SharedMiddleware],
    event: &Event,
    ctx: &mut Context,
) -> Result<ChainOutcome, DispatchError> {
    for (index, middleware) in chain.iter().enumerate() {
        let flow = middleware
            .call(event, ctx)
            .await
            .map_err(|source| DispatchError::Middleware {
                index,
                path: event.path().to_string(),
                source,
            })?;

        if let Flow::Respond(response) = flow {
            tracing::debug!(index, path = %event.path(), "Middleware short-circuited");
            return Ok(ChainOutcome::ShortCircuit { index, response });
        }
    }
    Ok(ChainOutcome::Completed)
}
