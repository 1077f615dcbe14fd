//! Process-level span helpers.

use tracing::{Span, span::Entered};

use crate::init::build_sha;

/// Guard that keeps the invocation span entered for the lifetime of the process.
pub struct GlobalContextGuard {
    _guard: Entered<'static>,
}

impl GlobalContextGuard {
    /// Enter a span tagging every event with the command and invocation id.
    #[must_use]
    pub fn new(command: impl Into<String>, invocation_id: impl Into<String>) -> Self {
        let command = command.into();
        let invocation_id = invocation_id.into();
        let span: &'static Span = Box::leak(Box::new(tracing::info_span!(
            "skucheck",
            command = %command,
            invocation_id = %invocation_id,
            build_sha = %build_sha(),
        )));
        let guard = span.enter();
        Self { _guard: guard }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_can_be_created_without_subscriber() {
        let _guard = GlobalContextGuard::new("lookup", "test-invocation");
        tracing::info!("inside invocation span");
    }
}
