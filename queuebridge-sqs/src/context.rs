//! State shared by every gateway request

use std::sync::Arc;

use queuebridge_lambda::Invoker;
use queuebridge_resolver::HandlerMap;

/// Built once at startup. The handler map is never mutated afterwards,
/// so requests read it without locking.
pub struct BridgeContext {
    handlers: HandlerMap,
    invoker: Arc<dyn Invoker>,
}

impl BridgeContext {
    pub fn new(handlers: HandlerMap, invoker: Arc<dyn Invoker>) -> Self {
        Self { handlers, invoker }
    }

    pub fn handlers(&self) -> &HandlerMap {
        &self.handlers
    }

    pub fn invoker(&self) -> &dyn Invoker {
        self.invoker.as_ref()
    }
}
