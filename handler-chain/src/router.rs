//! Handler registration and command routing.
//!
//! [`Registry`] is the setup-phase builder; [`Registry::build`] freezes it into a read-only
//! [`Router`] that the dispatcher shares across concurrent dispatches. Registration after
//! dispatch has started is therefore not possible.
//!
//! # Execution order
//!
//! - Middlewares added with [`Registry::use_middleware`] run before every chain, the **last
//!   added running first**: `use(A); use(B)` runs `B, A`.
//! - Handlers given to [`Registry::register_handler`] run in **reverse** of the given order:
//!   `register_handler("x", [h1, h2])` runs `h2, h1`.
//! - Handlers given to [`Registry::set_default_handler`] run in the given order.
//!
//! So `use(A); use(B); register_handler("x", [h1, h2])` runs `B, A, h2, h1` for `/x`. Existing
//! handler code relies on both reversals.

use std::collections::HashMap;
use std::sync::Arc;

use dbot_core::RegistrationError;
use tracing::debug;

use crate::handler::{Handler, HandlerChain};

#[derive(Default)]
pub struct Registry {
    middlewares: Vec<Arc<dyn Handler>>,
    handlers: HashMap<String, Vec<Arc<dyn Handler>>>,
    default_handlers: Vec<Arc<dyn Handler>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a middleware in front of every chain. The last one added runs first.
    pub fn use_middleware(&mut self, middleware: Arc<dyn Handler>) -> &mut Self {
        self.middlewares.insert(0, middleware);
        self
    }

    /// Registers the handlers for `command` (without the leading slash), replacing any previous
    /// registration. Handlers run from last to first.
    pub fn register_handler(
        &mut self,
        command: &str,
        handlers: Vec<Arc<dyn Handler>>,
    ) -> Result<&mut Self, RegistrationError> {
        if command.is_empty() {
            return Err(RegistrationError::EmptyCommand);
        }
        self.handlers
            .insert(command.to_string(), handlers.into_iter().rev().collect());
        Ok(self)
    }

    /// Replaces the whole command table. Every key is validated before anything changes.
    pub fn set_handler_map(
        &mut self,
        handlers: HashMap<String, Vec<Arc<dyn Handler>>>,
    ) -> Result<&mut Self, RegistrationError> {
        if handlers.keys().any(|command| command.is_empty()) {
            return Err(RegistrationError::EmptyCommand);
        }
        self.handlers = handlers
            .into_iter()
            .map(|(command, list)| (command, list.into_iter().rev().collect()))
            .collect();
        Ok(self)
    }

    /// Sets the chain used for plain messages and unknown commands when normal messages are
    /// allowed. Handlers run in the given order.
    pub fn set_default_handler(&mut self, handlers: Vec<Arc<dyn Handler>>) -> &mut Self {
        self.default_handlers = handlers;
        self
    }

    pub fn build(self) -> Router {
        Router {
            middlewares: self.middlewares,
            handlers: self.handlers,
            default_handlers: self.default_handlers,
        }
    }
}

/// Read-only routing table.
pub struct Router {
    middlewares: Vec<Arc<dyn Handler>>,
    handlers: HashMap<String, Vec<Arc<dyn Handler>>>,
    default_handlers: Vec<Arc<dyn Handler>>,
}

impl Router {
    /// Resolves the chain for `command` (`""` for plain messages).
    ///
    /// Falls back to the default handlers on a miss when `allow_normal_messages` is set. Returns
    /// `None` when nothing matches or the resolved handler list is empty.
    pub fn resolve(&self, command: &str, allow_normal_messages: bool) -> Option<HandlerChain> {
        let handlers = match self.handlers.get(command) {
            Some(handlers) => handlers,
            None if allow_normal_messages => &self.default_handlers,
            None => {
                debug!(command = %command, "no handler registered, message dropped");
                return None;
            }
        };
        if handlers.is_empty() {
            debug!(command = %command, "resolved handler list is empty, message dropped");
            return None;
        }

        let chain = self
            .middlewares
            .iter()
            .chain(handlers.iter())
            .cloned()
            .collect();
        Some(HandlerChain::new(chain))
    }

    pub fn has_command(&self, command: &str) -> bool {
        self.handlers.contains_key(command)
    }

    /// Registered command names, sorted.
    pub fn commands(&self) -> Vec<&str> {
        let mut commands: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        commands.sort_unstable();
        commands
    }

    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("commands", &self.commands())
            .field("middlewares", &self.middlewares.len())
            .field("default_handlers", &self.default_handlers.len())
            .finish()
    }
}
