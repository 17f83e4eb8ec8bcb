//! # Handler chain
//!
//! Dispatch pipeline for incoming updates: an admission [`Filter`], a [`Router`] built from a
//! [`Registry`], a per-message [`Context`] driving the handler chain through [`Context::next`],
//! a bounded [`WorkerPool`] and an [`ErrorHandler`] sink. [`Dispatcher`] wires them together.

pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error_handler;
pub mod filter;
pub mod handler;
pub mod pool;
pub mod router;

pub use config::{DispatchConfig, DEFAULT_MAX_CONCURRENCY};
pub use context::{ChainState, Context};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error_handler::{DefaultErrorHandler, ErrorHandler};
pub use filter::{Filter, FilterDecision};
pub use handler::{handler_fn, BoxFuture, Handler, HandlerChain, HandlerFn};
pub use pool::WorkerPool;
pub use router::{Registry, Router};
