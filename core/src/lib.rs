//! Hamlet: an idle settlement game's simulation core.
//!
//! Leaf-first module order:
//!   ledger, catalog, ownership, stats  : data definitions
//!   economy                            : rates, costs, purchases, tick credit
//!   achievement                        : threshold predicates, one-time unlocks
//!   session                            : the single mutation path
//!   clock, scheduler                   : time-driven ticking
//!   snapshot, store                    : save/restore and persistence
//!   engine                             : hosting shell wiring it all together
//!
//! RULES:
//!   - Every mutation goes through a Session entry point.
//!   - Achievement evaluation runs after every mutation.
//!   - Ledger amounts are never negative.

pub mod achievement;
pub mod autoplay;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod economy;
pub mod engine;
pub mod error;
pub mod event;
pub mod ledger;
pub mod ownership;
pub mod rng;
pub mod scheduler;
pub mod session;
pub mod snapshot;
pub mod stats;
pub mod store;
pub mod types;
