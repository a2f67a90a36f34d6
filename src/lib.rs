// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Macro-Monopoly Simulation Suite

pub mod types;
pub mod board;
pub mod economy;
pub mod market;
pub mod cards;
pub mod bankruptcy;
pub mod decision;
pub mod events;
pub mod session;

pub use decision::{AutoPolicy, Decision, DecisionProvider, DecisionRequest};
pub use session::GameSession;
pub use types::*;
