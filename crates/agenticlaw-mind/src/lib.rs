//! Spiritual Biology — a closed-loop, per-agent self-improvement engine.
//!
//! Behavioral signals (stress, confessed uncertainty, ethical refusals,
//! user guidance) are logged during normal operation. A periodic dream
//! cycle decays tactical memory, reviews the recent signal history, and
//! proposes new learnings for a human to approve or reject. Approved
//! learnings are injected into the agent's identity prompt, selectively
//! reactivated when their vocabulary resurfaces, and pruned once their
//! relevance decays below the floor.

pub mod actions;
pub mod config;
pub mod dream;
pub mod error;
pub mod identity;
pub mod manager;
pub mod principles;
pub mod sanitize;
pub mod store;
pub mod stress;
pub mod tools;
pub mod types;

pub use config::MindConfig;
pub use error::{Error, Result};
pub use manager::{Manager, MindDashboard};
pub use store::Store;
