//! Game instances: the per-game actor, the lobby registry, and messages.

pub mod actor;
pub mod lobby;
pub mod messages;
