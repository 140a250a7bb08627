//! Stateful services driving the admin views

pub mod navigator;

pub use navigator::{
    ApplyOutcome, LevelData, LevelOutcome, LevelRequest, LevelView, MutationCompletion,
    MutationOutcome, Navigator, PendingMutation,
};
