/// Spin engine state machine.
pub mod engine;
/// Randomized spin parameters and the easing timeline.
pub mod plan;
