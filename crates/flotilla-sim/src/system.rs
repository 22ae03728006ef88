use crate::context::SimContext;

/// One pass of the per-tick pipeline.
///
/// The simulation runs its passes in a fixed order every tick; each receives
/// a mutable context giving access to the entity store, inbox, teams, clock,
/// RNG, and event log. A tick cannot fail, so `tick` returns nothing.
pub trait System: std::fmt::Debug + Send {
    /// Human-readable name for this pass.
    fn name(&self) -> &str;

    /// Called once per tick.
    fn tick(&mut self, ctx: &mut SimContext<'_>);

    /// Called when the population is reset. Optional hook for passes that
    /// keep state between ticks.
    fn reset(&mut self) {}
}
