/*!
Targets for the [log] macros used across the solver.

No logger is installed by the library. The binary installs `env_logger`, so
for example `RUST_LOG=propagation=trace` shows every propagated literal.
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Boolean constraint propagation and watch moves.
    pub const PROPAGATION: &str = "propagation";

    /// Watch index construction.
    pub const WATCH: &str = "watch";

    /// Decisions made by the search driver.
    pub const DECISION: &str = "decision";

    /// Undoing the trail and flipping decisions.
    pub const BACKTRACK: &str = "backtrack";

    /// Loading formulas.
    pub const PARSE: &str = "parse";
}
