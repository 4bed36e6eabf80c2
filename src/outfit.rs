/// Worn vs. closeted item partitioning.
pub mod conflict;
/// Visible layer stack construction.
pub mod stack;
