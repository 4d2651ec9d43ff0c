//! End-to-end coverage for parent/child store wiring.

/// Typed counter state shared by the end-to-end suites.
pub mod fixtures;

#[cfg(test)]
mod lifecycle;

#[cfg(test)]
mod scenario;
