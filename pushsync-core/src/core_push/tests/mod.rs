//! Engine-level tests: the scripted reconciliation scenario, concurrency and
//! convergence behavior, mirror correspondence, and algebraic properties of
//! the diff engine.

mod property_tests;
