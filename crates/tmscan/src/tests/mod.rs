//! Unit tests for the `tmscan` scanning engine.

mod fixtures;
mod wrapped_tests;

mod behaviour;
