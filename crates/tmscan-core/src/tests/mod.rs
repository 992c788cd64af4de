//! Unit tests for `tmscan_core` types.
