//! Unit tests for grammar decoding and compilation.

mod document_tests;
