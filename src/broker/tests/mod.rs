//! Tests for the broker boundary and the in-process backend

mod memory;
