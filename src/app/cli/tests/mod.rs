//! Tests for command-line parsing and configuration loading
