//! Tests for foreground/background job lifecycle and cancellation

mod helpers;
