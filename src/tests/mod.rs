//! Integration tests for the buoy tracker binary.
