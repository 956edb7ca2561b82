//! Shared utilities for the cardledger workspace.

pub mod version_info;
