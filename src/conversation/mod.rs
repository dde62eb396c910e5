// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Export all submodules and their public types
pub mod format;
pub mod manager;
pub mod safety;
pub mod shape;

// Re-export main types for convenience
pub use format::{format_history, truncate_prompt, Turn};
pub use manager::{ConversationManager, FALLBACK_RESPONSES};
pub use safety::{SafetyFilter, SAFETY_RESPONSES};
pub use shape::shape_response;
