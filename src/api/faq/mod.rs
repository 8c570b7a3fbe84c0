// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! FAQ API Module
//!
//! POST /faq: top-K FAQ answers for a free-text query.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::faq_handler;
pub use request::{FaqRequest, DEFAULT_TOP_K};
pub use response::FaqResponse;
