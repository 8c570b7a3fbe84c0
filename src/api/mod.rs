// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod embed;
pub mod errors;
pub mod faq;
pub mod handlers;
pub mod http_server;

pub use embed::{embed_handler, EmbedRequest, EmbedResponse};
pub use errors::{ApiError, ErrorResponse};
pub use faq::{faq_handler, FaqRequest, FaqResponse};
pub use handlers::{ApiIndexResponse, EndpointInfo, HealthResponse};
pub use http_server::{create_router, start_server, AppState};
