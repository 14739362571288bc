//! Data transfer objects for mutation inputs and outputs
//!
//! This module provides:
//! - Request DTOs with validation for mutation inputs
//! - Response DTOs for serializing mutation results

pub mod requests;
pub mod responses;

pub use requests::{
    CreateCampaignRequest, SubmitContentRequest, UpdateMetricsRequest, UpdateStatusRequest,
};
pub use responses::{CampaignResponse, MetricsResponse, SubmissionResponse};
