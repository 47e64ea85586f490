//! HTTP API module for the attendance and pay engine.
//!
//! This module provides the REST API endpoints for recording attendance,
//! viewing pay and schedules, and the manager's administration routes.

mod context;
mod handlers;
mod request;
mod response;
mod state;

pub use context::{ROLE_HEADER, RequestContext, Role, USER_ID_HEADER};
pub use handlers::create_router;
pub use request::{
    AttendanceRequest, DateQuery, MonthQuery, RegisterWorkerRequest, ScheduleRequest,
    StartTimeRequest,
};
pub use response::{ApiError, ApiErrorResponse, CheckInResponse, CheckOutResponse};
pub use state::AppState;
