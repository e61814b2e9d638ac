pub mod health_route;
pub mod readiness_route;
