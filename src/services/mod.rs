//! Business logic services.
//!
//! Services contain the core business logic and orchestrate operations
//! between handlers, repositories, and external integrations.

pub mod escalation_service;
pub mod notification_service;
pub mod team_routing;
pub mod ticket_service;
