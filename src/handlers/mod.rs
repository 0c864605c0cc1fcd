//! HTTP request handlers.
//!
//! Handlers parse and validate the request, enforce RBAC, delegate business
//! logic to a service or repository, and shape the response. Business rules
//! that span more than one repository call live in `services`, not here.

pub mod categories;
pub mod districts;
pub mod escalations;
pub mod feedback;
pub mod notifications;
pub mod teams;
pub mod tickets;
