//! Domain models and database entities.
//!
//! Models represent the core business entities used throughout the application.

pub mod category;
pub mod comment;
pub mod district;
pub mod escalation;
pub mod feedback;
pub mod location;
pub mod notification;
pub mod status_log;
pub mod team;
pub mod ticket;
pub mod ticket_follower;
pub mod ticket_photo;
pub mod user;

pub use category::Category;
pub use comment::{Comment, CreateComment};
pub use district::District;
pub use escalation::{CreateEscalation, EscalationRequest, EscalationStatus, ReviewEscalation};
pub use feedback::{CreateFeedback, Feedback};
pub use location::{CreateLocation, Location};
pub use notification::{CreateNotification, Notification, NotificationType};
pub use status_log::{CreateStatusLog, StatusLog};
pub use team::{CreateTeam, Team};
pub use ticket::{
    CreateTicket, Ticket, TicketDetail, TicketFilters, TicketStatus, TicketSummary, UpdateTicket,
};
pub use ticket_follower::TicketFollower;
pub use ticket_photo::{CreateTicketPhoto, TicketPhoto, TicketPhotoSummary};
pub use user::{Role, User, UserSummary};
