//! Data access layer (repositories).
//!
//! Repositories handle database operations and provide a clean interface
//! for data access. Each repository is responsible for a specific domain entity.

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

pub use category::CategoryRepository;
pub use comment::CommentRepository;
pub use district::DistrictRepository;
pub use escalation::EscalationRepository;
pub use feedback::FeedbackRepository;
pub use location::LocationRepository;
pub use notification::NotificationRepository;
pub use status_log::StatusLogRepository;
pub use team::TeamRepository;
pub use ticket::TicketRepository;
pub use ticket_follower::TicketFollowerRepository;
pub use ticket_photo::TicketPhotoRepository;
pub use user::UserRepository;
