// Service layer for business logic
//
// Services own the rules that sit above the store: existence checks,
// registration capacity, notifications. They return `CampusError`.

pub mod database;
pub mod event;
pub mod notification;
pub mod registration;
pub mod user;

pub use database::DatabaseService;
pub use event::EventService;
pub use notification::NotificationService;
pub use registration::RegistrationService;
pub use user::UserService;
