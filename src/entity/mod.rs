pub mod appointments;
pub mod audit_logs;
pub mod cart_items;
pub mod otps;
pub mod users;

pub use appointments::Entity as Appointments;
pub use audit_logs::Entity as AuditLogs;
pub use cart_items::Entity as CartItems;
pub use otps::Entity as Otps;
pub use users::Entity as Users;
