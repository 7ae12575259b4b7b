pub mod local_scheduler;
pub mod log_sender;
pub mod webhook_sender;

pub use local_scheduler::LocalReminderScheduler;
pub use log_sender::LogNotificationSender;
pub use webhook_sender::WebhookNotificationSender;
