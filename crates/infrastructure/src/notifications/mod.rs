pub mod log_user_notifier;
pub mod sns_user_notifier;

pub use log_user_notifier::LogUserNotifier;
pub use sns_user_notifier::SnsUserNotifier;
