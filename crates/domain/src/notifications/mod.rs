pub mod user_notifier;

pub use user_notifier::UserNotifier;
