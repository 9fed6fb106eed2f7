pub mod csv_export;
pub mod export_writer;
pub mod html_export;
pub mod notifier;

pub use csv_export::build_csv;
pub use export_writer::ExportWriter;
pub use notifier::{
    ListInvalidator, ListKey, LogNotifier, NoopInvalidator, Notification, NotificationLevel,
    Notifier,
};
