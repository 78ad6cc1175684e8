pub mod notification_dropdown;
pub mod page;

pub use notification_dropdown::render_notification_dropdown;
pub use page::render_page;
