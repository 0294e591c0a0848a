pub mod api_status;
mod dashboard;
mod login;

pub use api_status::api_status;
pub use dashboard::{dashboard_header, summary_view};
pub use login::login_widget;
