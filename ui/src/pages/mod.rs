//! Pages module for the application.
//!
//! One page per [`Route`](sadtime_business::Route):
//! - `loading_page`: placeholder until the initial session check resolves
//! - `login_page`: login form for signed-out users
//! - `dashboard_page`: analytics summary for the signed-in user

mod dashboard_page;
mod loading_page;
mod login_page;

pub use dashboard_page::dashboard_page;
pub use loading_page::loading_page;
pub use login_page::login_page;
