pub mod http;
pub mod state;

pub use http::ApiClient;
pub use state::{AuthState, DashboardContext, FetchStatus, SalesState};
