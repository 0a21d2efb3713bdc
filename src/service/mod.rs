pub mod export;
pub mod filter;
pub mod price;
pub mod sales;

pub use filter::{filter_by_selection, parse_order_date};
pub use price::{optimal_price_point, price_summary};
pub use sales::{growth, sales_summary};
