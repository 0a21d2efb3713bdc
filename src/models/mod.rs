pub mod selection;
pub mod shop;
pub mod summary;

pub use selection::{Selection, TimeFrame};
pub use shop::{Order, Product, Shop, ShopData, ShopIdentity, Variant};
pub use summary::{Growth, MonthBucket, MonthKey, PricePoint, PriceSummary, SalesSummary};
