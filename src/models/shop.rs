use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 店铺 (shop)
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Shop {
    pub shop_id: i64,
    pub shop_name: String,
}

/// 登录响应里的店铺信息, 也是会话 Cookie 的内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopIdentity {
    pub id: i64,
    pub name: String,
}

impl From<Shop> for ShopIdentity {
    fn from(shop: Shop) -> Self {
        Self {
            id: shop.shop_id,
            name: shop.shop_name,
        }
    }
}

/// 商品 (product)
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub product_id: i64,
    pub shop_id: i64,
    pub product_name: String,
}

/// 商品规格/SKU (variant)
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Variant {
    pub variant_id: i64,
    pub product_id: i64,
    pub variant_name: String,
}

/// 订单行 (orders)
///
/// `date` 保持原始字符串, 由聚合层解析, 解析失败的行会被跳过。
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub variant_id: i64,
    pub quantity: i32,
    pub price: BigDecimal,
    pub date: String,
}

impl Order {
    /// 行金额 = 单价 × 数量
    pub fn line_revenue(&self) -> BigDecimal {
        &self.price * BigDecimal::from(self.quantity)
    }
}

/// `/api/shop/{shopId}/data` 的响应体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopData {
    pub shop: Shop,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub orders: Vec<Order>,
}

impl ShopData {
    pub fn empty(shop: Shop) -> Self {
        Self {
            shop,
            products: Vec::new(),
            variants: Vec::new(),
            orders: Vec::new(),
        }
    }
}
