use crate::db::queries;
use crate::error::AppError;
use crate::models::{Order, Product, Shop, ShopData, Variant};
use async_trait::async_trait;
use sqlx::PgPool;

/// 订单数据源: 按店铺名查店铺, 按店铺ID取全部数据
#[async_trait]
pub trait ShopStore: Send + Sync {
    async fn find_shop_by_name(&self, shop_name: &str) -> Result<Option<Shop>, AppError>;

    /// 店铺不存在时返回 None
    async fn load_shop_data(&self, shop_id: i64) -> Result<Option<ShopData>, AppError>;
}

/// PostgreSQL 实现
pub struct PgShopStore {
    pool: PgPool,
}

impl PgShopStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShopStore for PgShopStore {
    async fn find_shop_by_name(&self, shop_name: &str) -> Result<Option<Shop>, AppError> {
        Ok(queries::get_shop_by_name(&self.pool, shop_name).await?)
    }

    async fn load_shop_data(&self, shop_id: i64) -> Result<Option<ShopData>, AppError> {
        let Some(shop) = queries::get_shop(&self.pool, shop_id).await? else {
            return Ok(None);
        };

        let mut data = ShopData::empty(shop);

        data.products = queries::list_products(&self.pool, shop_id).await?;
        tracing::debug!("店铺 {}: {} 个商品", shop_id, data.products.len());
        if data.products.is_empty() {
            return Ok(Some(data));
        }

        let product_ids: Vec<i64> = data.products.iter().map(|p| p.product_id).collect();
        data.variants = queries::list_variants(&self.pool, &product_ids).await?;
        tracing::debug!("店铺 {}: {} 个规格", shop_id, data.variants.len());
        if data.variants.is_empty() {
            return Ok(Some(data));
        }

        let variant_ids: Vec<i64> = data.variants.iter().map(|v| v.variant_id).collect();
        data.orders = queries::list_orders(&self.pool, &variant_ids).await?;
        tracing::debug!("店铺 {}: {} 条订单", shop_id, data.orders.len());

        Ok(Some(data))
    }
}

/// 内存实现, 用于测试和本地演示
#[derive(Debug, Default, Clone)]
pub struct MemoryShopStore {
    pub shops: Vec<Shop>,
    pub products: Vec<Product>,
    pub variants: Vec<Variant>,
    pub orders: Vec<Order>,
}

#[async_trait]
impl ShopStore for MemoryShopStore {
    async fn find_shop_by_name(&self, shop_name: &str) -> Result<Option<Shop>, AppError> {
        Ok(self.shops.iter().find(|s| s.shop_name == shop_name).cloned())
    }

    async fn load_shop_data(&self, shop_id: i64) -> Result<Option<ShopData>, AppError> {
        let Some(shop) = self.shops.iter().find(|s| s.shop_id == shop_id).cloned() else {
            return Ok(None);
        };

        let products: Vec<Product> = self
            .products
            .iter()
            .filter(|p| p.shop_id == shop_id)
            .cloned()
            .collect();
        let variants: Vec<Variant> = self
            .variants
            .iter()
            .filter(|v| products.iter().any(|p| p.product_id == v.product_id))
            .cloned()
            .collect();
        let orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| variants.iter().any(|v| v.variant_id == o.variant_id))
            .cloned()
            .collect();

        Ok(Some(ShopData {
            shop,
            products,
            variants,
            orders,
        }))
    }
}
