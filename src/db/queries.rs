use crate::models::{Order, Product, Shop, Variant};
use sqlx::PgPool;

/// 按店铺名查询店铺
pub async fn get_shop_by_name(
    pool: &PgPool,
    shop_name: &str,
) -> Result<Option<Shop>, sqlx::Error> {
    sqlx::query_as::<_, Shop>(
        r#"
        SELECT shop_id, shop_name
        FROM shop
        WHERE shop_name = $1
        "#
    )
    .bind(shop_name)
    .fetch_optional(pool)
    .await
}

/// 按店铺ID查询店铺
pub async fn get_shop(
    pool: &PgPool,
    shop_id: i64,
) -> Result<Option<Shop>, sqlx::Error> {
    sqlx::query_as::<_, Shop>(
        r#"
        SELECT shop_id, shop_name
        FROM shop
        WHERE shop_id = $1
        "#
    )
    .bind(shop_id)
    .fetch_optional(pool)
    .await
}

/// 查询店铺下的商品
pub async fn list_products(
    pool: &PgPool,
    shop_id: i64,
) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        r#"
        SELECT product_id, shop_id, product_name
        FROM product
        WHERE shop_id = $1
        ORDER BY product_id
        "#
    )
    .bind(shop_id)
    .fetch_all(pool)
    .await
}

/// 查询一组商品的规格
pub async fn list_variants(
    pool: &PgPool,
    product_ids: &[i64],
) -> Result<Vec<Variant>, sqlx::Error> {
    sqlx::query_as::<_, Variant>(
        r#"
        SELECT variant_id, product_id, variant_name
        FROM variant
        WHERE product_id = ANY($1)
        ORDER BY variant_id
        "#
    )
    .bind(product_ids)
    .fetch_all(pool)
    .await
}

/// 查询一组规格的订单 (日期按原始文本返回)
pub async fn list_orders(
    pool: &PgPool,
    variant_ids: &[i64],
) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(
        r#"
        SELECT order_id,
               variant_id,
               quantity,
               price,
               order_date AS date
        FROM orders
        WHERE variant_id = ANY($1)
        ORDER BY order_id
        "#
    )
    .bind(variant_ids)
    .fetch_all(pool)
    .await
}
