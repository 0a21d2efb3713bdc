use crate::error::{AppError, Result};
use crate::models::{Order, Selection, TimeFrame, Variant};
use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexSet;

/// 带解析后日期的订单
#[derive(Debug, Clone, Copy)]
pub struct DatedOrder<'a> {
    pub date: NaiveDate,
    pub order: &'a Order,
}

/// 解析订单日期, 只取日历日
///
/// 支持 `YYYY-MM-DD`、RFC 3339、`YYYY-MM-DD HH:MM[:SS]` 以及 `YYYY-MM-DDTHH:MM[:SS]`。
pub fn parse_order_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::Data("missing order date".to_string()));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(dt.date());
        }
    }

    Err(AppError::Data(format!("unparseable order date: {:?}", raw)))
}

/// 校验单行订单: 日期可解析, 数量为正, 单价非负
pub fn validate_order(order: &Order) -> Result<NaiveDate> {
    if order.quantity <= 0 {
        return Err(AppError::Data(format!(
            "order {} has non-positive quantity {}",
            order.order_id, order.quantity
        )));
    }
    if order.price < BigDecimal::zero() {
        return Err(AppError::Data(format!(
            "order {} has negative price {}",
            order.order_id, order.price
        )));
    }
    parse_order_date(&order.date)
}

/// 按当前选择过滤订单
///
/// 规格优先; 否则取商品下所有规格的订单; 都没选时返回全部订单。
pub fn filter_by_selection<'a>(
    orders: &'a [Order],
    variants: &[Variant],
    selection: &Selection,
) -> Vec<&'a Order> {
    if let Some(variant) = selection.variant() {
        return orders
            .iter()
            .filter(|o| o.variant_id == variant.variant_id)
            .collect();
    }

    if let Some(product) = selection.product() {
        let variant_ids: IndexSet<i64> = variants
            .iter()
            .filter(|v| v.product_id == product.product_id)
            .map(|v| v.variant_id)
            .collect();
        return orders
            .iter()
            .filter(|o| variant_ids.contains(&o.variant_id))
            .collect();
    }

    orders.iter().collect()
}

/// 校验并附带日期; 非法行记录日志后跳过, 返回 (有效订单, 跳过行数)
pub fn dated_orders<'a, I>(orders: I) -> (Vec<DatedOrder<'a>>, usize)
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut dated = Vec::new();
    let mut skipped = 0;

    for order in orders {
        match validate_order(order) {
            Ok(date) => dated.push(DatedOrder { date, order }),
            Err(e) => {
                tracing::warn!("跳过订单 {}: {}", order.order_id, e);
                skipped += 1;
            }
        }
    }

    (dated, skipped)
}

/// 时间窗口过滤: window_start ≤ 订单日期 ≤ today
pub fn filter_by_window<'a>(
    orders: Vec<DatedOrder<'a>>,
    time_frame: TimeFrame,
    today: NaiveDate,
) -> Vec<DatedOrder<'a>> {
    let start = time_frame.window_start(today);
    orders
        .into_iter()
        .filter(|d| d.date >= start && d.date <= today)
        .collect()
}
