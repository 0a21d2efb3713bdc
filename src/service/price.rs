use crate::models::{Order, PricePoint, PriceSummary, Selection, Variant};
use crate::service::filter::{self, DatedOrder};
use crate::service::sales::safe_div;
use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct PriceAccumulator {
    occurrences: usize,
    units: i64,
    revenue: BigDecimal,
}

/// 价格点的分组键: 四舍五入到分
///
/// 用精确十进制作键, 避免浮点字符串键冲突。
pub fn price_key(price: &BigDecimal) -> BigDecimal {
    price.round(2).with_scale(2)
}

/// 价格视图: 选择过滤 → 时间窗口过滤 → 价格点分组
pub fn price_summary(
    orders: &[Order],
    variants: &[Variant],
    selection: &Selection,
    today: NaiveDate,
) -> PriceSummary {
    let selected = filter::filter_by_selection(orders, variants, selection);
    let (dated, skipped_rows) = filter::dated_orders(selected);
    let windowed = filter::filter_by_window(dated, selection.time_frame, today);

    let price_points = price_points(&windowed);
    let optimal = optimal_price_point(&price_points).cloned();

    let total_units: i64 = windowed.iter().map(|d| i64::from(d.order.quantity)).sum();
    let total_revenue = windowed
        .iter()
        .fold(BigDecimal::zero(), |acc, d| acc + d.order.line_revenue());
    let average_price = safe_div(&total_revenue, total_units);
    let min_price = windowed.iter().map(|d| &d.order.price).min().cloned();
    let max_price = windowed.iter().map(|d| &d.order.price).max().cloned();

    tracing::debug!(
        "价格汇总 [{}]: 窗口内 {} 条订单, {} 个价格点",
        selection.time_frame,
        windowed.len(),
        price_points.len()
    );

    PriceSummary {
        time_frame: selection.time_frame,
        window_start: selection.time_frame.window_start(today),
        window_end: today,
        price_points,
        optimal,
        total_units,
        total_revenue,
        average_price,
        min_price,
        max_price,
        skipped_rows,
    }
}

/// 按价格 (到分) 分组, 价格升序
pub fn price_points(orders: &[DatedOrder<'_>]) -> Vec<PricePoint> {
    let mut groups: BTreeMap<BigDecimal, PriceAccumulator> = BTreeMap::new();

    for d in orders {
        let acc = groups.entry(price_key(&d.order.price)).or_default();
        acc.occurrences += 1;
        acc.units += i64::from(d.order.quantity);
        acc.revenue += d.order.line_revenue();
    }

    groups
        .into_iter()
        .map(|(price, acc)| PricePoint {
            price,
            order_count: acc.occurrences,
            total_units: acc.units,
            avg_units_per_order: if acc.occurrences == 0 {
                0.0
            } else {
                acc.units as f64 / acc.occurrences as f64
            },
            revenue_per_unit: safe_div(&acc.revenue, acc.units),
            total_revenue: acc.revenue,
        })
        .collect()
}

/// 总收入最高的价格点; 收入相同时保留价格较低的那个
pub fn optimal_price_point(points: &[PricePoint]) -> Option<&PricePoint> {
    let mut iter = points.iter();
    let first = iter.next()?;
    Some(iter.fold(first, |best, p| {
        if p.total_revenue > best.total_revenue {
            p
        } else {
            best
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::filter::dated_orders;

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    fn order(id: i64, quantity: i32, price: &str) -> Order {
        Order {
            order_id: id,
            variant_id: 1,
            quantity,
            price: dec(price),
            date: "2024-05-01".to_string(),
        }
    }

    #[test]
    fn groups_by_rounded_price() {
        let orders = vec![
            order(1, 2, "9.994"),
            order(2, 1, "9.99"),
            order(3, 4, "12.5"),
            order(4, 1, "9.995"),
        ];
        let (dated, _) = dated_orders(&orders);
        let points = price_points(&dated);

        let prices: Vec<String> = points.iter().map(|p| p.price.to_string()).collect();
        assert_eq!(prices, vec!["9.99", "10.00", "12.50"]);

        assert_eq!(points[0].order_count, 2);
        assert_eq!(points[0].total_units, 3);
        assert_eq!(points[0].total_revenue, dec("29.978"));
        assert_eq!(points[0].avg_units_per_order, 1.5);
        assert_eq!(points[2].revenue_per_unit, dec("12.5"));
    }

    #[test]
    fn optimal_is_max_revenue() {
        let orders = vec![order(1, 1, "5"), order(2, 10, "3"), order(3, 2, "8")];
        let (dated, _) = dated_orders(&orders);
        let points = price_points(&dated);
        let best = optimal_price_point(&points).unwrap();
        assert_eq!(best.price, dec("3.00"));
        for p in &points {
            assert!(best.total_revenue >= p.total_revenue);
        }
    }

    #[test]
    fn optimal_tie_keeps_lower_price() {
        let orders = vec![order(1, 4, "5"), order(2, 2, "10")];
        let (dated, _) = dated_orders(&orders);
        let points = price_points(&dated);
        assert_eq!(optimal_price_point(&points).unwrap().price, dec("5.00"));
    }

    #[test]
    fn no_points_no_optimal() {
        assert!(optimal_price_point(&[]).is_none());
    }
}
