use crate::models::{Growth, MonthBucket, MonthKey, Order, SalesSummary, Selection, Variant};
use crate::service::filter::{self, DatedOrder};
use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use chrono::Datelike;
use std::collections::BTreeMap;

/// 月度累加器
#[derive(Debug, Default)]
struct MonthAccumulator {
    revenue: BigDecimal,
    units: i64,
    orders: usize,
}

/// 销售视图: 按选择过滤后做月度汇总、环比增长和线性趋势
pub fn sales_summary(orders: &[Order], variants: &[Variant], selection: &Selection) -> SalesSummary {
    let selected = filter::filter_by_selection(orders, variants, selection);
    let (dated, skipped_rows) = filter::dated_orders(selected);

    let mut buckets = monthly_buckets(&dated);
    apply_trend(&mut buckets);
    let growth = growth(&buckets);

    let total_units: i64 = dated.iter().map(|d| i64::from(d.order.quantity)).sum();
    let total_revenue = dated
        .iter()
        .fold(BigDecimal::zero(), |acc, d| acc + d.order.line_revenue());
    let average_price = safe_div(&total_revenue, total_units);

    tracing::debug!(
        "销售汇总: {} 条订单, {} 个月, 跳过 {} 行",
        dated.len(),
        buckets.len(),
        skipped_rows
    );

    SalesSummary {
        buckets,
        growth,
        total_units,
        total_revenue,
        average_price,
        order_count: dated.len(),
        skipped_rows,
    }
}

/// 按 (年, 月) 分组, BTreeMap 保证按日历时间升序
pub fn monthly_buckets(orders: &[DatedOrder<'_>]) -> Vec<MonthBucket> {
    let mut groups: BTreeMap<MonthKey, MonthAccumulator> = BTreeMap::new();

    for d in orders {
        let key = MonthKey {
            year: d.date.year(),
            month: d.date.month(),
        };
        let acc = groups.entry(key).or_default();
        acc.revenue += d.order.line_revenue();
        acc.units += i64::from(d.order.quantity);
        acc.orders += 1;
    }

    groups
        .into_iter()
        .map(|(period, acc)| MonthBucket {
            period,
            label: period.to_string(),
            average_unit_price: safe_div(&acc.revenue, acc.units),
            total_revenue: acc.revenue,
            total_units: acc.units,
            order_count: acc.orders,
            trend_value: None,
        })
        .collect()
}

/// 最近两个月的环比; 上期为 0 时按约定记为 100
pub fn growth(buckets: &[MonthBucket]) -> Option<Growth> {
    let [.., previous, current] = buckets else {
        return None;
    };

    let prev_revenue = previous.total_revenue.to_f64().unwrap_or(0.0);
    let curr_revenue = current.total_revenue.to_f64().unwrap_or(0.0);

    Some(Growth {
        revenue: percent_change(prev_revenue, curr_revenue),
        units: percent_change(previous.total_units as f64, current.total_units as f64),
    })
}

fn percent_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        return 100.0;
    }
    (current - previous) / previous * 100.0
}

/// 收入对月份序号 (0..n-1) 的最小二乘拟合
///
/// 返回 (slope, intercept); 少于两个点时为 None。
pub fn linear_fit(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0_f64, 0.0_f64, 0.0_f64, 0.0_f64);
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Some((slope, intercept))
}

/// 写入每个月的趋势值
pub fn apply_trend(buckets: &mut [MonthBucket]) {
    let revenues: Vec<f64> = buckets
        .iter()
        .map(|b| b.total_revenue.to_f64().unwrap_or(0.0))
        .collect();

    let Some((slope, intercept)) = linear_fit(&revenues) else {
        return;
    };

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.trend_value = Some(intercept + slope * i as f64);
    }
}

/// amount / units, units 为 0 时返回 0
pub(crate) fn safe_div(amount: &BigDecimal, units: i64) -> BigDecimal {
    if units == 0 {
        return BigDecimal::zero();
    }
    amount / &BigDecimal::from(units)
}
