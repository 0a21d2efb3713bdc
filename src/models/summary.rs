use crate::models::TimeFrame;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 月份键 (年, 月), 按日历时间排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl fmt::Display for MonthKey {
    /// 展示格式 `M/YYYY`, 仅用于显示, 不参与排序
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}

/// 按月汇总的销售数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub period: MonthKey,
    pub label: String,
    pub total_revenue: BigDecimal,
    pub total_units: i64,
    pub order_count: usize,
    pub average_unit_price: BigDecimal,
    /// 线性趋势值, 少于两个月时为空
    pub trend_value: Option<f64>,
}

/// 最近两个月的环比增长 (百分比)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Growth {
    pub revenue: f64,
    pub units: f64,
}

/// 销售视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub buckets: Vec<MonthBucket>,
    pub growth: Option<Growth>,
    pub total_units: i64,
    pub total_revenue: BigDecimal,
    pub average_price: BigDecimal,
    pub order_count: usize,
    /// 因日期/数量/价格非法而跳过的订单行
    pub skipped_rows: usize,
}

/// 价格点汇总 (价格精确到分)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: BigDecimal,
    pub order_count: usize,
    pub total_units: i64,
    pub total_revenue: BigDecimal,
    pub avg_units_per_order: f64,
    pub revenue_per_unit: BigDecimal,
}

/// 价格视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub time_frame: TimeFrame,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub price_points: Vec<PricePoint>,
    pub optimal: Option<PricePoint>,
    pub total_units: i64,
    pub total_revenue: BigDecimal,
    pub average_price: BigDecimal,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,
    pub skipped_rows: usize,
}
