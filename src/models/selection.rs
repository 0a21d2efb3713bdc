use crate::error::AppError;
use crate::models::{Product, Variant};
use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 价格分析的时间窗口 (向前滚动)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFrame {
    #[serde(rename = "7days")]
    SevenDays,
    #[default]
    #[serde(rename = "30days")]
    ThirtyDays,
    #[serde(rename = "90days")]
    NinetyDays,
    #[serde(rename = "year")]
    Year,
}

impl TimeFrame {
    pub const ALL: [TimeFrame; 4] = [
        TimeFrame::SevenDays,
        TimeFrame::ThirtyDays,
        TimeFrame::NinetyDays,
        TimeFrame::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::SevenDays => "7days",
            TimeFrame::ThirtyDays => "30days",
            TimeFrame::NinetyDays => "90days",
            TimeFrame::Year => "year",
        }
    }

    /// 窗口起始日 (含): today − N 天, year 为日历上的一年前
    ///
    /// 闰日 (2/29) 的一年前没有同一天, 取当月最后一天。
    pub fn window_start(&self, today: NaiveDate) -> NaiveDate {
        let start = match self {
            TimeFrame::SevenDays => today.checked_sub_days(Days::new(7)),
            TimeFrame::ThirtyDays => today.checked_sub_days(Days::new(30)),
            TimeFrame::NinetyDays => today.checked_sub_days(Days::new(90)),
            TimeFrame::Year => today.checked_sub_months(Months::new(12)),
        };
        start.unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFrame {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeFrame::ALL
            .into_iter()
            .find(|tf| tf.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Unknown time frame: {}", s)))
    }
}

/// 当前筛选条件: 商品 / 规格 / 时间窗口
///
/// 规格必须属于已选商品, 由 [`Selection::select_variant`] 保证;
/// 切换商品时规格被清空。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    product: Option<Product>,
    variant: Option<Variant>,
    pub time_frame: TimeFrame,
}

impl Selection {
    pub fn new(time_frame: TimeFrame) -> Self {
        Self {
            product: None,
            variant: None,
            time_frame,
        }
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn variant(&self) -> Option<&Variant> {
        self.variant.as_ref()
    }

    /// 选择商品 (None 表示全部商品), 同时清空规格
    pub fn select_product(&mut self, product: Option<Product>) {
        self.product = product;
        self.variant = None;
    }

    /// 选择规格; 规格不属于当前商品时拒绝, 状态保持不变
    pub fn select_variant(&mut self, variant: Option<Variant>) -> Result<(), AppError> {
        let Some(variant) = variant else {
            self.variant = None;
            return Ok(());
        };

        match &self.product {
            Some(product) if product.product_id == variant.product_id => {
                self.variant = Some(variant);
                Ok(())
            }
            Some(product) => Err(AppError::Validation(format!(
                "Variant {} does not belong to product {}",
                variant.variant_id, product.product_id
            ))),
            None => Err(AppError::Validation(format!(
                "Variant {} selected without a product",
                variant.variant_id
            ))),
        }
    }

    pub fn clear(&mut self) {
        self.product = None;
        self.variant = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64) -> Product {
        Product {
            product_id: id,
            shop_id: 1,
            product_name: format!("Product {}", id),
        }
    }

    fn variant(id: i64, product_id: i64) -> Variant {
        Variant {
            variant_id: id,
            product_id,
            variant_name: format!("Variant {}", id),
        }
    }

    #[test]
    fn selecting_product_clears_variant() {
        let mut selection = Selection::default();
        selection.select_product(Some(product(1)));
        selection.select_variant(Some(variant(10, 1))).unwrap();
        assert!(selection.variant().is_some());

        selection.select_product(Some(product(2)));
        assert_eq!(selection.product().map(|p| p.product_id), Some(2));
        assert!(selection.variant().is_none());
    }

    #[test]
    fn foreign_variant_is_rejected() {
        let mut selection = Selection::default();
        selection.select_product(Some(product(1)));
        selection.select_variant(Some(variant(10, 1))).unwrap();

        let err = selection.select_variant(Some(variant(20, 2))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(selection.variant().map(|v| v.variant_id), Some(10));
    }

    #[test]
    fn variant_without_product_is_rejected() {
        let mut selection = Selection::default();
        assert!(selection.select_variant(Some(variant(10, 1))).is_err());
        assert!(selection.select_variant(None).is_ok());
    }

    #[test]
    fn window_start_per_time_frame() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(
            TimeFrame::SevenDays.window_start(today),
            NaiveDate::from_ymd_opt(2024, 3, 24).unwrap()
        );
        assert_eq!(
            TimeFrame::ThirtyDays.window_start(today),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(
            TimeFrame::NinetyDays.window_start(today),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(
            TimeFrame::Year.window_start(today),
            NaiveDate::from_ymd_opt(2023, 3, 31).unwrap()
        );
    }

    #[test]
    fn year_window_on_leap_day_clamps_to_month_end() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            TimeFrame::Year.window_start(today),
            NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()
        );
    }

    #[test]
    fn time_frame_parses_wire_names() {
        assert_eq!("90days".parse::<TimeFrame>().unwrap(), TimeFrame::NinetyDays);
        assert!("weekly".parse::<TimeFrame>().is_err());
        assert_eq!(TimeFrame::default(), TimeFrame::ThirtyDays);
    }
}
