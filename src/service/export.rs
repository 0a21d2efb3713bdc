use crate::error::Result;
use crate::models::{MonthBucket, PricePoint};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// 导出月度汇总到 CSV
pub fn write_month_buckets<W: Write>(buckets: &[MonthBucket], writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record([
        "month",
        "total_revenue",
        "total_units",
        "order_count",
        "average_unit_price",
        "trend_value",
    ])?;

    for bucket in buckets {
        writer.write_record([
            bucket.label.clone(),
            bucket.total_revenue.to_string(),
            bucket.total_units.to_string(),
            bucket.order_count.to_string(),
            bucket.average_unit_price.round(4).to_string(),
            bucket.trend_value.map(|v| format!("{:.2}", v)).unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// 导出价格点到 CSV
pub fn write_price_points<W: Write>(points: &[PricePoint], writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record([
        "price",
        "order_count",
        "total_units",
        "total_revenue",
        "avg_units_per_order",
        "revenue_per_unit",
    ])?;

    for point in points {
        writer.write_record([
            point.price.to_string(),
            point.order_count.to_string(),
            point.total_units.to_string(),
            point.total_revenue.to_string(),
            format!("{:.2}", point.avg_units_per_order),
            point.revenue_per_unit.round(4).to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn export_month_buckets(buckets: &[MonthBucket], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    write_month_buckets(buckets, file)
}

pub fn export_price_points(points: &[PricePoint], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    write_price_points(points, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MonthKey;
    use bigdecimal::BigDecimal;

    #[test]
    fn month_buckets_csv_layout() {
        let buckets = vec![MonthBucket {
            period: MonthKey { year: 2024, month: 2 },
            label: "2/2024".to_string(),
            total_revenue: BigDecimal::from(30),
            total_units: 3,
            order_count: 1,
            average_unit_price: BigDecimal::from(10),
            trend_value: Some(30.0),
        }];

        let mut out = Vec::new();
        write_month_buckets(&buckets, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "month,total_revenue,total_units,order_count,average_unit_price,trend_value"
        );
        assert_eq!(lines[1], "2/2024,30,3,1,10,30.00");
    }

    #[test]
    fn price_points_csv_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("price_points.csv");
        let points = vec![PricePoint {
            price: "9.99".parse().unwrap(),
            order_count: 2,
            total_units: 3,
            total_revenue: "29.97".parse().unwrap(),
            avg_units_per_order: 1.5,
            revenue_per_unit: "9.99".parse().unwrap(),
        }];

        export_price_points(&points, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("price,order_count"));
        assert!(text.contains("9.99,2,3,29.97,1.50,9.99"));
    }
}
