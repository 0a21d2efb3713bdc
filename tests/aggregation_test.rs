//! 聚合引擎的端到端场景: 过滤 → 月度/价格点汇总

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use shop_analytics::models::{Order, Product, Selection, TimeFrame, Variant};
use shop_analytics::service::{self, filter};

fn dec(s: &str) -> BigDecimal {
    s.parse().unwrap()
}

fn order(id: i64, variant_id: i64, quantity: i32, price: &str, date: &str) -> Order {
    Order {
        order_id: id,
        variant_id,
        quantity,
        price: dec(price),
        date: date.to_string(),
    }
}

fn variants() -> Vec<Variant> {
    vec![
        Variant { variant_id: 1, product_id: 1, variant_name: "S".into() },
        Variant { variant_id: 2, product_id: 1, variant_name: "L".into() },
        Variant { variant_id: 3, product_id: 2, variant_name: "One size".into() },
    ]
}

fn product(id: i64) -> Product {
    Product {
        product_id: id,
        shop_id: 1,
        product_name: format!("Product {}", id),
    }
}

fn sample_orders() -> Vec<Order> {
    vec![
        order(1, 1, 2, "19.99", "2024-01-05"),
        order(2, 1, 1, "19.99", "2024-02-11"),
        order(3, 2, 3, "17.99", "2024-02-20T08:15:00Z"),
        order(4, 2, 1, "19.994", "2024-10-02"),
        order(5, 3, 5, "12.50", "2024-10-15"),
        order(6, 3, 2, "14.00", "2024-11-01 10:00:00"),
        order(7, 3, 1, "9.00", "bad-date"),
    ]
}

#[test]
fn two_month_scenario() {
    let orders = vec![
        order(1, 1, 2, "10", "2024-01-05"),
        order(2, 1, 3, "10", "2024-02-05"),
    ];
    let summary = service::sales_summary(&orders, &variants(), &Selection::default());

    assert_eq!(summary.buckets.len(), 2);
    let jan = &summary.buckets[0];
    let feb = &summary.buckets[1];
    assert_eq!(jan.label, "1/2024");
    assert_eq!(jan.total_revenue, dec("20"));
    assert_eq!(jan.total_units, 2);
    assert_eq!(feb.label, "2/2024");
    assert_eq!(feb.total_revenue, dec("30"));
    assert_eq!(feb.total_units, 3);
    assert_eq!(feb.average_unit_price, dec("10"));

    let growth = summary.growth.unwrap();
    assert_eq!(growth.revenue, 50.0);
    assert_eq!(growth.units, 50.0);
}

#[test]
fn minute_precision_dates_are_counted() {
    let orders = vec![
        order(1, 1, 2, "10", "2024-01-05"),
        order(2, 1, 3, "10", "2024-02-05T10:30"),
        order(3, 1, 3, "10", "2024-02-06 09:15"),
    ];
    let summary = service::sales_summary(&orders, &variants(), &Selection::default());

    assert_eq!(summary.skipped_rows, 0);
    assert_eq!(summary.buckets.len(), 2);
    assert_eq!(summary.buckets[1].total_revenue, dec("60"));
    assert_eq!(summary.buckets[1].total_units, 6);
}

#[test]
fn months_sort_chronologically() {
    let orders = vec![
        order(1, 1, 1, "1", "2024-10-01"),
        order(2, 1, 1, "1", "2024-02-01"),
        order(3, 1, 1, "1", "2023-12-31"),
    ];
    let summary = service::sales_summary(&orders, &variants(), &Selection::default());
    let labels: Vec<&str> = summary.buckets.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["12/2023", "2/2024", "10/2024"]);
}

#[test]
fn monthly_revenue_is_conserved() {
    let orders = sample_orders();
    let all_variants = variants();

    let mut selections = vec![Selection::default()];
    let mut by_product = Selection::default();
    by_product.select_product(Some(product(1)));
    selections.push(by_product.clone());
    by_product.select_variant(Some(all_variants[1].clone())).unwrap();
    selections.push(by_product);

    for selection in &selections {
        let summary = service::sales_summary(&orders, &all_variants, selection);
        let bucket_sum = summary
            .buckets
            .iter()
            .fold(BigDecimal::zero(), |acc, b| acc + &b.total_revenue);

        let selected = filter::filter_by_selection(&orders, &all_variants, selection);
        let (dated, _) = filter::dated_orders(selected);
        let order_sum = dated
            .iter()
            .fold(BigDecimal::zero(), |acc, d| acc + d.order.line_revenue());

        assert_eq!(bucket_sum, order_sum);
        assert_eq!(bucket_sum, summary.total_revenue);
    }
}

#[test]
fn unparseable_dates_are_skipped_not_fatal() {
    let summary = service::sales_summary(&sample_orders(), &variants(), &Selection::default());
    assert_eq!(summary.skipped_rows, 1);
    assert_eq!(summary.order_count, 6);
}

#[test]
fn price_point_units_are_conserved() {
    let orders = sample_orders();
    let today = NaiveDate::from_ymd_opt(2024, 11, 30).unwrap();

    for time_frame in TimeFrame::ALL {
        let selection = Selection::new(time_frame);
        let summary = service::price_summary(&orders, &variants(), &selection, today);

        let point_units: i64 = summary.price_points.iter().map(|p| p.total_units).sum();
        assert_eq!(point_units, summary.total_units, "{}", time_frame);

        if let Some(optimal) = &summary.optimal {
            for p in &summary.price_points {
                assert!(optimal.total_revenue >= p.total_revenue);
            }
        }
    }
}

#[test]
fn price_view_with_year_window() {
    let orders = sample_orders();
    let today = NaiveDate::from_ymd_opt(2024, 11, 30).unwrap();
    let selection = Selection::new(TimeFrame::Year);
    let summary = service::price_summary(&orders, &variants(), &selection, today);

    // 19.99 与 19.994 落在同一价格点
    let prices: Vec<String> = summary.price_points.iter().map(|p| p.price.to_string()).collect();
    assert_eq!(prices, vec!["12.50", "14.00", "17.99", "19.99"]);

    let p1999 = summary.price_points.last().unwrap();
    assert_eq!(p1999.order_count, 3);
    assert_eq!(p1999.total_units, 4);

    let optimal = summary.optimal.unwrap();
    assert_eq!(optimal.price, dec("19.99"));
    assert_eq!(summary.min_price, Some(dec("12.50")));
    assert_eq!(summary.max_price, Some(dec("19.994")));
    assert_eq!(summary.window_start, NaiveDate::from_ymd_opt(2023, 11, 30).unwrap());
}

#[test]
fn seven_day_window_boundaries() {
    let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let orders = vec![
        order(1, 1, 1, "10", "2024-06-08"),
        order(2, 1, 1, "10", "2024-06-07"),
    ];
    let summary = service::price_summary(
        &orders,
        &variants(),
        &Selection::new(TimeFrame::SevenDays),
        today,
    );
    assert_eq!(summary.total_units, 1);
    assert_eq!(summary.price_points.len(), 1);
}

#[test]
fn empty_window_has_no_optimal() {
    let today = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
    let summary = service::price_summary(
        &sample_orders(),
        &variants(),
        &Selection::new(TimeFrame::SevenDays),
        today,
    );
    assert!(summary.price_points.is_empty());
    assert!(summary.optimal.is_none());
    assert!(summary.min_price.is_none());
    assert_eq!(summary.average_price, BigDecimal::zero());
}
