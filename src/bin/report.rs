//! 店铺销售/价格分析报表
//!
//! 登录店铺, 拉取订单数据, 按选择生成月度汇总和价格点汇总。
//!
//! ```bash
//! shop-report --shop "Fashion Store"
//! shop-report --shop "Fashion Store" --product 3 --variant 7 --time-frame 90days
//! shop-report --shop "Home Goods" --csv-dir ./out
//! ```

use chrono::{Local, NaiveDate};
use clap::Parser;
use shop_analytics::client::{ApiClient, DashboardContext};
use shop_analytics::models::{PriceSummary, SalesSummary, TimeFrame};
use shop_analytics::service::export;
use shop_analytics::AppConfig;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shop-report")]
#[command(about = "Sales and price analytics for one shop")]
#[command(version)]
struct Cli {
    /// 店铺名
    #[arg(long)]
    shop: String,

    /// 商品ID (不填为全部商品)
    #[arg(long)]
    product: Option<i64>,

    /// 规格ID, 需要同时指定商品
    #[arg(long, requires = "product")]
    variant: Option<i64>,

    /// 价格分析窗口: 7days | 30days | 90days | year
    #[arg(long, default_value = "30days")]
    time_frame: TimeFrame,

    /// 窗口截止日, 默认今天
    #[arg(long)]
    today: Option<NaiveDate>,

    /// 服务地址, 覆盖配置
    #[arg(long)]
    base_url: Option<String>,

    /// 导出 CSV 的目录
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// 以 JSON 输出汇总
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    let base_url = cli.base_url.unwrap_or(config.client.base_url);

    let mut client = ApiClient::new(base_url);
    let mut ctx = DashboardContext::new();

    let shop = ctx.login(&mut client, &cli.shop).await?;
    info!("Logged in as {} (id {}) at {}", shop.name, shop.id, client.base_url());
    ctx.load_shop_data(&client).await?;

    ctx.sales.select_product(cli.product)?;
    ctx.sales.select_variant(cli.variant)?;
    ctx.set_time_frame(cli.time_frame);

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let sales = ctx.sales_summary();
    let price = ctx.price_summary(today);

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "shop": shop,
                "sales": sales,
                "price": price,
            }))?
        );
    } else {
        print_sales(&sales);
        println!();
        print_price(&price);
    }

    if let Some(dir) = cli.csv_dir {
        std::fs::create_dir_all(&dir)?;
        export::export_month_buckets(&sales.buckets, &dir.join("sales_by_month.csv"))?;
        export::export_price_points(&price.price_points, &dir.join("price_points.csv"))?;
        info!("CSV written to {}", dir.display());
    }

    Ok(())
}

fn print_sales(sales: &SalesSummary) {
    println!("== Sales ==");
    println!(
        "units: {}  revenue: {}  avg price: {}  orders: {}",
        sales.total_units,
        sales.total_revenue.round(2),
        sales.average_price.round(2),
        sales.order_count
    );
    if let Some(growth) = &sales.growth {
        println!(
            "growth: revenue {:+.1}%  units {:+.1}%",
            growth.revenue, growth.units
        );
    }
    if sales.skipped_rows > 0 {
        println!("skipped rows: {}", sales.skipped_rows);
    }

    println!(
        "{:<10} {:>12} {:>8} {:>8} {:>10} {:>12}",
        "month", "revenue", "units", "orders", "avg", "trend"
    );
    for b in &sales.buckets {
        println!(
            "{:<10} {:>12} {:>8} {:>8} {:>10} {:>12}",
            b.label,
            b.total_revenue.round(2).to_string(),
            b.total_units,
            b.order_count,
            b.average_unit_price.round(2).to_string(),
            b.trend_value.map(|v| format!("{:.2}", v)).unwrap_or_default()
        );
    }
}

fn print_price(price: &PriceSummary) {
    println!(
        "== Price ({}: {} .. {}) ==",
        price.time_frame, price.window_start, price.window_end
    );
    println!(
        "units: {}  revenue: {}  avg price: {}",
        price.total_units,
        price.total_revenue.round(2),
        price.average_price.round(2)
    );
    if let (Some(min), Some(max)) = (&price.min_price, &price.max_price) {
        println!("price range: {} .. {}", min.round(2), max.round(2));
    }
    if let Some(optimal) = &price.optimal {
        println!(
            "optimal price point: {} (revenue {})",
            optimal.price,
            optimal.total_revenue.round(2)
        );
    }

    println!(
        "{:>10} {:>8} {:>8} {:>12} {:>10} {:>10}",
        "price", "orders", "units", "revenue", "units/ord", "rev/unit"
    );
    for p in &price.price_points {
        println!(
            "{:>10} {:>8} {:>8} {:>12} {:>10.2} {:>10}",
            p.price.to_string(),
            p.order_count,
            p.total_units,
            p.total_revenue.round(2).to_string(),
            p.avg_units_per_order,
            p.revenue_per_unit.round(2).to_string()
        );
    }
}
