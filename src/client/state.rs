use crate::client::ApiClient;
use crate::error::AppError;
use crate::models::{
    Order, PriceSummary, Product, SalesSummary, Selection, ShopData, ShopIdentity, TimeFrame,
    Variant,
};
use crate::service;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 请求生命周期: idle → loading → succeeded | failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// 登录状态
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub shop: Option<ShopIdentity>,
    pub status: FetchStatus,
    pub error: Option<String>,
    pub is_authenticated: bool,
}

impl AuthState {
    pub fn begin(&mut self) {
        self.status = FetchStatus::Loading;
        self.error = None;
    }

    pub fn succeed(&mut self, shop: ShopIdentity) {
        self.status = FetchStatus::Succeeded;
        self.shop = Some(shop);
        self.is_authenticated = true;
        self.error = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = FetchStatus::Failed;
        self.error = Some(message.into());
        self.is_authenticated = false;
    }

    /// 之前会话里记住的店铺, 直接视为已登录
    pub fn restore_shop(&mut self, shop: ShopIdentity) {
        self.shop = Some(shop);
        self.is_authenticated = true;
    }

    pub fn logout(&mut self) {
        *self = AuthState::default();
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

/// 店铺数据与当前选择
#[derive(Debug, Clone, Default)]
pub struct SalesState {
    pub products: Vec<Product>,
    pub variants: Vec<Variant>,
    pub orders: Vec<Order>,
    pub selection: Selection,
    pub status: FetchStatus,
    pub error: Option<String>,
}

impl SalesState {
    pub fn begin_fetch(&mut self) {
        self.status = FetchStatus::Loading;
        self.error = None;
    }

    /// 一次性替换商品/规格/订单
    pub fn fetch_succeeded(&mut self, data: ShopData) {
        self.products = data.products;
        self.variants = data.variants;
        self.orders = data.orders;
        self.status = FetchStatus::Succeeded;
        self.error = None;
    }

    /// 失败时保留之前的数据
    pub fn fetch_failed(&mut self, message: impl Into<String>) {
        self.status = FetchStatus::Failed;
        self.error = Some(message.into());
    }

    /// 选择商品 (None 为全部商品), 规格随之清空
    pub fn select_product(&mut self, product_id: Option<i64>) -> Result<(), AppError> {
        let product = match product_id {
            None => None,
            Some(id) => Some(
                self.products
                    .iter()
                    .find(|p| p.product_id == id)
                    .cloned()
                    .ok_or_else(|| AppError::Validation(format!("Unknown product {}", id)))?,
            ),
        };
        self.selection.select_product(product);
        Ok(())
    }

    /// 选择规格 (None 为全部规格); 规格必须属于已选商品
    pub fn select_variant(&mut self, variant_id: Option<i64>) -> Result<(), AppError> {
        let variant = match variant_id {
            None => None,
            Some(id) => Some(
                self.variants
                    .iter()
                    .find(|v| v.variant_id == id)
                    .cloned()
                    .ok_or_else(|| AppError::Validation(format!("Unknown variant {}", id)))?,
            ),
        };
        self.selection.select_variant(variant)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// 已选商品下的规格; 未选商品时为空
    pub fn product_variants(&self) -> Vec<&Variant> {
        let Some(product) = self.selection.product() else {
            return Vec::new();
        };
        self.variants
            .iter()
            .filter(|v| v.product_id == product.product_id)
            .collect()
    }
}

/// 仪表盘上下文: 登录状态 + 店铺数据 + 选择
///
/// 显式传给聚合函数, 没有全局单例。
#[derive(Debug, Clone, Default)]
pub struct DashboardContext {
    pub auth: AuthState,
    pub sales: SalesState,
}

impl DashboardContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_time_frame(&mut self, time_frame: TimeFrame) {
        self.sales.selection.time_frame = time_frame;
    }

    pub fn sales_summary(&self) -> SalesSummary {
        service::sales_summary(&self.sales.orders, &self.sales.variants, &self.sales.selection)
    }

    pub fn price_summary(&self, today: NaiveDate) -> PriceSummary {
        service::price_summary(
            &self.sales.orders,
            &self.sales.variants,
            &self.sales.selection,
            today,
        )
    }

    /// 登录并记录生命周期
    pub async fn login(
        &mut self,
        client: &mut ApiClient,
        shop_name: &str,
    ) -> Result<ShopIdentity, AppError> {
        self.auth.begin();
        match client.authenticate(shop_name.trim()).await {
            Ok(shop) => {
                self.auth.succeed(shop.clone());
                Ok(shop)
            }
            Err(e) => {
                self.auth.fail(e.to_string());
                Err(e)
            }
        }
    }

    /// 拉取当前店铺数据; 不做去重, 后完成的请求覆盖先完成的
    pub async fn load_shop_data(&mut self, client: &ApiClient) -> Result<(), AppError> {
        let Some(shop_id) = self.auth.shop.as_ref().map(|s| s.id) else {
            let err = AppError::Validation("No shop ID available for fetching data".to_string());
            self.sales.fetch_failed(err.to_string());
            return Err(err);
        };

        self.sales.begin_fetch();
        match client.fetch_shop_data(shop_id).await {
            Ok(data) => {
                self.sales.fetch_succeeded(data);
                Ok(())
            }
            Err(e) => {
                self.sales.fetch_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// 退出登录, 清空会话和已加载的店铺数据
    pub fn logout(&mut self, client: &mut ApiClient) {
        self.auth.logout();
        self.sales = SalesState::default();
        client.clear_session();
    }
}
