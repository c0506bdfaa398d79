use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    analytics::{BestPeriodFinder, Clock, Period, TopPerformerFinder, UnderThresholdFilter},
    config::AnalyticsConfig,
    database::{NewSeller, SalesStore},
    service::error::{ServiceError, ServiceResult},
    types::{BestPeriod, DateWindow, Seller},
};

/// Seller management and the seller-level analytics queries.
pub struct SellerService {
    store: Arc<dyn SalesStore>,
    clock: Arc<dyn Clock>,
    config: AnalyticsConfig,
}

impl SellerService {
    pub fn new(store: Arc<dyn SalesStore>, clock: Arc<dyn Clock>, config: AnalyticsConfig) -> Self {
        Self { store, clock, config }
    }

    pub async fn find_all_sellers(&self) -> ServiceResult<Vec<Seller>> {
        Ok(self.store.find_all_sellers().await?)
    }

    pub async fn find_seller(&self, id: i32) -> ServiceResult<Option<Seller>> {
        Ok(self.store.find_seller(id).await?)
    }

    pub async fn create_seller(
        &self,
        name: String,
        contact_info: Option<String>,
    ) -> ServiceResult<Seller> {
        let seller = self
            .store
            .create_seller(NewSeller {
                name,
                contact_info,
                registration_date: self.clock.now(),
            })
            .await?;

        info!("Registered seller {} ({})", seller.id, seller.name);
        Ok(seller)
    }

    pub async fn update_seller(
        &self,
        id: i32,
        name: Option<String>,
        contact_info: Option<String>,
    ) -> ServiceResult<()> {
        if !self.store.update_seller(id, name, contact_info).await? {
            return Err(ServiceError::SellerNotFound(id));
        }
        debug!("Updated seller {}", id);
        Ok(())
    }

    pub async fn delete_seller(&self, id: i32) -> ServiceResult<()> {
        if !self.store.delete_seller(id).await? {
            return Err(ServiceError::SellerNotFound(id));
        }
        info!("Removed seller {}", id);
        Ok(())
    }

    /// Sellers whose turnover between `date_from` and `date_to` (whole days)
    /// is strictly below `threshold`.
    pub async fn sellers_under_threshold(
        &self,
        threshold: BigDecimal,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> ServiceResult<Vec<Seller>> {
        let window = DateWindow::from_dates(date_from, date_to);
        let sellers = self.store.find_all_sellers_with_transactions().await?;

        let filter = UnderThresholdFilter::new(threshold, window);
        Ok(filter
            .apply(&sellers)
            .into_iter()
            .map(without_transactions)
            .collect())
    }

    pub async fn most_productive_seller_in(&self, window: DateWindow) -> ServiceResult<Option<Seller>> {
        let sellers = self.store.find_all_sellers_with_transactions().await?;
        let finder = TopPerformerFinder::new(window);
        Ok(finder.find(&sellers).map(without_transactions))
    }

    pub async fn most_productive_seller(&self, period: Period) -> ServiceResult<Seller> {
        let window = period.window(self.clock.now());
        debug!("Looking up most productive seller for {} ({} .. {})", period, window.from, window.to);

        self.most_productive_seller_in(window)
            .await?
            .ok_or(ServiceError::NoActiveSeller(period))
    }

    pub async fn best_period(&self, seller_id: i32) -> ServiceResult<BestPeriod> {
        let seller = self
            .store
            .find_seller(seller_id)
            .await?
            .ok_or(ServiceError::SellerNotFound(seller_id))?;

        let count = seller.transactions.len();
        let limit = self.config.max_best_period_transactions;
        if count > limit {
            warn!("Refusing best period search for seller {}: {} transactions", seller_id, count);
            return Err(ServiceError::HistoryTooLarge {
                seller_id,
                count,
                limit,
            });
        }

        Ok(BestPeriodFinder::new().find(&seller.transactions))
    }
}

fn without_transactions(seller: &Seller) -> Seller {
    Seller {
        transactions: Vec::new(),
        ..seller.clone()
    }
}
