//! Shared server state
//!
//! Everything a handler needs, cheap to clone: repositories over the
//! embedded database, the stock ledger, and the auth/email/asset
//! services.

use std::path::Path;
use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::{GoogleVerifier, JwtService};
use crate::core::Config;
use crate::db;
use crate::db::repository::{
    AddressRepository, AdvertisementRepository, CartRepository, CategoryRepository,
    OrderRepository, ProductRepository, ReviewRepository, SubcategoryRepository, UserRepository,
};
use crate::orders::{OrderService, StockLedger};
use crate::services::{AssetStore, EmailService};
use crate::utils::AppError;

#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    jwt: Arc<JwtService>,
    pub users: UserRepository,
    pub products: ProductRepository,
    pub categories: CategoryRepository,
    pub subcategories: SubcategoryRepository,
    pub carts: CartRepository,
    pub orders: OrderRepository,
    pub reviews: ReviewRepository,
    pub advertisements: AdvertisementRepository,
    pub addresses: AddressRepository,
    pub ledger: Arc<StockLedger>,
    pub order_service: Arc<OrderService>,
    pub email: EmailService,
    pub assets: AssetStore,
    pub google: GoogleVerifier,
}

impl ServerState {
    /// Open the on-disk database and wire up all services
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = db::init_db(&config.db_path).await?;
        Ok(Self::with_db(config, db))
    }

    /// Build state over an existing database handle (tests use an
    /// in-memory one)
    pub fn with_db(config: &Config, db: Surreal<Db>) -> Self {
        let products = ProductRepository::new(db.clone());
        let carts = CartRepository::new(db.clone());
        let orders = OrderRepository::new(db.clone());

        let ledger = Arc::new(StockLedger::new(products.clone(), config.zero_stock_policy));
        let order_service = Arc::new(OrderService::new(
            orders.clone(),
            carts.clone(),
            ledger.clone(),
        ));

        Self {
            config: Arc::new(config.clone()),
            jwt: Arc::new(JwtService::with_config(config.jwt.clone())),
            users: UserRepository::new(db.clone()),
            products,
            categories: CategoryRepository::new(db.clone()),
            subcategories: SubcategoryRepository::new(db.clone()),
            carts,
            orders,
            reviews: ReviewRepository::new(db.clone()),
            advertisements: AdvertisementRepository::new(db.clone()),
            addresses: AddressRepository::new(db),
            ledger,
            order_service,
            email: EmailService::new(config.smtp.clone()),
            assets: AssetStore::new(Path::new(&config.work_dir)),
            google: GoogleVerifier::new(config.google_client_id.clone()),
        }
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt
    }
}
