//! End-to-end order lifecycle tests over an in-memory database.

use rust_decimal::Decimal;
use surrealdb::RecordId;

use drape::auth::JwtConfig;
use drape::core::{Config, ServerState};
use drape::db;
use drape::db::models::{
    AuthProvider, CartItem, CategoryCreate, ColorVariant, OrderStatus, PaymentMethod,
    ProductCreate, ShippingAddress, SizeStock, SubcategoryCreate, User,
};
use drape::orders::{OrderError, ZeroStockPolicy};

fn ship() -> ShippingAddress {
    ShippingAddress {
        name: "Test User".into(),
        phone: "5550100".into(),
        street: "1 Main St".into(),
        city: "Springfield".into(),
        pincode: "600001".into(),
    }
}

async fn test_state(dir: &tempfile::TempDir) -> ServerState {
    let work_dir = dir.path().to_string_lossy().to_string();
    let config = Config {
        work_dir: work_dir.clone(),
        http_port: 0,
        db_path: format!("{work_dir}/db"),
        environment: "development".into(),
        jwt: JwtConfig::default(),
        request_timeout_ms: 30000,
        zero_stock_policy: ZeroStockPolicy::Remove,
        google_client_id: String::new(),
        smtp: None,
    };
    let db = db::init_mem_db().await.unwrap();
    ServerState::with_db(&config, db)
}

async fn seed_user(state: &ServerState, email: &str) -> RecordId {
    let user = state
        .users
        .create(User {
            id: None,
            name: "Test User".into(),
            email: email.into(),
            password_hash: None,
            provider: AuthProvider::Local,
            is_verified: true,
            otp_code: None,
            otp_expires_at: None,
            wishlist: Vec::new(),
            created_at: Some(chrono::Utc::now()),
        })
        .await
        .unwrap();
    user.id.unwrap()
}

/// Product with Red {M:3, L:2} and Blue {M:5} at 19.99
async fn seed_product(state: &ServerState) -> RecordId {
    let category = state
        .categories
        .create(CategoryCreate {
            name: "Men".into(),
            image: None,
        })
        .await
        .unwrap();
    let subcategory = state
        .subcategories
        .create(SubcategoryCreate {
            name: "T-Shirts".into(),
            image: None,
            category: category.id.unwrap(),
        })
        .await
        .unwrap();

    let product = state
        .products
        .create(ProductCreate {
            name: "Basic Tee".into(),
            description: Some("Plain cotton tee".into()),
            price: Decimal::new(1999, 2),
            subcategory: subcategory.id.unwrap(),
            variants: vec![
                ColorVariant {
                    color: "Red".into(),
                    images: vec!["red.jpg".into()],
                    sizes: vec![
                        SizeStock {
                            size: "M".into(),
                            quantity: 3,
                        },
                        SizeStock {
                            size: "L".into(),
                            quantity: 2,
                        },
                    ],
                },
                ColorVariant {
                    color: "Blue".into(),
                    images: vec![],
                    sizes: vec![SizeStock {
                        size: "M".into(),
                        quantity: 5,
                    }],
                },
            ],
        })
        .await
        .unwrap();
    product.id.unwrap()
}

async fn fill_cart(state: &ServerState, user: &RecordId, items: Vec<CartItem>) {
    let cart = state.carts.find_or_create(user).await.unwrap();
    state
        .carts
        .save_items(cart.id.as_ref().unwrap(), &items)
        .await
        .unwrap();
}

fn stock_of(state_product: &drape::db::models::Product, color: &str, size: &str) -> Option<u32> {
    state_product
        .variants
        .iter()
        .find(|v| v.color == color)
        .and_then(|v| v.sizes.iter().find(|s| s.size == size))
        .map(|s| s.quantity)
}

#[tokio::test]
async fn placing_an_order_reserves_stock_and_clears_the_cart() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let user = seed_user(&state, "buyer@example.com").await;
    let product = seed_product(&state).await;

    fill_cart(
        &state,
        &user,
        vec![CartItem {
            product: product.clone(),
            color: "Red".into(),
            size: "M".into(),
            quantity: 2,
        }],
    )
    .await;

    let order = state
        .order_service
        .place_order(&user, ship(), PaymentMethod::Cod)
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Placed);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].name, "Basic Tee");
    assert_eq!(order.items[0].image.as_deref(), Some("red.jpg"));
    assert_eq!(order.total_amount, Decimal::new(3998, 2));
    assert_eq!(order.shipping_address, ship());

    let stored = state
        .products
        .find_by_id(&product.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stock_of(&stored, "Red", "M"), Some(1));

    let cart = state.carts.find_by_user(&user).await.unwrap().unwrap();
    assert!(cart.items.is_empty());
}

#[tokio::test]
async fn empty_cart_cannot_be_checked_out() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let user = seed_user(&state, "buyer@example.com").await;

    let err = state
        .order_service
        .place_order(&user, ship(), PaymentMethod::Cod)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::EmptyCart));
}

#[tokio::test]
async fn shortfall_rolls_back_earlier_reservations() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let user = seed_user(&state, "buyer@example.com").await;
    let product = seed_product(&state).await;

    fill_cart(
        &state,
        &user,
        vec![
            CartItem {
                product: product.clone(),
                color: "Red".into(),
                size: "M".into(),
                quantity: 2,
            },
            CartItem {
                product: product.clone(),
                color: "Red".into(),
                size: "L".into(),
                quantity: 10,
            },
        ],
    )
    .await;

    let err = state
        .order_service
        .place_order(&user, ship(), PaymentMethod::Cod)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrderError::InsufficientStock { available: 2 }
    ));

    // First line was released again
    let stored = state
        .products
        .find_by_id(&product.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stock_of(&stored, "Red", "M"), Some(3));
    assert_eq!(stock_of(&stored, "Red", "L"), Some(2));

    // Cart survives the failed checkout
    let cart = state.carts.find_by_user(&user).await.unwrap().unwrap();
    assert_eq!(cart.items.len(), 2);
}

#[tokio::test]
async fn deleted_product_lines_are_dropped_at_checkout() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let user = seed_user(&state, "buyer@example.com").await;
    let product = seed_product(&state).await;

    let ghost = RecordId::from_table_key("product", "gone");
    fill_cart(
        &state,
        &user,
        vec![
            CartItem {
                product: ghost,
                color: "Red".into(),
                size: "M".into(),
                quantity: 1,
            },
            CartItem {
                product: product.clone(),
                color: "Blue".into(),
                size: "M".into(),
                quantity: 1,
            },
        ],
    )
    .await;

    let order = state
        .order_service
        .place_order(&user, ship(), PaymentMethod::Online)
        .await
        .unwrap();
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].color, "Blue");
}

#[tokio::test]
async fn cart_of_only_deleted_products_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let user = seed_user(&state, "buyer@example.com").await;

    fill_cart(
        &state,
        &user,
        vec![CartItem {
            product: RecordId::from_table_key("product", "gone"),
            color: "Red".into(),
            size: "M".into(),
            quantity: 1,
        }],
    )
    .await;

    let err = state
        .order_service
        .place_order(&user, ship(), PaymentMethod::Cod)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::EmptyCart));
}

#[tokio::test]
async fn cancelling_restores_stock_even_after_sellout_removed_the_variant() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let user = seed_user(&state, "buyer@example.com").await;
    let product = seed_product(&state).await;

    // Take everything Red: M row, L row, then the whole variant go away
    fill_cart(
        &state,
        &user,
        vec![
            CartItem {
                product: product.clone(),
                color: "Red".into(),
                size: "M".into(),
                quantity: 3,
            },
            CartItem {
                product: product.clone(),
                color: "Red".into(),
                size: "L".into(),
                quantity: 2,
            },
        ],
    )
    .await;
    let order = state
        .order_service
        .place_order(&user, ship(), PaymentMethod::Cod)
        .await
        .unwrap();

    let sold_out = state
        .products
        .find_by_id(&product.to_string())
        .await
        .unwrap()
        .unwrap();
    assert!(sold_out.variants.iter().all(|v| v.color != "Red"));

    let order_id = order.id.as_ref().unwrap().to_string();
    let cancelled = state
        .order_service
        .cancel_order(&order_id, &user)
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    // The variant is resurrected with its quantities, images not restored
    let restored = state
        .products
        .find_by_id(&product.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stock_of(&restored, "Red", "M"), Some(3));
    assert_eq!(stock_of(&restored, "Red", "L"), Some(2));
}

#[tokio::test]
async fn cancel_is_rejected_once_processing_starts() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let user = seed_user(&state, "buyer@example.com").await;
    let product = seed_product(&state).await;

    fill_cart(
        &state,
        &user,
        vec![CartItem {
            product: product.clone(),
            color: "Blue".into(),
            size: "M".into(),
            quantity: 1,
        }],
    )
    .await;
    let order = state
        .order_service
        .place_order(&user, ship(), PaymentMethod::Cod)
        .await
        .unwrap();
    let order_id = order.id.as_ref().unwrap().to_string();

    state
        .order_service
        .set_status(&order_id, OrderStatus::Processing)
        .await
        .unwrap();

    let err = state
        .order_service
        .cancel_order(&order_id, &user)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrderError::InvalidTransition {
            current: OrderStatus::Processing
        }
    ));
}

#[tokio::test]
async fn orders_are_fenced_per_user() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let buyer = seed_user(&state, "buyer@example.com").await;
    let other = seed_user(&state, "other@example.com").await;
    let product = seed_product(&state).await;

    fill_cart(
        &state,
        &buyer,
        vec![CartItem {
            product,
            color: "Blue".into(),
            size: "M".into(),
            quantity: 1,
        }],
    )
    .await;
    let order = state
        .order_service
        .place_order(&buyer, ship(), PaymentMethod::Cod)
        .await
        .unwrap();
    let order_id = order.id.as_ref().unwrap().to_string();

    let err = state
        .order_service
        .get_order(&order_id, &other)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::Forbidden));
}

#[tokio::test]
async fn accepted_return_restocks_only_the_returned_quantity() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let user = seed_user(&state, "buyer@example.com").await;
    let product = seed_product(&state).await;

    fill_cart(
        &state,
        &user,
        vec![CartItem {
            product: product.clone(),
            color: "Blue".into(),
            size: "M".into(),
            quantity: 3,
        }],
    )
    .await;
    let order = state
        .order_service
        .place_order(&user, ship(), PaymentMethod::Online)
        .await
        .unwrap();
    let order_id = order.id.as_ref().unwrap().to_string();

    // Walk the order to DELIVERED
    for status in [
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ] {
        state
            .order_service
            .set_status(&order_id, status)
            .await
            .unwrap();
    }

    // Over-asking is rejected, nothing changes
    let err = state
        .order_service
        .request_return(&order_id, &user, &product, 5)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidReturnQuantity(_)));

    let returned = state
        .order_service
        .request_return(&order_id, &user, &product, 2)
        .await
        .unwrap();
    assert_eq!(returned.status, OrderStatus::ReturnRequested);
    assert_eq!(returned.items[0].returned_qty, 2);

    // No stock moved yet
    let before = state
        .products
        .find_by_id(&product.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stock_of(&before, "Blue", "M"), Some(2));

    state
        .order_service
        .set_status(&order_id, OrderStatus::ReturnAccepted)
        .await
        .unwrap();

    let after = state
        .products
        .find_by_id(&product.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stock_of(&after, "Blue", "M"), Some(4));
}

#[tokio::test]
async fn replaying_the_accept_edge_restocks_each_unit_once() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let user = seed_user(&state, "buyer@example.com").await;
    let product = seed_product(&state).await;

    fill_cart(
        &state,
        &user,
        vec![CartItem {
            product: product.clone(),
            color: "Blue".into(),
            size: "M".into(),
            quantity: 3,
        }],
    )
    .await;
    let order = state
        .order_service
        .place_order(&user, ship(), PaymentMethod::Online)
        .await
        .unwrap();
    let order_id = order.id.as_ref().unwrap().to_string();

    for status in [
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ] {
        state
            .order_service
            .set_status(&order_id, status)
            .await
            .unwrap();
    }
    state
        .order_service
        .request_return(&order_id, &user, &product, 2)
        .await
        .unwrap();

    // Admin bounces the order through the accept edge twice
    let accepted = state
        .order_service
        .set_status(&order_id, OrderStatus::ReturnAccepted)
        .await
        .unwrap();
    assert_eq!(accepted.items[0].restocked_qty, 2);

    state
        .order_service
        .set_status(&order_id, OrderStatus::ReturnRequested)
        .await
        .unwrap();
    state
        .order_service
        .set_status(&order_id, OrderStatus::ReturnAccepted)
        .await
        .unwrap();

    // 5 - 3 sold + 2 returned; the replay released nothing extra
    let stored = state
        .products
        .find_by_id(&product.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stock_of(&stored, "Blue", "M"), Some(4));
}

#[tokio::test]
async fn return_requires_a_delivered_order() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let user = seed_user(&state, "buyer@example.com").await;
    let product = seed_product(&state).await;

    fill_cart(
        &state,
        &user,
        vec![CartItem {
            product: product.clone(),
            color: "Blue".into(),
            size: "M".into(),
            quantity: 1,
        }],
    )
    .await;
    let order = state
        .order_service
        .place_order(&user, ship(), PaymentMethod::Cod)
        .await
        .unwrap();
    let order_id = order.id.as_ref().unwrap().to_string();

    let err = state
        .order_service
        .request_return(&order_id, &user, &product, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidTransition { .. }));
}

#[tokio::test]
async fn two_buyers_racing_for_the_last_unit_produce_one_order() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let alice = seed_user(&state, "alice@example.com").await;
    let bob = seed_user(&state, "bob@example.com").await;
    let product = seed_product(&state).await;

    // Red L has 2 units; each buyer wants both of them
    let line = || CartItem {
        product: product.clone(),
        color: "Red".into(),
        size: "L".into(),
        quantity: 2,
    };
    fill_cart(&state, &alice, vec![line()]).await;
    fill_cart(&state, &bob, vec![line()]).await;

    let (a, b) = tokio::join!(
        state
            .order_service
            .place_order(&alice, ship(), PaymentMethod::Cod),
        state
            .order_service
            .place_order(&bob, ship(), PaymentMethod::Cod),
    );

    // Stock is 2; each wants 2; exactly one succeeds
    assert!(a.is_ok() != b.is_ok(), "exactly one order must win");
    let loser = if a.is_ok() { b } else { a };
    assert!(matches!(
        loser.unwrap_err(),
        OrderError::InsufficientStock { available: 0 }
    ));

    let stored = state
        .products
        .find_by_id(&product.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stock_of(&stored, "Red", "L"), None);
}

#[tokio::test]
async fn delivered_purchase_unlocks_reviewing() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir).await;
    let user = seed_user(&state, "buyer@example.com").await;
    let product = seed_product(&state).await;

    assert!(
        !state
            .orders
            .has_delivered_product(&user, &product)
            .await
            .unwrap()
    );

    fill_cart(
        &state,
        &user,
        vec![CartItem {
            product: product.clone(),
            color: "Blue".into(),
            size: "M".into(),
            quantity: 1,
        }],
    )
    .await;
    let order = state
        .order_service
        .place_order(&user, ship(), PaymentMethod::Cod)
        .await
        .unwrap();
    let order_id = order.id.as_ref().unwrap().to_string();

    assert!(
        !state
            .orders
            .has_delivered_product(&user, &product)
            .await
            .unwrap()
    );

    for status in [
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ] {
        state
            .order_service
            .set_status(&order_id, status)
            .await
            .unwrap();
    }

    assert!(
        state
            .orders
            .has_delivered_product(&user, &product)
            .await
            .unwrap()
    );
}
