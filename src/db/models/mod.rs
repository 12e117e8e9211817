//! Database Models

// Serde helpers
pub mod serde_helpers;

// Accounts
pub mod address;
pub mod user;

// Catalog
pub mod category;
pub mod product;
pub mod subcategory;

// Shopping
pub mod cart;
pub mod order;
pub mod review;

// Marketing
pub mod advertisement;

// Re-exports
pub use address::{Address, AddressCreate, AddressUpdate};
pub use advertisement::{Advertisement, AdvertisementCreate, AdvertisementUpdate};
pub use cart::{Cart, CartItem};
pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use order::{Order, OrderItem, OrderStatus, PaymentMethod, ShippingAddress};
pub use product::{ColorVariant, Product, ProductCreate, ProductUpdate, SizeStock};
pub use review::Review;
pub use subcategory::{Subcategory, SubcategoryCreate, SubcategoryUpdate};
pub use user::{AuthProvider, User, UserResponse};
