//! Domain models for the storefront.
//!
//! Wire types mirror the remote mock store's record shapes (Spanish field
//! names, loosely typed scalars); domain types carry the normalized values
//! the managers work with.

pub mod product;
pub mod session;
pub mod user;

pub use product::{NewProduct, Product, ProductValidationError};
pub use session::{CurrentUser, StoredUser};
pub use session::keys as storage_keys;
pub use user::{NewUser, UserRecord};
