pub mod addresses;
pub mod audit_logs;
pub mod cart_items;
pub mod categories;
pub mod order_items;
pub mod orders;
pub mod product_quantities;
pub mod products;
pub mod reviews;
pub mod subcategories;
pub mod transactions;
pub mod users;
pub mod wishlist_items;

pub use addresses::Entity as Addresses;
pub use audit_logs::Entity as AuditLogs;
pub use cart_items::Entity as CartItems;
pub use categories::Entity as Categories;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use product_quantities::Entity as ProductQuantities;
pub use products::Entity as Products;
pub use reviews::Entity as Reviews;
pub use subcategories::Entity as Subcategories;
pub use transactions::Entity as Transactions;
pub use users::Entity as Users;
pub use wishlist_items::Entity as WishlistItems;
