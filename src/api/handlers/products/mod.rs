pub mod get;
pub mod list;
pub mod types;
pub mod upload;

pub use get::get_product;
pub use list::list_products;
pub use upload::upload_product;
