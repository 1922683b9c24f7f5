pub use super::models::Entity as Models;
