pub mod read_model;

pub mod catalog_service;
pub use catalog_service::CatalogService;

pub mod catalog_service_impl;
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod social_service;
pub mod social_service_impl;

pub use social_service::SocialService;
pub use social_service_impl::SeaOrmSocialService;

pub mod user_service;
pub use user_service::UserService;

pub mod user_service_impl;
pub use user_service_impl::SeaOrmUserService;

pub use crate::domain::ServiceError;
