//! Data models for the product catalog service

pub mod product;
pub mod session;
pub mod user;

pub use product::{
    Image, ImageResponse, NewProduct, Product, ProductChanges, ProductListResponse,
    ProductResponse,
};
pub use session::{NewSession, Session};
pub use user::{LoginRequest, NewUser, RegisterRequest, User, UserResponse};
