pub mod contact;
pub mod facebook;
pub mod files;
pub mod flash;
pub mod handlers;
pub mod instagram;
pub mod middleware;
pub mod progress;
pub mod routes;
pub mod youtube;

pub use routes::create_router;
