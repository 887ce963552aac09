pub mod config;
pub mod dispatch;
pub mod handlers;
pub mod layout;
pub mod pages;
pub mod request;
pub mod response;
pub mod routing;
pub mod server;
