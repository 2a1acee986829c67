pub mod entity;
pub mod error;
pub mod health;
pub mod message;
pub mod notification;
pub mod request;
pub mod response;
pub mod template;
pub mod validation;
