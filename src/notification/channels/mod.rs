//! 具体渠道实现

pub mod wework;

pub use wework::WeworkSender;
