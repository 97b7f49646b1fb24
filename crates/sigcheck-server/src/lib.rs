//! HTTP gateway layer.

pub mod gateway;
