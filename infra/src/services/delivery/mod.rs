//! Link delivery sinks

mod log_sink;

pub use log_sink::LogLinkDelivery;
