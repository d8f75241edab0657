//! ShopGreen: verification and availability engine for a map-based directory
//! of sustainable local shops, plus the service shell that exposes it.

pub mod config;
pub mod directory;
pub mod error;
pub mod telemetry;
