//! Async HTTP client for the TVWS Remote Spectrum Service.
//!
//! The service owns the state/location registries, measurement storage,
//! and the free/occupied classification rule. This crate only speaks its
//! JSON contract: bearer-token auth, `{detail: "..."}` error envelopes,
//! and the query/upload endpoints. Business logic (session lifecycle,
//! selection cascade, ingestion) lives in `tvws-core`.

pub mod client;
pub mod error;
pub mod model;
pub mod transport;

mod auth;
mod catalog;
mod spectrum;

pub use client::SpectrumClient;
pub use error::Error;
pub use model::{
    ChannelReading, ChannelStatus, Coordinates, Identity, LoginSession, MeasurementUpload,
    NewReading, QueryRequest, QueryResult, Region, Role, Site,
};
pub use transport::{TlsMode, TransportConfig};
