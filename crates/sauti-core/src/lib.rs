//! Sauti Core - XTTS inference backend adapter
//!
//! This crate sits between a generic string-tensor inference protocol and a
//! stateful, slow-to-initialize XTTS voice-cloning model:
//!
//! - [`model::ModelHandle`] owns one-time startup: fetch the weight snapshot
//!   from the hub, load the synthesis engine from local disk, record the
//!   output sample rate.
//! - [`adapter::handle`] translates one request at a time: decode the text
//!   and optional base64 reference voice, synthesize, return base64 WAV.
//!
//! # Example
//!
//! ```ignore
//! use sauti_core::{adapter, BackendConfig, ModelHandle, RawRequest, XttsBridge};
//!
//! let config = BackendConfig::from_env();
//! let model = ModelHandle::initialize::<XttsBridge>(&config)?;
//!
//! let request = RawRequest::new().with_field(adapter::TEXT_INPUT, "Hello, world!");
//! let response = adapter::handle(&request, &model);
//! ```

pub mod adapter;
pub mod audio;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;

pub use adapter::{handle, InferResponse, RawRequest};
pub use config::BackendConfig;
pub use engine::{SynthesisEngine, XttsBridge};
pub use error::{Error, Result};
pub use model::{ModelHandle, SnapshotFetcher};
