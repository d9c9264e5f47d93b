//! # syncable-proto
//!
//! Specifiers and the operation log format for operation-based state
//! synchronization.
//!
//! ## Features
//!
//! - Specifier parsing with lossless round-trip (`/type#id!version.op`)
//! - Token accessors, version decomposition and the `has`/`fits`/`set`
//!   algebra
//! - Operation log parsing and serialization, with diff operations carrying
//!   patch blocks
//! - Incremental parsing of growing buffers
//! - Optional Tokio codec for framing logs out of byte streams
//! - Optional serde support

#![deny(clippy::all)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ### Specifiers
//!
//! ```rust
//! use syncable_proto::Spec;
//!
//! let spec: Spec = "/Class#ID!7Umum+gritzko~ssn.event".parse().unwrap();
//! assert_eq!(spec.ty(), "Class");
//! assert_eq!(spec.version(), "7Umum+gritzko~ssn");
//! assert_eq!(spec.author(), "gritzko");
//!
//! assert!(spec.fits("/Class.event").unwrap());
//! let moved = spec.set("#other").unwrap();
//! assert_eq!(moved.to_string(), "/Class#other!7Umum+gritzko~ssn.event");
//! ```
//!
//! ### Operation logs
//!
//! ```rust
//! use syncable_proto::log::{self, DiffOps, LogParser};
//!
//! let text = "/Model#test!timeX+author~ssn.on\t\n\
//!             \t!time0.set\t{\"x\":1}\n\
//!             \n\
//!             /Model#test!timeY+author~ssn.set\t{\"y\":2}\n";
//!
//! let ops = LogParser::new(DiffOps::new(["on"])).parse(text).unwrap();
//! assert_eq!(ops.len(), 2);
//! assert_eq!(ops[0].patch.as_ref().unwrap()[0].value, r#"{"x":1}"#);
//! assert_eq!(log::serialize(&ops).unwrap(), text);
//! ```

pub mod error;
pub mod log;
pub mod op;
pub mod quant;
pub mod spec;
pub mod token;
pub mod version;

pub use self::error::{FilterError, LogParseError, ProtocolError, Result, SpecParseError};
pub use self::op::Op;
pub use self::quant::Quant;
pub use self::spec::Spec;
pub use self::token::{Token, TokenRef};
pub use self::version::{compare_stamps, Version};

#[cfg(feature = "codec")]
pub use self::log::OpCodec;
