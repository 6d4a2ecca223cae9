//! # unpak-core
//!
//! A library for decoding legacy game engine packages and inspecting the
//! decoded structures.
//!
//! This crate provides the core functionality for:
//! - Reading and writing a bounded, position-tracked byte stream
//! - Decoding the package wire format: compact indices, scalars, math
//!   structures, containers, names and object references
//! - Describing structures at runtime and dumping them as indented text
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`archive`]: The byte stream and the compact index encoding
//! - [`codec`]: Per-type wire codecs layered on the archive
//! - [`reflect`]: Type descriptors, the type registry and schema-driven decode
//! - [`dump`]: Property tree collection and text layout
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use unpak_core::{decode_value, dump_properties, Archive, ArchiveConfig};
//! use unpak_core::reflect::registry;
//!
//! let mut ar = Archive::open("./Maps/Entry.unr", ArchiveConfig::new().format_version(68))?;
//! ar.seek(0x1c0)?;
//!
//! let ty = registry::find_struct_type("FBox")?.expect("core type");
//! let value = decode_value(&mut ar, &registry::read(), &ty)?;
//! print!("{}", dump_properties(&ty, &value)?);
//! # Ok::<(), unpak_core::Error>(())
//! ```
//!
//! ## Extensibility
//!
//! - [`Codec`]: Wire format of a value type
//! - [`Transport`]: Where archive bytes come from or go to
//! - [`Reflect`]: Descriptor and value conversion of a native type
//!

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod archive;
pub mod codec;
pub mod dump;
pub mod error;
pub mod reflect;

// Re-export primary types for convenience
pub use archive::{Archive, ArchiveConfig, MemoryTransport, Transport};
pub use codec::{Codec, FString, NameRef, ObjectRef, TArray, TLazyArray};
pub use dump::{dump_properties, DumpConfig, DumpNode, PropertyDumper};
pub use error::{Error, ErrorKind, Result};
pub use reflect::{decode_value, Reflect, StructValue, TypeDescriptor, TypeRegistry, Value};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
