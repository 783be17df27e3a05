//! # Netabase Mapping
//!
//! Builds object-relational class metadata from XML mapping documents.
//!
//! A mapping document declares, per class, its table, fields, identifiers
//! and generators, embedded value objects, associations, overrides,
//! lifecycle callbacks and entity listeners. [`XmlDriver`] reads one document
//! per class and returns a fully populated [`ClassMetadata`] or the first
//! [`MappingError`] found.
//!
//! ## Quick Start
//!
//! ```
//! use netabase_mapping::prelude::*;
//!
//! let mut locator = InMemoryLocator::new();
//! locator.add_document(
//!     r#"<doctrine-mapping>
//!         <entity name="App\User" table="users">
//!             <id name="id" type="integer"><generator strategy="IDENTITY"/></id>
//!             <field name="email" type="string" length="180" unique="true"/>
//!             <one-to-many field="posts" target-entity="App\Post" mapped-by="author"/>
//!         </entity>
//!     </doctrine-mapping>"#,
//! )?;
//!
//! let driver = XmlDriver::new(locator);
//! let metadata = driver.load_metadata_for_class("App\\User", None, &BuildingContext::default())?;
//!
//! assert_eq!(metadata.identifier(), vec!["id"]);
//! assert_eq!(metadata.field("email").and_then(|f| f.length), Some(180));
//! # Ok::<(), MappingError>(())
//! ```
//!
//! Documents can also be read from directories through [`FileLocator`],
//! configured with [`DriverConfig`].

pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod locator;
pub mod metadata;
pub mod naming;
pub mod prelude;
pub mod types;
pub mod xml;

pub use config::DriverConfig;
pub use context::BuildingContext;
pub use driver::{DriverChain, MappingDriver, XmlDriver};
pub use error::{MappingError, MappingResult};
pub use locator::{FileLocator, InMemoryLocator, MappingLocator};
pub use metadata::ClassMetadata;
