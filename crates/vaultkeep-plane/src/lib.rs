//! Management-plane boundary: restore submission, restorable-resource
//! listings, and the HTTP transport behind them.

mod cancel;
pub mod enumerate;
mod error;
pub mod restore;
pub mod transport;
pub mod wire;

#[cfg(feature = "http")]
pub mod http;

pub use enumerate::{ContainerQuery, Enumerator, Restorables};
pub use error::{PlaneError, TransportError};
pub use restore::{RestoreOutcome, RestoreService};
pub use transport::{RestorableCatalog, RestoreTransport};
pub use wire::RawRestorableEntry;

#[cfg(feature = "http")]
pub use http::{HttpPlane, HttpPlaneConfig};
