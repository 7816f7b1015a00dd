//! Remote control of Anritsu MD1230B / MD1260A traffic generators over
//! their line-oriented TCP command protocol.
//!
//! Every value written to the analyzer is read back and compared before a
//! configuration counts as committed.

pub mod commit;
pub mod convert;
pub mod counter;
pub mod error;
pub mod port;
pub mod proto;
pub mod session;
pub mod stream;
pub mod test;
pub mod transport;
pub mod validate;

pub use error::{AnritsuError, Result, ValidationError};
pub use session::{DeviceType, Session, SessionConfig};
