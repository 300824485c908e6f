//! Error types for the OFX framework.

use std::fmt;

use ofx_sys::{status, OfxStatus};

/// Errors that can occur on the plugin side of the API.
#[derive(Debug)]
pub enum Error {
    /// A suite call returned a non-ok status with no more specific meaning.
    Suite(OfxStatus),
    /// The host lacks a suite or feature the plugin needs.
    HostInadequate(String),
    /// The host does not recognise a property name.
    PropertyUnknownToHost(String),
    /// The host rejected a typed property write.
    PropertyValueIllegalToHost(String),
    /// A parameter or clip was fetched under the wrong type.
    TypeRequest(String),
    /// A handle the host passed in was null where it may not be.
    BadHandle,
    /// An index past the dimension of a property.
    BadIndex(String, usize),
    /// Allocation failure, host- or plugin-side.
    Memory,
    /// An enumerated string from the host was not recognised.
    UnknownEnum(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suite(stat) => write!(f, "Suite call failed with status {}", stat),
            Self::HostInadequate(what) => write!(f, "Host inadequate: {}", what),
            Self::PropertyUnknownToHost(name) => write!(f, "Property unknown to host: {}", name),
            Self::PropertyValueIllegalToHost(name) => {
                write!(f, "Property value rejected by host: {}", name)
            }
            Self::TypeRequest(what) => write!(f, "Type mismatch: {}", what),
            Self::BadHandle => write!(f, "Bad or null handle"),
            Self::BadIndex(name, index) => {
                write!(f, "Index {} out of range for property {}", index, name)
            }
            Self::Memory => write!(f, "Memory allocation failed"),
            Self::UnknownEnum(s) => write!(f, "Unrecognised enumeration string: {}", s),
        }
    }
}

impl std::error::Error for Error {}

/// Result type for OFX operations.
pub type OfxResult<T> = Result<T, Error>;

impl Error {
    /// The status code reported back through the action entry point.
    pub fn status(&self) -> OfxStatus {
        match self {
            Self::Suite(stat) => *stat,
            Self::HostInadequate(_) | Self::PropertyUnknownToHost(_) => {
                status::ERR_MISSING_HOST_FEATURE
            }
            Self::Memory => status::ERR_MEMORY,
            Self::BadHandle => status::ERR_BAD_HANDLE,
            Self::BadIndex(_, _) => status::ERR_BAD_INDEX,
            Self::PropertyValueIllegalToHost(_) => status::ERR_VALUE,
            Self::TypeRequest(_) | Self::UnknownEnum(_) => status::FAILED,
        }
    }
}

/// Turns a suite status into a result, mapping the statuses that carry a
/// specific meaning at the property boundary.
pub fn status_to_result(stat: OfxStatus, property: &std::ffi::CStr) -> OfxResult<()> {
    match stat {
        status::OK => Ok(()),
        status::ERR_UNKNOWN => Err(Error::PropertyUnknownToHost(
            property.to_string_lossy().into_owned(),
        )),
        status::ERR_VALUE => Err(Error::PropertyValueIllegalToHost(
            property.to_string_lossy().into_owned(),
        )),
        status::ERR_MEMORY => Err(Error::Memory),
        status::ERR_BAD_HANDLE => Err(Error::BadHandle),
        other => Err(Error::Suite(other)),
    }
}

/// Turns a plain suite status into a result.
pub fn check_status(stat: OfxStatus) -> OfxResult<()> {
    match stat {
        status::OK => Ok(()),
        status::ERR_MEMORY => Err(Error::Memory),
        status::ERR_BAD_HANDLE => Err(Error::BadHandle),
        other => Err(Error::Suite(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_round_trips() {
        assert_eq!(Error::Memory.status(), status::ERR_MEMORY);
        assert_eq!(Error::Suite(status::ERR_FORMAT).status(), status::ERR_FORMAT);
        assert_eq!(
            Error::HostInadequate("no message suite".into()).status(),
            status::ERR_MISSING_HOST_FEATURE
        );
        assert_eq!(
            Error::PropertyUnknownToHost("OfxPropFuture".into()).status(),
            status::ERR_MISSING_HOST_FEATURE
        );
    }

    #[test]
    fn property_statuses_pick_specific_errors() {
        let name = c"OfxPropLabel";
        assert!(matches!(
            status_to_result(status::ERR_UNKNOWN, name),
            Err(Error::PropertyUnknownToHost(_))
        ));
        assert!(matches!(
            status_to_result(status::ERR_VALUE, name),
            Err(Error::PropertyValueIllegalToHost(_))
        ));
        assert!(status_to_result(status::OK, name).is_ok());
    }
}
