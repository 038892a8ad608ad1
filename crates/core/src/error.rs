use crate::region::Region;
use crate::store::FieldKind;
use glam::IVec3;
use thiserror::Error;

/// Errors raised while reading or publishing region fields.
///
/// `MissingField` and `InsufficientBorder` are contract violations: an upstream step never
/// produced what a consumer declared it needs. They abort the current region only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// No field of this kind has been published for the region.
    #[error("field {kind:?} has not been produced for region {region}")]
    MissingField {
        /// Requested field kind.
        kind: FieldKind,
        /// Region being processed.
        region: Region,
    },
    /// The field exists but does not cover the requested region plus halo.
    #[error("field {kind:?} covers {available} but {required} was requested")]
    InsufficientBorder {
        /// Requested field kind.
        kind: FieldKind,
        /// Region the stored field covers.
        available: Region,
        /// Region the caller asked for.
        required: Region,
    },
    /// A bounds-checked accessor refused a position outside the field.
    #[error("position {pos} is outside field region {region}")]
    OutOfBounds {
        /// Offending position.
        pos: IVec3,
        /// Region the field covers.
        region: Region,
    },
    /// The stored field has a different element type than requested.
    #[error("field {kind:?} holds {found} data, expected {expected}")]
    WrongFieldType {
        /// Requested field kind.
        kind: FieldKind,
        /// Type the caller asked for.
        expected: &'static str,
        /// Type actually stored.
        found: &'static str,
    },
    /// The sea level constant was never provided.
    #[error("sea level has not been provided for region {0}")]
    MissingSeaLevel(Region),
    /// Raw data handed to a field constructor does not match the region volume.
    #[error("expected {expected} values for region {region}, got {actual}")]
    SizeMismatch {
        /// Region the field was built for.
        region: Region,
        /// Number of cells the region needs.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },
}
