//! Plan dtypes to Polars dtypes.

use planbridge_core::plan::DataType;
use planbridge_core::{BridgeError, Result};
use polars::prelude::{DataType as PlDataType, TimeUnit};

/// Cast targets this engine accepts, by descriptor name.
pub const SUPPORTED_DTYPES: &[&str] = DataType::ALL_NAMES;

/// Resolve a raw enum value from the wire. Unknown or unspecified values are
/// `Unsupported`.
pub fn polars_dtype(raw: i32) -> Result<PlDataType> {
    let dt = DataType::try_from(raw)
        .map_err(|_| BridgeError::Unsupported(format!("unknown data type {raw}")))?;
    to_polars(dt)
}

pub fn to_polars(dt: DataType) -> Result<PlDataType> {
    Ok(match dt {
        DataType::Int64 => PlDataType::Int64,
        DataType::Int32 => PlDataType::Int32,
        DataType::Int16 => PlDataType::Int16,
        DataType::Int8 => PlDataType::Int8,
        DataType::Uint64 => PlDataType::UInt64,
        DataType::Uint32 => PlDataType::UInt32,
        DataType::Uint16 => PlDataType::UInt16,
        DataType::Uint8 => PlDataType::UInt8,
        DataType::Float64 => PlDataType::Float64,
        DataType::Float32 => PlDataType::Float32,
        DataType::Bool => PlDataType::Boolean,
        DataType::Utf8 => PlDataType::String,
        DataType::Date => PlDataType::Date,
        DataType::Datetime => PlDataType::Datetime(TimeUnit::Microseconds, None),
        DataType::Time => PlDataType::Time,
        DataType::Unspecified => {
            return Err(BridgeError::Unsupported("cast to unspecified data type".into()));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_wire_values() {
        assert_eq!(polars_dtype(DataType::Int8 as i32).unwrap(), PlDataType::Int8);
        assert_eq!(polars_dtype(DataType::Utf8 as i32).unwrap(), PlDataType::String);
        assert_eq!(
            polars_dtype(DataType::Datetime as i32).unwrap(),
            PlDataType::Datetime(TimeUnit::Microseconds, None)
        );
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(matches!(polars_dtype(0), Err(BridgeError::Unsupported(_))));
        assert!(matches!(polars_dtype(77), Err(BridgeError::Unsupported(_))));
    }
}
