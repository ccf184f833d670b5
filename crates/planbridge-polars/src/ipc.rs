//! Arrow IPC (file format) encoding of frames.

use planbridge_core::{ArrowCompat, Result};
use polars::prelude::*;

use crate::error::export_error;

pub(crate) fn compat_level(compat: ArrowCompat) -> CompatLevel {
    match compat {
        ArrowCompat::Newest => CompatLevel::newest(),
        ArrowCompat::Oldest => CompatLevel::oldest(),
    }
}

/// Serialize `df` as an Arrow IPC file.
pub fn frame_to_ipc(df: &DataFrame, compat: ArrowCompat) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut df = df.clone();
    IpcWriter::new(&mut out)
        .with_compat_level(compat_level(compat))
        .finish(&mut df)
        .map_err(export_error)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn ipc_bytes_read_back() {
        let df = df!("name" => ["Alice", "Bob"], "age" => [25i64, 30]).unwrap();
        for compat in [ArrowCompat::Newest, ArrowCompat::Oldest] {
            let bytes = frame_to_ipc(&df, compat).unwrap();
            assert_eq!(&bytes[..6], b"ARROW1");
            let back = IpcReader::new(Cursor::new(bytes)).finish().unwrap();
            assert!(back.equals(&df));
        }
    }
}
