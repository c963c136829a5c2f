//! Payload and IP-options files as opaque byte blobs.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::Result;

/// Most payload bytes that fit a link-mode RIP frame
/// (1500 MTU − 20 IP − 8 UDP − 24 RIP).
pub const MAX_LINK_PAYLOAD: usize = 1448;

/// Most payload bytes that fit a raw-mode RIP datagram
/// (65535 − 20 IP − 8 UDP − 24 RIP).
pub const MAX_RAW_PAYLOAD: usize = 65483;

/// IPv4 options are capped at 40 bytes by the 4-bit IHL.
pub const MAX_IP_OPTIONS: usize = 40;

/// Read a blob file whole, truncating to `cap` bytes with a warning.
pub fn read_blob<P: AsRef<Path>>(path: P, cap: usize) -> Result<Vec<u8>> {
    let mut data = fs::read(path.as_ref())?;
    if data.len() > cap {
        warn!(
            path = %path.as_ref().display(),
            len = data.len(),
            cap,
            "data file larger than the frame allows, truncating"
        );
        data.truncate(cap);
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn reads_whole_file_under_cap() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(&[1, 2, 3, 4])?;
        assert_eq!(read_blob(file.path(), MAX_IP_OPTIONS)?, vec![1, 2, 3, 4]);
        Ok(())
    }

    #[test]
    fn truncates_to_cap() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(&[0xaa; 64])?;
        assert_eq!(read_blob(file.path(), MAX_IP_OPTIONS)?.len(), MAX_IP_OPTIONS);
        Ok(())
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(read_blob("/nonexistent/gungnir-blob", 16).is_err());
    }
}
