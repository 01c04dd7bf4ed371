//! Simulated receipt printer.
//!
//! [`FilePrinter`] "prints" by writing each receipt as a plain-text file
//! named after the current station-local second. When two receipts land in
//! the same second the later one gets a numeric suffix instead of replacing
//! the earlier file.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use time::UtcOffset;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use weigh_types::Receipt;

use crate::error::{Error, Result};
use crate::traits::{PrintJob, PrinterDriver};
use crate::util::{now_in, print_time, receipt_stem};

/// Printer names reported by the simulated driver.
pub const SIMULATED_PRINTERS: [&str; 3] = ["Thermal Printer 1", "Thermal Printer 2", "Default Printer"];

/// A printer that writes receipts into a directory.
#[derive(Debug, Clone)]
pub struct FilePrinter {
    dir: PathBuf,
    offset: UtcOffset,
}

impl FilePrinter {
    /// Create a printer writing into `dir`, naming files in `offset` time.
    ///
    /// The directory is created on first print.
    pub fn new(dir: impl Into<PathBuf>, offset: UtcOffset) -> Self {
        Self {
            dir: dir.into(),
            offset,
        }
    }

    async fn create_receipt_file(&self, stem: &str) -> Result<(PathBuf, fs::File)> {
        let mut attempt = 0u32;
        loop {
            let name = if attempt == 0 {
                format!("{stem}.txt")
            } else {
                format!("{stem}_{attempt}.txt")
            };
            let path = self.dir.join(name);

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("Receipt {} already exists", path.display());
                    attempt += 1;
                }
                Err(e) => return Err(Error::WriteReceipt { path, source: e }),
            }
        }
    }
}

#[async_trait]
impl PrinterDriver for FilePrinter {
    fn printers(&self) -> Vec<String> {
        SIMULATED_PRINTERS.iter().map(|name| name.to_string()).collect()
    }

    async fn is_connected(&self) -> bool {
        true
    }

    async fn print(&self, receipt: &Receipt) -> Result<PrintJob> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Error::CreateDirectory {
                path: self.dir.clone(),
                source: e,
            })?;

        let stem = receipt_stem(now_in(self.offset))?;
        let (path, mut file) = self.create_receipt_file(&stem).await?;

        let content = receipt.to_string();
        let write = async {
            file.write_all(content.as_bytes()).await?;
            file.flush().await
        };
        write.await.map_err(|e| Error::WriteReceipt {
            path: path.clone(),
            source: e,
        })?;

        info!("Receipt printed to {}", path.display());
        Ok(PrintJob { file: path })
    }

    async fn test_print(&self) -> Result<()> {
        let now = print_time(now_in(self.offset))?;
        info!(
            "Test print\n================================\nTEST PRINT\n================================\nDate/Time: {}\n================================",
            now
        );
        Ok(())
    }
}
