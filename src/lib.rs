// src/lib.rs

//! Blocking client for the VirusTotal v2 file report API.
//!
//! ```no_run
//! use vt_report::Client;
//!
//! let client = Client::with_default_url("my-api-key");
//! let report = client.get_report("44d88612fea8a8f36de82e1278abb02f")?;
//! for (engine, scan) in report.detections() {
//!     println!("{engine}: {}", scan.result);
//! }
//! # Ok::<(), vt_report::ClientError>(())
//! ```

pub mod core;
pub mod logging;

pub use crate::core::client::{API_KEY_ENV, Client, DEFAULT_URL};
pub use crate::core::error::{ClientError, ErrorKind};
pub use crate::core::models::{Report, ReportStatus, Scan};
pub use crate::core::transport::{HttpResponse, HttpTransport, Transport, TransportError};
