//! Invoice layout and pagination on top of `tradebill-pdf`.
//!
//! An [`InvoiceDocument`] goes through the totals calculator, the layout
//! engine (driven by a [`PageCursor`] over a [`Geometry`]) and the PDF
//! renderer, and comes out as `<invoice_id>.pdf`.
//!
//! ```no_run
//! use tradebill_invoice::{generate_invoice_pdf, InvoiceConfig, InvoiceDocument};
//!
//! # fn run(doc: InvoiceDocument) -> Result<(), Box<dyn std::error::Error>> {
//! let config = InvoiceConfig::from_json_file("invoice.json")?;
//! let path = generate_invoice_pdf(&doc, "out", &config)?;
//! println!("wrote {}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod cursor;
pub mod error;
pub mod format;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod output;
pub mod render;
pub mod request;
pub mod telemetry;
pub mod totals;

pub use config::{Branding, InvoiceConfig, InvoiceDefaults};
pub use cursor::{PageBreak, PageCursor, Region};
pub use error::{ConfigError, InvoiceError, InvoiceResult};
pub use geometry::{Column, ColumnWidths, Geometry, Reserve};
pub use layout::{lay_out, DrawOp, LaidOutInvoice, LayoutOptions, Page};
pub use model::{Address, BusinessInfo, CustomerInfo, InvoiceDocument, LineItem, PaymentInfo, Totals};
pub use output::{generate_invoice_pdf, render_invoice, RenderedInvoice};
pub use request::{CreateInvoiceRequest, RequestItem};
