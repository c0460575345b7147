//! `guardpost-invoicing` — client billing records.

pub mod invoice;

pub use invoice::{Invoice, InvoiceId, InvoiceRepository, InvoiceStatus, NewInvoice};
