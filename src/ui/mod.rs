/// Presentation layer: sidebar filters, dashboard layout, charts, tables.
pub mod panels;
pub mod plot;
pub mod tables;
