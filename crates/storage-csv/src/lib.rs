//! Cotizaciones CSV storage.
//!
//! One file per quote type (`uva.csv`, `dolar_mayorista.csv`, `dolar_mep.csv`)
//! with a `fecha,valor` header, the layout of the legacy data directory.

mod store;

pub use store::CsvSeriesStore;
