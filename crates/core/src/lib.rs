//! # tripdash-core
//!
//! Reporting over a client roster spreadsheet.
//!
//! This crate provides:
//! - Destination extraction and popularity counts
//! - Client ranking by number of destinations
//! - Retiree selection
//! - Monthly birthday lists joined against the roster
//! - XLSX export of any derived table
//! - A sheet cache and the `render` entry point used by the CLI
//!
//! ```
//! use chrono::NaiveDate;
//! use tripdash_core::{render, ClientRecord, Dashboard, ReportSettings, Roster, ViewConfig};
//!
//! let roster = Roster::new(vec![ClientRecord::new("Ana", "Aposentada", "111", Some("paris, rome"))]);
//! let dashboard = Dashboard::new(roster, None, ReportSettings::default());
//! let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//!
//! let view = render(&dashboard, &ViewConfig::default(), today);
//! assert_eq!(view.table.len(), 2);
//! ```

pub mod birthdays;
pub mod calendar;
/// Configuration file and view settings.
pub mod config;
pub mod destinations;
/// Error types and result aliases.
pub mod error;
pub mod export;
pub mod ranking;
pub mod retirees;
pub mod roster;
pub mod source;
pub mod table;
pub mod view;

pub use birthdays::{
    resolve_birthdays, Birthday, BirthdayEntry, BirthdayList, BirthdayReport, MonthRow, MonthTable, RawBirthday,
};
pub use config::{ColumnNames, DashboardConfig, ReportSettings, ViewConfig, ViewMode};
pub use destinations::{count_destinations, extract_destinations, normalize_destination, popularity, DestinationCount};
pub use error::{BirthdayError, DashResult, DashboardError, InputKind};
pub use export::{export_xlsx, write_export};
pub use ranking::{count_trips, rank_clients, ClientRanking};
pub use retirees::filter_retirees;
pub use roster::{ClientRecord, Roster};
pub use source::{Dashboard, FileLoader, SheetCache, SheetLoader};
pub use table::DataTable;
pub use view::{birthday_panel, render, BirthdayPanel, Metric, RenderedView, DASHBOARD_TITLE};
