//! Loading and caching the input spreadsheets.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;
use tripdash_sheet::{CsvOptions, Sheet, SheetError, XlsxReadOptions};

use crate::birthdays::MonthTable;
use crate::config::{DashboardConfig, ReportSettings};
use crate::error::{DashResult, DashboardError, InputKind};
use crate::roster::Roster;

/// Reads a sheet from a path.
pub trait SheetLoader {
    /// Load `sheet` (or the first sheet) from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    fn load(&self, path: &Path, sheet: Option<&str>) -> tripdash_sheet::Result<Sheet>;
}

impl<F> SheetLoader for F
where
    F: Fn(&Path, Option<&str>) -> tripdash_sheet::Result<Sheet>,
{
    fn load(&self, path: &Path, sheet: Option<&str>) -> tripdash_sheet::Result<Sheet> {
        self(path, sheet)
    }
}

/// Loads XLSX and CSV files from disk, choosing by extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl SheetLoader for FileLoader {
    fn load(&self, path: &Path, sheet: Option<&str>) -> tripdash_sheet::Result<Sheet> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "xlsx" | "xlsm" => {
                let options = XlsxReadOptions::default()
                    .with_headers(true)
                    .with_sheet(sheet.map(str::to_string));
                Sheet::from_xlsx_with_options(path, &options)
            }
            "csv" => Sheet::from_csv_with_options(path, &CsvOptions::default().with_headers(true)),
            "tsv" => Sheet::from_csv_with_options(path, &CsvOptions::tsv().with_headers(true)),
            _ => Err(SheetError::UnsupportedFormat(format!(
                "{} (expected .xlsx, .xlsm, .csv or .tsv)",
                path.display()
            ))),
        }
    }
}

type CacheKey = (PathBuf, Option<String>);

/// Caller-owned cache of loaded sheets, keyed by path and sheet name.
///
/// A different path always loads afresh; the same path is read once until
/// invalidated.
pub struct SheetCache<L = FileLoader> {
    loader: L,
    sheets: HashMap<CacheKey, Sheet>,
}

impl Default for SheetCache<FileLoader> {
    fn default() -> Self {
        Self::new(FileLoader)
    }
}

impl<L: SheetLoader> SheetCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            sheets: HashMap::new(),
        }
    }

    /// Return the cached sheet, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Load`] if the loader fails; nothing is
    /// cached in that case.
    pub fn get_or_load(&mut self, path: &Path, sheet: Option<&str>) -> DashResult<&Sheet> {
        let key = (path.to_path_buf(), sheet.map(str::to_string));
        match self.sheets.entry(key) {
            Entry::Occupied(entry) => {
                debug!(path = %path.display(), "Sheet cache hit");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                debug!(path = %path.display(), "Loading sheet");
                let loaded = self.loader.load(path, sheet).map_err(|source| DashboardError::Load {
                    path: path.to_path_buf(),
                    source,
                })?;
                Ok(entry.insert(loaded))
            }
        }
    }

    /// Drop every cached sheet loaded from `path`.
    pub fn invalidate(&mut self, path: &Path) {
        self.sheets.retain(|(p, _), _| p != path);
    }

    pub fn clear(&mut self) {
        self.sheets.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// The loaded inputs of one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    pub roster: Roster,
    /// `None` when no birthday table is configured.
    pub months: Option<MonthTable>,
    pub settings: ReportSettings,
}

impl Dashboard {
    #[must_use]
    pub fn new(roster: Roster, months: Option<MonthTable>, settings: ReportSettings) -> Self {
        Self {
            roster,
            months,
            settings,
        }
    }

    /// Load the roster and optional birthday table named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::MissingInput`] when no roster path is set,
    /// or a load error for either file.
    pub fn load<L: SheetLoader>(cache: &mut SheetCache<L>, config: &DashboardConfig) -> DashResult<Self> {
        let settings = config.report_settings();

        let roster_path = config
            .roster
            .as_deref()
            .ok_or(DashboardError::MissingInput(InputKind::Roster))?;
        let sheet = cache.get_or_load(roster_path, config.roster_sheet.as_deref())?;
        let roster = Roster::from_sheet(sheet, &settings.columns)?;

        let months = match config.birthdays.as_deref() {
            Some(path) => {
                let sheet = cache.get_or_load(path, config.birthdays_sheet.as_deref())?;
                Some(MonthTable::from_sheet(sheet, &settings.columns)?)
            }
            None => None,
        };

        Ok(Self::new(roster, months, settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Write;
    use tripdash_sheet::CellValue;

    fn roster_sheet() -> Sheet {
        Sheet::from_table(
            "clientes",
            &["Nome", "Profissão", "Celular", "Viagens"],
            vec![vec!["Ana".into(), "Aposentada".into(), "111".into(), "paris".into()]],
        )
        .unwrap()
    }

    #[test]
    fn test_cache_loads_once_per_path() {
        let calls = Cell::new(0);
        let loader = |_: &Path, _: Option<&str>| -> tripdash_sheet::Result<Sheet> {
            calls.set(calls.get() + 1);
            Ok(roster_sheet())
        };
        let mut cache = SheetCache::new(loader);

        cache.get_or_load(Path::new("a.xlsx"), None).unwrap();
        cache.get_or_load(Path::new("a.xlsx"), None).unwrap();
        assert_eq!(calls.get(), 1);

        cache.get_or_load(Path::new("b.xlsx"), None).unwrap();
        assert_eq!(calls.get(), 2);
        assert_eq!(cache.len(), 2);

        cache.invalidate(Path::new("a.xlsx"));
        cache.get_or_load(Path::new("a.xlsx"), None).unwrap();
        assert_eq!(calls.get(), 3);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_does_not_keep_failures() {
        let mut cache = SheetCache::new(|path: &Path, _: Option<&str>| -> tripdash_sheet::Result<Sheet> {
            Err(SheetError::UnsupportedFormat(path.display().to_string()))
        });
        let err = cache.get_or_load(Path::new("x.doc"), None).unwrap_err();
        assert!(matches!(err, DashboardError::Load { .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_file_loader_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Nome,Profissão,Celular,Viagens").unwrap();
        writeln!(file, "Ana,Aposentada,0119,\"paris, rome\"").unwrap();
        writeln!(file, "Caio,Aposentado,+5511999990000,lisboa").unwrap();
        file.flush().unwrap();

        let sheet = FileLoader.load(file.path(), None).unwrap();
        let roster = Roster::from_sheet(&sheet, &ReportSettings::default().columns).unwrap();
        assert_eq!(roster.records()[0].phone, "0119");
        assert_eq!(roster.records()[0].trips.as_deref(), Some("paris, rome"));
        assert_eq!(roster.records()[1].phone, "+5511999990000");
        assert_eq!(roster.phone_for("Caio"), Some("+5511999990000"));
    }

    #[test]
    fn test_file_loader_unsupported() {
        let err = FileLoader.load(Path::new("clientes.ods"), None).unwrap_err();
        assert!(matches!(err, SheetError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_dashboard_requires_roster() {
        let mut cache = SheetCache::new(|_: &Path, _: Option<&str>| -> tripdash_sheet::Result<Sheet> {
            Ok(roster_sheet())
        });
        let err = Dashboard::load(&mut cache, &DashboardConfig::default()).unwrap_err();
        assert!(matches!(err, DashboardError::MissingInput(InputKind::Roster)));
    }

    #[test]
    fn test_dashboard_load() {
        let mut cache = SheetCache::new(|path: &Path, _: Option<&str>| -> tripdash_sheet::Result<Sheet> {
            if path.ends_with("infos.xlsx") {
                Sheet::from_table(
                    "infos",
                    &["Mês", "lista_aniversariantes"],
                    vec![vec!["Março".into(), CellValue::Null]],
                )
            } else {
                Ok(roster_sheet())
            }
        });
        let config = DashboardConfig {
            roster: Some("clientes.xlsx".into()),
            birthdays: Some("infos.xlsx".into()),
            ..DashboardConfig::default()
        };

        let dashboard = Dashboard::load(&mut cache, &config).unwrap();
        assert_eq!(dashboard.roster.len(), 1);
        assert_eq!(dashboard.months.unwrap().rows().len(), 1);
        assert_eq!(cache.len(), 2);
    }
}
