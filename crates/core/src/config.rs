//! Dashboard configuration.
//!
//! Settings come from defaults, an optional YAML file and command-line
//! overrides applied by the caller.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{DashResult, DashboardError};

/// Smallest accepted top-N value.
pub const MIN_TOP_N: usize = 5;
/// Largest accepted top-N value.
pub const MAX_TOP_N: usize = 50;
/// Default top-N value.
pub const DEFAULT_TOP_N: usize = 10;

/// Default export file name.
pub const DEFAULT_EXPORT_FILE: &str = "dados_exportados.xlsx";

/// Placeholder used when a birthday name has no roster match.
pub const NOT_FOUND: &str = "Não encontrado";

/// Month names used to locate the current month's row.
pub const PORTUGUESE_MONTHS: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Which derived table the dashboard shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Most visited destinations.
    #[default]
    Destinations,
    /// Clients ranked by number of destinations.
    Clients,
    /// Retired clients.
    Retirees,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Destinations, ViewMode::Clients, ViewMode::Retirees];

    /// Title shown for the mode.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Destinations => "Destinos mais viajados",
            ViewMode::Clients => "Clientes com mais destinos",
            ViewMode::Retirees => "Aposentados",
        }
    }

    /// Short name used on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ViewMode::Destinations => "destinations",
            ViewMode::Clients => "clients",
            ViewMode::Retirees => "retirees",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewMode {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ViewMode::ALL
            .into_iter()
            .find(|mode| {
                mode.name().eq_ignore_ascii_case(wanted) || mode.label().to_lowercase() == wanted.to_lowercase()
            })
            .ok_or_else(|| {
                DashboardError::Config(format!(
                    "Unknown view mode '{wanted}' (expected destinations, clients or retirees)"
                ))
            })
    }
}

/// Source column headers and birthday entry keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub name: String,
    pub profession: String,
    pub phone: String,
    pub trips: String,
    pub month: String,
    pub birthday_list: String,
    pub entry_name: String,
    pub entry_birthday: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            name: "Nome".to_string(),
            profession: "Profissão".to_string(),
            phone: "Celular".to_string(),
            trips: "Viagens".to_string(),
            month: "Mês".to_string(),
            birthday_list: "lista_aniversariantes".to_string(),
            entry_name: "Nome".to_string(),
            entry_birthday: "Aniversario".to_string(),
        }
    }
}

/// The full configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub roster: Option<PathBuf>,
    pub birthdays: Option<PathBuf>,
    pub roster_sheet: Option<String>,
    pub birthdays_sheet: Option<String>,
    pub top_n: usize,
    pub search: Option<String>,
    pub mode: ViewMode,
    pub export_file: PathBuf,
    pub retired_labels: Vec<String>,
    pub not_found: String,
    pub month_names: Vec<String>,
    pub columns: ColumnNames,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            roster: None,
            birthdays: None,
            roster_sheet: None,
            birthdays_sheet: None,
            top_n: DEFAULT_TOP_N,
            search: None,
            mode: ViewMode::default(),
            export_file: PathBuf::from(DEFAULT_EXPORT_FILE),
            retired_labels: vec!["Aposentado".to_string(), "Aposentada".to_string()],
            not_found: NOT_FOUND.to_string(),
            month_names: PORTUGUESE_MONTHS.iter().map(|m| (*m).to_string()).collect(),
            columns: ColumnNames::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a YAML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid YAML or invalid values.
    pub fn from_yaml_str(yaml: &str) -> DashResult<Self> {
        let config: DashboardConfig = if yaml.trim().is_empty() {
            DashboardConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_yaml_file(path: &Path) -> DashResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            DashboardError::Config(format!("Cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Check values that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] describing the first invalid value.
    pub fn validate(&self) -> DashResult<()> {
        if self.month_names.len() != 12 {
            return Err(DashboardError::Config(format!(
                "month_names must list 12 months, found {}",
                self.month_names.len()
            )));
        }
        if let Some(blank) = self.month_names.iter().position(|m| m.trim().is_empty()) {
            return Err(DashboardError::Config(format!(
                "month_names entry {} is blank",
                blank + 1
            )));
        }
        if self.export_file.as_os_str().is_empty() {
            return Err(DashboardError::Config("export_file is empty".to_string()));
        }
        Ok(())
    }

    /// The view settings described by this config.
    #[must_use]
    pub fn view(&self) -> ViewConfig {
        ViewConfig::new(self.mode, self.top_n, self.search.clone())
    }

    /// The reporting settings described by this config.
    #[must_use]
    pub fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            retired_labels: self.retired_labels.clone(),
            month_names: self.month_names.clone(),
            not_found: self.not_found.clone(),
            columns: self.columns.clone(),
        }
    }
}

/// Per-render view state: mode, limit, filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewConfig {
    pub mode: ViewMode,
    top_n: usize,
    pub search: Option<String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::new(ViewMode::default(), DEFAULT_TOP_N, None)
    }
}

impl ViewConfig {
    /// Build a view config, clamping `top_n` into range.
    #[must_use]
    pub fn new(mode: ViewMode, top_n: usize, search: Option<String>) -> Self {
        let mut view = Self {
            mode,
            top_n: DEFAULT_TOP_N,
            search: None,
        };
        view.set_top_n(top_n);
        view.set_search(search);
        view
    }

    #[must_use]
    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Set the limit. Values outside `MIN_TOP_N..=MAX_TOP_N` are clamped.
    pub fn set_top_n(&mut self, top_n: usize) {
        let clamped = top_n.clamp(MIN_TOP_N, MAX_TOP_N);
        if clamped != top_n {
            warn!(requested = top_n, used = clamped, "top-N out of range, clamping");
        }
        self.top_n = clamped;
    }

    /// Set the destination filter; blank text clears it.
    pub fn set_search(&mut self, search: Option<String>) {
        self.search = search.filter(|s| !s.trim().is_empty());
    }

    /// The active filter, if any.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }
}

/// Settings the derived views depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    pub retired_labels: Vec<String>,
    pub month_names: Vec<String>,
    pub not_found: String,
    pub columns: ColumnNames,
}

impl Default for ReportSettings {
    fn default() -> Self {
        DashboardConfig::default().report_settings()
    }
}

impl ReportSettings {
    /// Localized name of a month, 1-based.
    #[must_use]
    pub fn month_name(&self, month: u32) -> Option<&str> {
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        self.month_names.get(index).map(String::as_str)
    }
}
