//! View composition: one pure render per interaction.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, warn};
use tripdash_viz::ChartSpec;

use crate::birthdays::{resolve_birthdays, Birthday, BirthdayReport};
use crate::config::{ViewConfig, ViewMode};
use crate::destinations::{extract_destinations, popularity};
use crate::ranking::rank_clients;
use crate::retirees::filter_retirees;
use crate::source::Dashboard;
use crate::table::{
    birthday_table, popularity_table, ranking_table, retiree_display_table, retiree_export_table, DataTable,
};

/// Dashboard heading.
pub const DASHBOARD_TITLE: &str = "Dashboard de Insights — Viagens";

/// A labelled number shown above a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: usize,
}

/// State of the birthday panel, independent of the view mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BirthdayPanel {
    /// No birthday table was supplied.
    NotConfigured,
    /// The table has no row for the month.
    NoMonthData { month: String },
    /// The month's row lists nobody born in the month.
    NoBirthdays { month: String },
    Birthdays { month: String, entries: Vec<Birthday> },
    /// The month's list could not be decoded.
    ParseFailed { month: String, message: String },
}

impl BirthdayPanel {
    /// Text shown when there is no list to display.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            BirthdayPanel::NotConfigured => Some("Nenhuma tabela de aniversariantes informada.".to_string()),
            BirthdayPanel::NoMonthData { month } => Some(format!("Nenhum registro encontrado para {month}.")),
            BirthdayPanel::NoBirthdays { month } => Some(format!("Nenhum aniversariante em {month}.")),
            BirthdayPanel::ParseFailed { month, message } => {
                Some(format!("Lista de aniversariantes de {month} inválida: {message}"))
            }
            BirthdayPanel::Birthdays { .. } => None,
        }
    }

    /// Birthdays to list, empty for every other state.
    #[must_use]
    pub fn entries(&self) -> &[Birthday] {
        match self {
            BirthdayPanel::Birthdays { entries, .. } => entries,
            _ => &[],
        }
    }

    /// The birthday list as a table, for display or export.
    #[must_use]
    pub fn table(&self) -> DataTable {
        birthday_table(self.entries())
    }
}

/// Everything one render produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedView {
    pub mode: ViewMode,
    pub title: String,
    /// Table shown for the mode.
    pub table: DataTable,
    pub chart: Option<ChartSpec>,
    pub metric: Option<Metric>,
    /// Informational message for empty results.
    pub notice: Option<String>,
    /// Table written by the export action.
    pub export_table: DataTable,
    pub birthdays: BirthdayPanel,
}

impl RenderedView {
    /// Pretty-printed JSON form of the view.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn bar_chart<'a>(
    title: &str,
    value_label: &str,
    category_label: &str,
    points: impl IntoIterator<Item = (&'a str, usize)>,
) -> ChartSpec {
    ChartSpec::horizontal_bar(
        title,
        value_label,
        category_label,
        points.into_iter().map(|(label, value)| (label, value as f64)),
    )
}

/// Compute the view for `config` as of `today`.
///
/// Derived data is recomputed from the loaded tables on every call.
#[must_use]
pub fn render(dashboard: &Dashboard, config: &ViewConfig, today: NaiveDate) -> RenderedView {
    let records = dashboard.roster.records();
    let title = config.mode.label().to_string();

    let mut view = match config.mode {
        ViewMode::Destinations => {
            let destinations = extract_destinations(dashboard.roster.trips());
            let top = popularity(&destinations, config.search(), config.top_n());
            let table = popularity_table(&top);
            let chart = bar_chart(
                &title,
                "Contagem",
                "Destino",
                top.iter().map(|d| (d.destination.as_str(), d.count)),
            );
            RenderedView {
                mode: config.mode,
                notice: table.is_empty().then(|| "Nenhum destino encontrado.".to_string()),
                title,
                export_table: table.clone(),
                table,
                chart: Some(chart),
                metric: None,
                birthdays: BirthdayPanel::NotConfigured,
            }
        }
        ViewMode::Clients => {
            let ranking = rank_clients(records);
            let table = ranking_table(&ranking);
            let chart = bar_chart(
                &title,
                "Quantidade de Destinos",
                "Cliente",
                ranking
                    .iter()
                    .take(config.top_n())
                    .map(|r| (r.client.as_str(), r.destinations)),
            );
            RenderedView {
                mode: config.mode,
                notice: table.is_empty().then(|| "Nenhum cliente encontrado.".to_string()),
                title,
                export_table: table.clone(),
                table,
                chart: Some(chart),
                metric: None,
                birthdays: BirthdayPanel::NotConfigured,
            }
        }
        ViewMode::Retirees => {
            let columns = &dashboard.settings.columns;
            let retirees = filter_retirees(records, &dashboard.settings.retired_labels);
            let (notice, metric) = if retirees.is_empty() {
                (Some("Nenhum aposentado encontrado.".to_string()), None)
            } else {
                let metric = Metric {
                    label: "Total de Aposentados".to_string(),
                    value: retirees.len(),
                };
                (None, Some(metric))
            };
            RenderedView {
                mode: config.mode,
                title,
                table: retiree_display_table(&retirees, columns),
                chart: None,
                metric,
                notice,
                export_table: retiree_export_table(&retirees, columns),
                birthdays: BirthdayPanel::NotConfigured,
            }
        }
    };

    view.birthdays = birthday_panel(dashboard, today);
    debug!(mode = %config.mode, rows = view.table.len(), "Rendered view");
    view
}

/// Resolve the birthday panel for `today`.
#[must_use]
pub fn birthday_panel(dashboard: &Dashboard, today: NaiveDate) -> BirthdayPanel {
    let Some(months) = &dashboard.months else {
        return BirthdayPanel::NotConfigured;
    };

    match resolve_birthdays(&dashboard.roster, months, today, &dashboard.settings) {
        Ok(BirthdayReport::NoMonthData { month }) => BirthdayPanel::NoMonthData { month },
        Ok(BirthdayReport::Found { month, birthdays }) if birthdays.is_empty() => {
            BirthdayPanel::NoBirthdays { month }
        }
        Ok(BirthdayReport::Found { month, birthdays }) => BirthdayPanel::Birthdays {
            month,
            entries: birthdays,
        },
        Err(e) => {
            let month = dashboard
                .settings
                .month_name(today.month())
                .unwrap_or_default()
                .to_string();
            warn!(%month, error = %e, "Birthday list could not be decoded");
            BirthdayPanel::ParseFailed {
                month,
                message: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::birthdays::{BirthdayList, MonthRow, MonthTable};
    use crate::config::ReportSettings;
    use crate::roster::{ClientRecord, Roster};
    use tripdash_sheet::CellValue;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn dashboard(months: Option<MonthTable>) -> Dashboard {
        Dashboard::new(
            Roster::new(vec![
                ClientRecord::new("Ana", "Aposentada", "111", Some("paris, Paris ,  rome")),
                ClientRecord::new("Bob", "Engenheiro", "222", Some("")),
            ]),
            months,
            ReportSettings::default(),
        )
    }

    #[test]
    fn test_destinations_view() {
        let view = render(&dashboard(None), &ViewConfig::default(), today());
        assert_eq!(view.title, "Destinos mais viajados");
        assert_eq!(view.table.rows[0], vec![CellValue::from("Paris"), CellValue::Int(2)]);
        assert_eq!(view.table, view.export_table);
        let chart = view.chart.unwrap();
        assert_eq!(chart.data.labels, vec!["Paris", "Rome"]);
        assert_eq!(view.notice, None);
        assert_eq!(view.birthdays, BirthdayPanel::NotConfigured);
    }

    #[test]
    fn test_destinations_filter_no_match() {
        let config = ViewConfig::new(ViewMode::Destinations, 10, Some("tokyo".to_string()));
        let view = render(&dashboard(None), &config, today());
        assert!(view.table.is_empty());
        assert_eq!(view.notice.as_deref(), Some("Nenhum destino encontrado."));
    }

    #[test]
    fn test_clients_view_full_table_top_chart() {
        let mut records: Vec<ClientRecord> = (0..8)
            .map(|i| ClientRecord::new(format!("C{i}"), "", "", Some("a")))
            .collect();
        records.push(ClientRecord::new("Ana", "", "", Some("a, b")));
        let d = Dashboard::new(Roster::new(records), None, ReportSettings::default());

        let view = render(&d, &ViewConfig::new(ViewMode::Clients, 5, None), today());
        assert_eq!(view.table.len(), 9);
        assert_eq!(view.table.rows[0][0], CellValue::from("Ana"));
        assert_eq!(view.chart.unwrap().data.labels.len(), 5);
    }

    #[test]
    fn test_retirees_view() {
        let view = render(&dashboard(None), &ViewConfig::new(ViewMode::Retirees, 10, None), today());
        assert!(view.chart.is_none());
        assert_eq!(view.metric.unwrap().value, 1);
        assert_eq!(view.table.headers.len(), 3);
        assert_eq!(view.export_table.headers.len(), 4);

        let empty = Dashboard::new(Roster::default(), None, ReportSettings::default());
        let view = render(&empty, &ViewConfig::new(ViewMode::Retirees, 10, None), today());
        assert!(view.metric.is_none());
        assert_eq!(view.notice.as_deref(), Some("Nenhum aposentado encontrado."));
    }

    #[test]
    fn test_birthday_panel_states() {
        let row = |list: &str| {
            Some(MonthTable::new(vec![MonthRow {
                month: "Março".to_string(),
                list: BirthdayList::Raw(list.to_string()),
            }]))
        };

        let panel = birthday_panel(&dashboard(row("[{'Nome': 'Ana', 'Aniversario': '1950-03-15'}]")), today());
        assert_eq!(panel.entries()[0].phone, "111");
        assert_eq!(panel.message(), None);
        assert_eq!(panel.table().len(), 1);

        let panel = birthday_panel(&dashboard(row("[]")), today());
        assert_eq!(panel.message().unwrap(), "Nenhum aniversariante em Março.");

        let panel = birthday_panel(&dashboard(row("[{")), today());
        assert!(matches!(panel, BirthdayPanel::ParseFailed { .. }));

        let april = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let panel = birthday_panel(&dashboard(row("[]")), april);
        assert_eq!(panel.message().unwrap(), "Nenhum registro encontrado para Abril.");
    }

    #[test]
    fn test_parse_failure_does_not_affect_view() {
        let months = MonthTable::new(vec![MonthRow {
            month: "Março".to_string(),
            list: BirthdayList::Raw("not a list".to_string()),
        }]);
        let view = render(&dashboard(Some(months)), &ViewConfig::default(), today());
        assert_eq!(view.table.len(), 2);
        assert!(matches!(view.birthdays, BirthdayPanel::ParseFailed { .. }));
    }
}
