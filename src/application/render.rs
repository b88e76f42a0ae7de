// Render distributor - fans one snapshot out to the page's widgets
use crate::domain::snapshot::{DashboardSnapshot, Record};
use crate::domain::widget::{ChartKind, ChartWidget, KpiEntry, KpiPanel, TableWidget, ValueFormat};
use crate::infrastructure::config::PageConfig;

/// Outcome of offering a fetched snapshot to the distributor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// Superseded by a later-initiated fetch, or the page was torn down.
    Stale,
}

#[derive(Debug, Clone)]
struct ColumnSpec {
    header: String,
    field: String,
    format: ValueFormat,
}

#[derive(Debug, Clone)]
struct KpiField {
    id: String,
    label: String,
    field: String,
    format: ValueFormat,
}

#[derive(Debug)]
enum BoundWidget {
    Chart {
        widget: ChartWidget,
        label_field: String,
        value_field: String,
    },
    Table {
        widget: TableWidget,
        columns: Vec<ColumnSpec>,
    },
    Kpi {
        widget: KpiPanel,
        fields: Vec<KpiField>,
    },
}

/// Maps one metric group to the widget that displays it. Bindings with
/// a `source` draw their rows from an auxiliary endpoint rather than
/// the main snapshot.
#[derive(Debug)]
pub struct WidgetBinding {
    group: String,
    source: Option<String>,
    widget: BoundWidget,
}

/// Owns the page's widgets and applies snapshots to them atomically.
/// Single writer: callers hold this behind one lock, and nothing else
/// mutates widget state. The sequence guard implements last-fetch-wins
/// by initiation order.
#[derive(Debug)]
pub struct RenderDistributor {
    page_id: String,
    bindings: Vec<WidgetBinding>,
    applied_seq: u64,
    notice: Option<String>,
    closed: bool,
}

impl RenderDistributor {
    pub fn build(page: &PageConfig) -> Self {
        let mut bindings = Vec::new();

        for chart in &page.charts {
            bindings.push(WidgetBinding {
                group: chart.group.clone(),
                source: None,
                widget: BoundWidget::Chart {
                    widget: ChartWidget::new(
                        chart.id.clone(),
                        parse_chart_kind(&chart.kind),
                        parse_format(chart.value_format.as_deref(), ValueFormat::Count),
                    ),
                    label_field: chart.label_field.clone(),
                    value_field: chart.value_field.clone(),
                },
            });
        }

        for table in &page.tables {
            let columns: Vec<ColumnSpec> = table
                .columns
                .iter()
                .map(|c| ColumnSpec {
                    header: c.header.clone(),
                    field: c.field.clone(),
                    format: parse_format(c.format.as_deref(), ValueFormat::Text),
                })
                .collect();
            let headers = columns.iter().map(|c| c.header.clone()).collect();
            bindings.push(WidgetBinding {
                group: table.group.clone(),
                source: table.source.clone(),
                widget: BoundWidget::Table {
                    widget: TableWidget::new(table.id.clone(), headers),
                    columns,
                },
            });
        }

        for kpi in &page.kpis {
            let fields = kpi
                .entries
                .iter()
                .map(|e| KpiField {
                    id: e.id.clone(),
                    label: e.label.clone(),
                    field: e.field.clone(),
                    format: parse_format(e.format.as_deref(), ValueFormat::Count),
                })
                .collect();
            bindings.push(WidgetBinding {
                group: kpi.group.clone(),
                source: None,
                widget: BoundWidget::Kpi {
                    widget: KpiPanel::new(kpi.id.clone()),
                    fields,
                },
            });
        }

        Self {
            page_id: page.id.clone(),
            bindings,
            applied_seq: 0,
            notice: None,
            closed: false,
        }
    }

    /// Endpoint paths and group names of the page's auxiliary feeds.
    pub fn auxiliary_feeds(&self) -> Vec<(String, String)> {
        self.bindings
            .iter()
            .filter_map(|b| b.source.as_ref().map(|s| (s.clone(), b.group.clone())))
            .collect()
    }

    /// Apply a snapshot unless it is stale. Every binding is updated in
    /// one synchronous pass, so the viewer never observes a persisted
    /// partial state.
    pub fn apply_if_fresh(&mut self, seq: u64, snapshot: &DashboardSnapshot) -> ApplyOutcome {
        if self.closed || seq <= self.applied_seq {
            tracing::debug!(
                page = %self.page_id,
                seq,
                applied = self.applied_seq,
                "discarding stale snapshot"
            );
            return ApplyOutcome::Stale;
        }
        self.applied_seq = seq;

        for binding in &mut self.bindings {
            // An auxiliary feed that failed this cycle is absent from the
            // snapshot; keep its last-known-good rows. A missing main
            // group means "no data" and renders empty.
            if binding.source.is_some() && !snapshot.has_group(&binding.group) {
                continue;
            }
            let records = snapshot.group(&binding.group);

            match &mut binding.widget {
                BoundWidget::Chart {
                    widget,
                    label_field,
                    value_field,
                } => {
                    let labels = records.iter().map(|r| r.label(label_field)).collect();
                    let values = records.iter().map(|r| r.value(value_field)).collect();
                    widget.update(labels, values);
                }
                BoundWidget::Table { widget, columns } => {
                    let rows = records
                        .iter()
                        .map(|r| columns.iter().map(|c| render_cell(r, c)).collect())
                        .collect();
                    widget.update(rows);
                }
                BoundWidget::Kpi { widget, fields } => {
                    let record = records.first();
                    let entries = fields
                        .iter()
                        .map(|f| KpiEntry {
                            id: f.id.clone(),
                            label: f.label.clone(),
                            text: match record {
                                Some(r) => render_cell(r, &ColumnSpec {
                                    header: f.label.clone(),
                                    field: f.field.clone(),
                                    format: f.format,
                                }),
                                None => f.format.render(0.0),
                            },
                        })
                        .collect();
                    let caption = snapshot.current_date().map(|d| format!("As of {}", d));
                    widget.update(entries, caption);
                }
            }
        }

        self.notice = None;
        ApplyOutcome::Applied
    }

    /// Surface a fetch failure as a non-blocking notice. Widgets keep
    /// their last-known-good data.
    pub fn report_error(&mut self, message: String) {
        if self.closed {
            return;
        }
        self.notice = Some(message);
    }

    /// Teardown on navigation: late responses are discarded from here on.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn applied_seq(&self) -> u64 {
        self.applied_seq
    }

    pub fn chart(&self, id: &str) -> Option<&ChartWidget> {
        self.bindings.iter().find_map(|b| match &b.widget {
            BoundWidget::Chart { widget, .. } if widget.id == id => Some(widget),
            _ => None,
        })
    }

    pub fn table(&self, id: &str) -> Option<&TableWidget> {
        self.bindings.iter().find_map(|b| match &b.widget {
            BoundWidget::Table { widget, .. } if widget.id == id => Some(widget),
            _ => None,
        })
    }

    pub fn kpi(&self, id: &str) -> Option<&KpiPanel> {
        self.bindings.iter().find_map(|b| match &b.widget {
            BoundWidget::Kpi { widget, .. } if widget.id == id => Some(widget),
            _ => None,
        })
    }
}

fn render_cell(record: &Record, column: &ColumnSpec) -> String {
    match column.format {
        ValueFormat::Text => record.label(&column.field),
        format => format.render(record.value(&column.field)),
    }
}

fn parse_chart_kind(kind: &str) -> ChartKind {
    match kind {
        "line" => ChartKind::Line,
        "bar" => ChartKind::Bar,
        "pie" => ChartKind::Pie,
        "doughnut" => ChartKind::Doughnut,
        _ => ChartKind::Line,
    }
}

fn parse_format(format: Option<&str>, default: ValueFormat) -> ValueFormat {
    match format {
        Some("text") => ValueFormat::Text,
        Some("count") => ValueFormat::Count,
        Some("currency") => ValueFormat::Currency,
        Some("stock_badge") => ValueFormat::StockBadge,
        _ => default,
    }
}
