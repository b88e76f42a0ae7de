// Widget display models - render-ready state for charts, tables and KPIs

/// Quantities below this render a Critical badge in the stock table.
/// The backend's alert feed itself only includes items under 10 units;
/// everything at or above this line shows as Low Stock.
pub const CRITICAL_STOCK_UNITS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Doughnut,
}

/// How a numeric cell or chart value is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    Text,
    Count,
    Currency,
    StockBadge,
}

impl ValueFormat {
    pub fn render(&self, value: f64) -> String {
        match self {
            ValueFormat::Text => value.to_string(),
            ValueFormat::Count => format_count(value),
            ValueFormat::Currency => format_currency(value),
            ValueFormat::StockBadge => stock_badge(value).to_string(),
        }
    }
}

/// Currency with a leading symbol and exactly two decimals.
pub fn format_currency(value: f64) -> String {
    format!("${:.2}", value)
}

/// Whole-number display for counts.
pub fn format_count(value: f64) -> String {
    format!("{}", value.round() as i64)
}

/// Share of a total to one decimal. A zero total displays 0.0% instead
/// of NaN.
pub fn format_percentage(part: f64, total: f64) -> String {
    if total == 0.0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", (part / total) * 100.0)
}

/// Severity badge for a stock-alert row.
pub fn stock_badge(quantity: f64) -> &'static str {
    if quantity < CRITICAL_STOCK_UNITS {
        "Critical"
    } else {
        "Low Stock"
    }
}

/// A chart's current data: labels and values in input order. The actual
/// drawing is the charting library's concern; this holds exactly what it
/// would be handed.
#[derive(Debug, Clone)]
pub struct ChartWidget {
    pub id: String,
    pub kind: ChartKind,
    pub value_format: ValueFormat,
    labels: Vec<String>,
    values: Vec<f64>,
}

impl ChartWidget {
    pub fn new(id: String, kind: ChartKind, value_format: ValueFormat) -> Self {
        Self {
            id,
            kind,
            value_format,
            labels: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn update(&mut self, labels: Vec<String>, values: Vec<f64>) {
        self.labels = labels;
        self.values = values;
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Per-segment share of the chart total, as shown in segment
    /// tooltips.
    pub fn shares(&self) -> Vec<String> {
        let total: f64 = self.values.iter().sum();
        self.values
            .iter()
            .map(|v| format_percentage(*v, total))
            .collect()
    }

    /// Tooltip text for one segment, e.g. "$120.00 (80.0%)".
    pub fn tooltip(&self, index: usize) -> Option<String> {
        let value = *self.values.get(index)?;
        let total: f64 = self.values.iter().sum();
        Some(format!(
            "{} ({})",
            self.value_format.render(value),
            format_percentage(value, total)
        ))
    }
}

/// A table's current rows, already formatted cell by cell.
#[derive(Debug, Clone)]
pub struct TableWidget {
    pub id: String,
    pub headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableWidget {
    pub fn new(id: String, headers: Vec<String>) -> Self {
        Self {
            id,
            headers,
            rows: Vec::new(),
        }
    }

    pub fn update(&mut self, rows: Vec<Vec<String>>) {
        self.rows = rows;
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

/// A KPI panel's formatted figures plus the "As of" caption.
#[derive(Debug, Clone)]
pub struct KpiPanel {
    pub id: String,
    entries: Vec<KpiEntry>,
    caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiEntry {
    pub id: String,
    pub label: String,
    pub text: String,
}

impl KpiPanel {
    pub fn new(id: String) -> Self {
        Self {
            id,
            entries: Vec::new(),
            caption: None,
        }
    }

    pub fn update(&mut self, entries: Vec<KpiEntry>, caption: Option<String>) {
        self.entries = entries;
        self.caption = caption;
    }

    pub fn entries(&self) -> &[KpiEntry] {
        &self.entries
    }

    pub fn entry_text(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.text.as_str())
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.5), "$1234.50");
        assert_eq!(format_currency(0.0), "$0.00");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(8.0, 10.0), "80.0%");
        assert_eq!(format_percentage(1.0, 3.0), "33.3%");
    }

    #[test]
    fn test_zero_total_is_not_nan() {
        assert_eq!(format_percentage(0.0, 0.0), "0.0%");
        assert_eq!(format_percentage(5.0, 0.0), "0.0%");
    }

    #[test]
    fn test_stock_badge_thresholds() {
        assert_eq!(stock_badge(3.0), "Critical");
        assert_eq!(stock_badge(4.0), "Critical");
        assert_eq!(stock_badge(5.0), "Low Stock");
        assert_eq!(stock_badge(8.0), "Low Stock");
    }

    #[test]
    fn test_chart_shares_preserve_order() {
        let mut chart = ChartWidget::new(
            "status".to_string(),
            ChartKind::Doughnut,
            ValueFormat::Count,
        );
        chart.update(
            vec!["Completed".to_string(), "Pending".to_string()],
            vec![8.0, 2.0],
        );
        assert_eq!(chart.labels(), ["Completed", "Pending"]);
        assert_eq!(chart.shares(), ["80.0%", "20.0%"]);
        assert_eq!(chart.tooltip(0).unwrap(), "8 (80.0%)");
    }
}
