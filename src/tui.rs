use std::collections::VecDeque;
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap,
};

use crate::aggregate::{BUBBLE_SCALE, year_counts};
use crate::app::{App, ProgressEvent, ProgressSink, RefreshResult};
use crate::charts::{
    BarModel, BubbleModel, ChartSlot, LineModel, RadarModel, bar_model, bubble_model, line_model,
    radar_model,
};
use crate::domain::{Collection, SeriesBatch};
use crate::error::DashError;
use crate::nbia::NbiaClient;
use crate::selection::SelectionState;

const LOGS_MAX: usize = 100;
const TICK: Duration = Duration::from_millis(120);

struct LogSink {
    logs: Arc<Mutex<VecDeque<String>>>,
}

impl ProgressSink for LogSink {
    fn event(&self, event: ProgressEvent) {
        if let Ok(mut logs) = self.logs.lock() {
            let stamp = chrono::Local::now().format("%H:%M:%S");
            let line = match event.elapsed {
                Some(elapsed) => {
                    format!("[{stamp}] {} ({} ms)", event.message, elapsed.as_millis())
                }
                None => format!("[{stamp}] {}", event.message),
            };
            push_log(&mut logs, line);
        }
    }
}

fn term_err(err: io::Error) -> DashError {
    DashError::Terminal(err.to_string())
}

fn push_log(buffer: &mut VecDeque<String>, item: String) {
    buffer.push_back(item);
    while buffer.len() > LOGS_MAX {
        buffer.pop_front();
    }
}

/// Interactive dashboard loop. Fetch cycles run on worker threads; results
/// come back over a channel tagged with the generation that issued them, so
/// a response outrun by a newer selection is discarded instead of
/// overwriting fresher charts.
pub struct Dashboard<C: NbiaClient + Clone + Send + 'static> {
    app: App<C>,
    catalog: Vec<Collection>,
    selection: SelectionState,
    cursor: usize,
    modality_options: Vec<String>,
    filter_index: Option<usize>,
    batch: Option<SeriesBatch>,
    bar: ChartSlot<BarModel>,
    line: ChartSlot<LineModel>,
    radar: ChartSlot<RadarModel>,
    bubble: ChartSlot<BubbleModel>,
    error: Option<String>,
    logs: Arc<Mutex<VecDeque<String>>>,
    generation: u64,
    in_flight: bool,
    results_tx: Sender<(u64, Result<RefreshResult, DashError>)>,
    results_rx: Receiver<(u64, Result<RefreshResult, DashError>)>,
}

impl<C: NbiaClient + Clone + Send + 'static> Dashboard<C> {
    pub fn new(app: App<C>) -> Self {
        let (results_tx, results_rx) = mpsc::channel();
        Self {
            app,
            catalog: Vec::new(),
            selection: SelectionState::default(),
            cursor: 0,
            modality_options: Vec::new(),
            filter_index: None,
            batch: None,
            bar: ChartSlot::default(),
            line: ChartSlot::default(),
            radar: ChartSlot::default(),
            bubble: ChartSlot::default(),
            error: None,
            logs: Arc::new(Mutex::new(VecDeque::new())),
            generation: 0,
            in_flight: false,
            results_tx,
            results_rx,
        }
    }

    pub fn run(&mut self) -> Result<(), DashError> {
        let sink = LogSink {
            logs: self.logs.clone(),
        };
        match self.app.load_catalog(&sink) {
            Ok(catalog) => self.catalog = catalog,
            Err(err) => {
                tracing::warn!(error = %err, "catalog load failed");
                self.error = Some(err.user_message());
            }
        }

        let mut stdout = io::stdout();
        enable_raw_mode().map_err(term_err)?;
        stdout.execute(EnterAlternateScreen).map_err(term_err)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(term_err)?;
        terminal.clear().map_err(term_err)?;

        let mut tick = 0usize;
        loop {
            self.drain_results();

            terminal
                .draw(|frame| draw_ui(frame, self, tick))
                .map_err(term_err)?;

            if event::poll(TICK).map_err(term_err)? {
                if let Event::Key(key) = event::read().map_err(term_err)? {
                    if self.handle_key(key) {
                        break;
                    }
                }
            }
            tick = tick.wrapping_add(1);
        }

        disable_raw_mode().map_err(term_err)?;
        let mut stdout = io::stdout();
        stdout.execute(LeaveAlternateScreen).map_err(term_err)?;
        Ok(())
    }

    fn drain_results(&mut self) {
        while let Ok((generation, result)) = self.results_rx.try_recv() {
            if generation < self.generation {
                if let Ok(mut logs) = self.logs.lock() {
                    push_log(
                        &mut logs,
                        format!("discarded stale result (generation {generation})"),
                    );
                }
                continue;
            }
            self.in_flight = false;
            match result {
                Ok(refresh) => self.install(refresh),
                Err(err) => {
                    tracing::warn!(error = %err, "refresh cycle failed");
                    self.error = Some(err.user_message());
                    if let Ok(mut logs) = self.logs.lock() {
                        push_log(&mut logs, format!("error: {err}"));
                    }
                }
            }
        }
    }

    fn install(&mut self, refresh: RefreshResult) {
        self.error = None;
        let RefreshResult { batch, data } = refresh;
        self.modality_options = data.modality.modalities.clone();

        let labels = self.app.labels();
        self.bar.replace(bar_model(&data.modality, labels));
        self.line.replace(line_model(&data.years));
        self.radar.replace(radar_model(&data.radar, labels));
        self.bubble.replace(bubble_model(&data.bubble, labels));
        self.batch = Some(batch);

        // A shrinking fetch can leave the active filter pointing past the
        // new options; drop it and redo the year aggregation unfiltered.
        if let Some(index) = self.filter_index {
            if index >= self.modality_options.len() {
                self.filter_index = None;
                self.selection.set_modality_filter(None);
                self.apply_filter();
            }
        }
    }

    /// Selection changed: start a new fetch cycle. In-flight requests are
    /// not cancelled; their results arrive with an older generation and are
    /// dropped.
    fn trigger_refresh(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        self.in_flight = true;

        let app = self.app.clone();
        let collections = self.selection.effective_collections();
        let filter = self.selection.modality_filter().map(str::to_string);
        let tx = self.results_tx.clone();
        let logs = self.logs.clone();
        thread::spawn(move || {
            let sink = LogSink { logs };
            let result = app.refresh(&collections, filter.as_deref(), &sink);
            let _ = tx.send((generation, result));
        });
    }

    /// Filter changed: only the year chart re-aggregates, from the batch
    /// already in hand. No network traffic.
    fn apply_filter(&mut self) {
        if let Some(batch) = &self.batch {
            let years = year_counts(batch, self.selection.modality_filter());
            self.line.replace(line_model(&years));
        }
    }

    fn cycle_filter(&mut self) {
        let next = match self.filter_index {
            None if !self.modality_options.is_empty() => Some(0),
            None => None,
            Some(index) if index + 1 < self.modality_options.len() => Some(index + 1),
            Some(_) => None,
        };
        self.filter_index = next;
        self.selection
            .set_modality_filter(next.map(|index| self.modality_options[index].clone()));
        self.apply_filter();
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.cursor + 1 < self.catalog.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Char(' ') => {
                if let Some(entry) = self.catalog.get(self.cursor) {
                    let id = entry.id.clone();
                    self.selection.toggle(&id);
                    self.trigger_refresh();
                }
            }
            KeyCode::Enter => {
                if let Some(entry) = self.catalog.get(self.cursor) {
                    self.selection.set_primary(entry.id.clone());
                    self.trigger_refresh();
                }
            }
            KeyCode::Char('c') => {
                if self.selection.primary().is_some() {
                    self.selection.clear_primary();
                    self.trigger_refresh();
                }
            }
            KeyCode::Char('a') => {
                self.selection.deselect_all();
                self.trigger_refresh();
            }
            KeyCode::Char('m') => {
                self.cycle_filter();
            }
            _ => {}
        }
        false
    }

    fn current_filter_label(&self) -> String {
        match self.selection.modality_filter() {
            Some(code) => self.app.labels().modality_label(code),
            None => "All Modalities".to_string(),
        }
    }

    fn recent_logs(&self, count: usize) -> Vec<String> {
        self.logs
            .lock()
            .map(|logs| logs.iter().rev().take(count).rev().cloned().collect())
            .unwrap_or_default()
    }
}

fn draw_ui<C: NbiaClient + Clone + Send + 'static>(
    frame: &mut ratatui::Frame,
    dash: &Dashboard<C>,
    tick: usize,
) {
    if !dash.selection.reveal().is_revealed() {
        draw_welcome(frame, dash);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(5),
        ])
        .split(frame.area());

    draw_header(frame, dash, tick, chunks[0]);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(28), Constraint::Percentage(72)])
        .split(chunks[1]);

    draw_catalog(frame, dash, main[0]);

    let grid = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main[1]);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(grid[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(grid[1]);

    draw_bar_pane(frame, dash, top[0]);
    draw_line_pane(frame, dash, top[1]);
    draw_radar_pane(frame, dash, bottom[0]);
    draw_bubble_pane(frame, dash, bottom[1]);

    draw_footer(frame, dash, chunks[2]);
}

fn draw_welcome<C: NbiaClient + Clone + Send + 'static>(
    frame: &mut ratatui::Frame,
    dash: &Dashboard<C>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let marker = dash.app.labels().catalog_marker.clone();
    let banner = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("THE {marker} COLLECTION"),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "To get started: select a {marker} cancer collection"
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(banner, chunks[0]);

    draw_catalog(frame, dash, chunks[1]);

    let mut lines = vec![Line::from(
        "↑/↓ move   Enter select   Space check   q quit",
    )];
    if let Some(error) = &dash.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    let help = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help, chunks[2]);
}

fn draw_header<C: NbiaClient + Clone + Send + 'static>(
    frame: &mut ratatui::Frame,
    dash: &Dashboard<C>,
    tick: usize,
    area: Rect,
) {
    let hb = if dash.in_flight && tick % 2 == 0 {
        "*"
    } else {
        " "
    };
    let selected = dash.selection.effective_collections().len();
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "TCIA-DASH",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(env!("CARGO_PKG_VERSION"), Style::default().fg(Color::Gray)),
        Span::raw(format!(
            "   Collections: {selected}   Filter: {}   ",
            dash.current_filter_label()
        )),
        Span::styled(hb, Style::default().fg(Color::Green)),
    ]))
    .alignment(Alignment::Left)
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn draw_catalog<C: NbiaClient + Clone + Send + 'static>(
    frame: &mut ratatui::Frame,
    dash: &Dashboard<C>,
    area: Rect,
) {
    let block = Block::default()
        .title("Collections")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if dash.catalog.is_empty() {
        let placeholder = Paragraph::new("No collections available")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(placeholder, inner);
        return;
    }

    let visible = inner.height as usize;
    let skip = dash.cursor.saturating_sub(visible.saturating_sub(1));
    let lines: Vec<Line> = dash
        .catalog
        .iter()
        .enumerate()
        .skip(skip)
        .take(visible)
        .map(|(index, entry)| {
            let cursor = if index == dash.cursor { ">" } else { " " };
            let check = if dash.selection.is_checked(&entry.id) {
                "[x]"
            } else {
                "[ ]"
            };
            let primary = if dash.selection.primary() == Some(&entry.id) {
                "*"
            } else {
                " "
            };
            let style = if index == dash.cursor {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(vec![
                Span::styled(format!("{cursor}{primary}{check} "), style),
                Span::styled(entry.display_label.clone(), style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_placeholder(frame: &mut ratatui::Frame, area: Rect, text: &str) {
    let placeholder = Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true });
    frame.render_widget(placeholder, area);
}

fn draw_bar_pane<C: NbiaClient + Clone + Send + 'static>(
    frame: &mut ratatui::Frame,
    dash: &Dashboard<C>,
    area: Rect,
) {
    let block = Block::default()
        .title("Imaging Modalities")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(model) = dash.bar.get() else {
        draw_placeholder(frame, inner, "Select a collection to load data");
        return;
    };
    if model.series.is_empty() || model.labels.is_empty() {
        draw_placeholder(frame, inner, "No modality data");
        return;
    }

    let mut chart = BarChart::default()
        .bar_width(3)
        .bar_gap(0)
        .group_gap(2)
        .max(model.max.max(1));
    for (index, label) in model.labels.iter().enumerate() {
        let bars: Vec<Bar> = model
            .series
            .iter()
            .map(|(style, values)| {
                Bar::default()
                    .value(values.get(index).copied().unwrap_or(0))
                    .style(Style::default().fg(style.color))
                    .value_style(Style::default().fg(Color::White))
            })
            .collect();
        let short: String = label.chars().take(8).collect();
        chart = chart.data(BarGroup::default().label(Line::from(short)).bars(&bars));
    }
    frame.render_widget(chart, inner);
}

fn draw_line_pane<C: NbiaClient + Clone + Send + 'static>(
    frame: &mut ratatui::Frame,
    dash: &Dashboard<C>,
    area: Rect,
) {
    let title = format!("Series per Year ({})", dash.current_filter_label());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(model) = dash.line.get() else {
        draw_placeholder(frame, inner, "Select a collection to load data");
        return;
    };
    if model.years.is_empty() {
        draw_placeholder(frame, inner, "No dated series");
        return;
    }

    let points: Vec<Vec<(f64, f64)>> = model
        .series
        .iter()
        .map(|(_, values)| {
            values
                .iter()
                .enumerate()
                .map(|(index, value)| (index as f64, *value as f64))
                .collect()
        })
        .collect();
    let datasets: Vec<Dataset> = model
        .series
        .iter()
        .zip(&points)
        .map(|((style, _), data)| {
            Dataset::default()
                .name(style.name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(style.color))
                .data(data)
        })
        .collect();

    let x_labels: Vec<Span> = vec![
        Span::raw(model.years.first().cloned().unwrap_or_default()),
        Span::raw(model.years.last().cloned().unwrap_or_default()),
    ];
    let max = model.max.max(1) as f64;
    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("Year")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, (model.years.len().saturating_sub(1)).max(1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Series")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, max])
                .labels(vec![Span::raw("0"), Span::raw(format!("{}", model.max))]),
        );
    frame.render_widget(chart, inner);
}

fn draw_radar_pane<C: NbiaClient + Clone + Send + 'static>(
    frame: &mut ratatui::Frame,
    dash: &Dashboard<C>,
    area: Rect,
) {
    let block = Block::default()
        .title("Modality Radar")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(model) = dash.radar.get() else {
        draw_placeholder(frame, inner, "Select a collection to load data");
        return;
    };
    if model.axes.len() < 3 {
        draw_placeholder(frame, inner, "Need at least three modalities");
        return;
    }

    let axis_count = model.axes.len();
    let angle_of = |index: usize| {
        std::f64::consts::FRAC_PI_2
            - (index as f64 / axis_count as f64) * std::f64::consts::TAU
    };

    let canvas = Canvas::default()
        .x_bounds([-1.3, 1.3])
        .y_bounds([-1.3, 1.3])
        .paint(|ctx| {
            for step in 1..=4 {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: f64::from(step) / 4.0,
                    color: Color::DarkGray,
                });
            }
            for index in 0..axis_count {
                let angle = angle_of(index);
                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: 0.0,
                    x2: angle.cos(),
                    y2: angle.sin(),
                    color: Color::DarkGray,
                });
            }
            for (style, values) in &model.series {
                for index in 0..axis_count {
                    let next = (index + 1) % axis_count;
                    let r1 = (values[index] / model.max).min(1.0);
                    let r2 = (values[next] / model.max).min(1.0);
                    let a1 = angle_of(index);
                    let a2 = angle_of(next);
                    ctx.draw(&CanvasLine {
                        x1: a1.cos() * r1,
                        y1: a1.sin() * r1,
                        x2: a2.cos() * r2,
                        y2: a2.sin() * r2,
                        color: style.color,
                    });
                }
            }
        });
    frame.render_widget(canvas, inner);
}

fn draw_bubble_pane<C: NbiaClient + Clone + Send + 'static>(
    frame: &mut ratatui::Frame,
    dash: &Dashboard<C>,
    area: Rect,
) {
    let block = Block::default()
        .title("Scans by Year × Modality")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(model) = dash.bubble.get() else {
        draw_placeholder(frame, inner, "Select a collection to load data");
        return;
    };
    if model.series.iter().all(|(_, marks)| marks.is_empty()) {
        draw_placeholder(frame, inner, "No dated, known-modality scans");
        return;
    }

    let x_max = (model.years.len() + 1) as f64;
    let y_max = (model.modalities.len() + 1) as f64;
    let canvas = Canvas::default()
        .x_bounds([0.0, x_max])
        .y_bounds([0.0, y_max])
        .paint(|ctx| {
            for (style, marks) in &model.series {
                for mark in marks {
                    ctx.draw(&Circle {
                        x: (mark.year_index + 1) as f64,
                        y: (mark.modality_index + 1) as f64,
                        radius: mark.radius / BUBBLE_SCALE * 0.45,
                        color: style.color,
                    });
                }
            }
        });
    frame.render_widget(canvas, inner);
}

fn draw_footer<C: NbiaClient + Clone + Send + 'static>(
    frame: &mut ratatui::Frame,
    dash: &Dashboard<C>,
    area: Rect,
) {
    let mut lines = Vec::new();

    let mut legend = vec![Span::styled("Charting: ", Style::default().fg(Color::Gray))];
    for id in dash.selection.effective_collections() {
        let (r, g, b) = crate::color::distinct_color(id.as_str()).to_rgb();
        legend.push(Span::styled(
            "■ ",
            Style::default().fg(Color::Rgb(r, g, b)),
        ));
        legend.push(Span::raw(format!("{id}  ")));
    }
    lines.push(Line::from(legend));

    for log in dash.recent_logs(2) {
        lines.push(Line::from(Span::styled(
            log,
            Style::default().fg(Color::DarkGray),
        )));
    }

    match &dash.error {
        Some(error) => lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        ))),
        None => lines.push(Line::from(Span::styled(
            "Space check   Enter primary   c clear primary   a deselect all   m filter   q quit",
            Style::default().fg(Color::Gray),
        ))),
    }

    let footer = Paragraph::new(lines)
        .block(Block::default().borders(Borders::TOP))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::aggregate_all;
    use crate::domain::{CollectionId, SeriesRecord};
    use crate::labels::Labels;
    use crate::nbia::CatalogEntry;

    #[derive(Clone)]
    struct StaticNbia;

    impl NbiaClient for StaticNbia {
        fn fetch_collections(&self) -> Result<Vec<CatalogEntry>, DashError> {
            Ok(Vec::new())
        }
        fn fetch_series(
            &self,
            _collection: &CollectionId,
        ) -> Result<Vec<SeriesRecord>, DashError> {
            Ok(Vec::new())
        }
    }

    fn record(modality: &str, date: &str) -> SeriesRecord {
        SeriesRecord {
            modality: modality.to_string(),
            series_date: Some(date.to_string()),
        }
    }

    fn result(batch: SeriesBatch, filter: Option<&str>) -> RefreshResult {
        RefreshResult {
            data: aggregate_all(&batch, filter),
            batch,
        }
    }

    #[test]
    fn shrinking_fetch_clears_the_filter_and_redoes_the_year_chart() {
        let app = App::new(StaticNbia, Labels::default());
        let mut dash = Dashboard::new(app);

        let first: SeriesBatch = vec![(
            "TCGA-A".parse().unwrap(),
            vec![record("CT", "2010-01-01"), record("MR", "2011-01-01")],
        )];
        dash.install(result(first, None));

        // step the filter to MR (index 1)
        dash.cycle_filter();
        dash.cycle_filter();
        assert_eq!(dash.selection.modality_filter(), Some("MR"));

        // the next fetch carries CT only, so MR no longer exists
        let second: SeriesBatch = vec![(
            "TCGA-A".parse().unwrap(),
            vec![record("CT", "2012-01-01")],
        )];
        dash.install(result(second, Some("MR")));

        assert!(dash.selection.modality_filter().is_none());
        assert!(dash.filter_index.is_none());
        let line = dash.line.get().unwrap();
        assert_eq!(line.years, vec!["2012"]);
        assert_eq!(line.series[0].1, vec![1]);
    }

    #[test]
    fn surviving_filter_is_kept_across_fetches() {
        let app = App::new(StaticNbia, Labels::default());
        let mut dash = Dashboard::new(app);

        let first: SeriesBatch = vec![(
            "TCGA-A".parse().unwrap(),
            vec![record("CT", "2010-01-01"), record("MR", "2011-01-01")],
        )];
        dash.install(result(first.clone(), None));
        dash.cycle_filter();
        assert_eq!(dash.selection.modality_filter(), Some("CT"));

        dash.install(result(first, Some("CT")));
        assert_eq!(dash.selection.modality_filter(), Some("CT"));
        let line = dash.line.get().unwrap();
        assert_eq!(line.years, vec!["2010"]);
    }
}
