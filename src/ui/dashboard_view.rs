use crate::calc::{
    build_month_grid, calculate_fleet_stats, CalendarCursor, DayKind, FleetStats,
};
use crate::data::{
    AppSettings, FleetData, MaintenanceData, MaintenanceEntry, MaintenanceKind, Reservation,
    ReservationData, StatusFilter, Vehicle, VehicleForm, VehicleStatus,
};
use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{self, Event as CEvent, KeyCode, KeyModifiers};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Axis, BarChart, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table,
        TableState,
    },
    Frame, Terminal,
};
use std::io::Stdout;
use std::time::{Duration as StdDuration, Instant};

// Calendar cell colors
const RENTED_COLOR: Color = Color::Blue;
const MAINTENANCE_COLOR: Color = Color::Indexed(208); // reddish-orange
const AVAILABLE_COLOR: Color = Color::Green;

/// Delay of the simulated document extraction before the rental form is
/// prefilled.
const EXTRACTION_DELAY: StdDuration = StdDuration::from_millis(2500);

/// Static values the simulated extraction "reads" from the documents.
const MOCK_RENTER: &str = "Mohammed El Amrani";
const MOCK_DOCUMENT: &str = "AB123456";
const MOCK_START_DATE: &str = "2025-11-20";
const MOCK_END_DATE: &str = "2025-11-27";
const MOCK_DOCS: [&str; 2] = ["cin_recto.pdf", "permis_conduire.pdf"];

const VEHICLE_FIELDS: [&str; 8] = [
    "Model",
    "Plate",
    "Status (available/rented)",
    "Last maintenance (YYYY-MM-DD)",
    "Latitude",
    "Longitude",
    "Revenue",
    "Expenses",
];

const RENTAL_FIELDS: [&str; 4] = [
    "Renter name",
    "ID document (CIN)",
    "Start date (YYYY-MM-DD)",
    "End date (YYYY-MM-DD)",
];

const MAINTENANCE_FIELDS: [&str; 3] = [
    "Type (oil/brakes/tires/service/other)",
    "Date (YYYY-MM-DD)",
    "Notes",
];

#[derive(Clone, Copy, PartialEq, Default, Debug)]
enum ViewState {
    #[default]
    Dashboard,
    Fleet,
    Detail,
    NewRental,
    AddVehicle,
}

/// The values collected by the rental form, parsed and validated.
#[derive(Clone, Debug)]
struct RentalForm {
    renter: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

/// Simulated document extraction in flight. Dropped when the rental view is
/// torn down, so a fired deadline can never touch another view's state.
struct ExtractionTask {
    deadline: Instant,
}

pub struct App<'a> {
    fleet: &'a mut FleetData,
    reservations: &'a mut ReservationData,
    maintenance: &'a mut MaintenanceData,
    pub settings: AppSettings,
    today: NaiveDate,
    /// Which top-level view is active.
    view_state: ViewState,
    /// Selected row in whatever list the active view shows.
    list_cursor: usize,
    /// Fleet view status filter.
    fleet_filter: StatusFilter,
    /// Vehicle whose detail view is open.
    detail_id: Option<u32>,
    /// Month shown by the detail calendar.
    calendar: CalendarCursor,
    /// 0 = browsing; 1-N = entering form field N.
    form_stage: u8,
    /// Completed fields during a staged form entry.
    form_bufs: Vec<String>,
    input_buffer: String,
    /// Vehicle chosen in the rental form before the text fields.
    rental_vehicle: Option<u32>,
    /// Field values produced by the extraction, used to prefill the form.
    rental_prefill: Option<[String; 4]>,
    /// Mock documents attached to the rental form.
    attached_docs: Vec<String>,
    pending_extraction: Option<ExtractionTask>,
    /// Transient status message (message, color). Cleared on next keypress.
    notice: Option<(String, Color)>,
}

impl<'a> App<'a> {
    pub fn new(
        fleet: &'a mut FleetData,
        reservations: &'a mut ReservationData,
        maintenance: &'a mut MaintenanceData,
        settings: AppSettings,
        today: NaiveDate,
    ) -> Self {
        App {
            fleet,
            reservations,
            maintenance,
            settings,
            today,
            view_state: ViewState::Dashboard,
            list_cursor: 0,
            fleet_filter: StatusFilter::All,
            detail_id: None,
            calendar: CalendarCursor::from_date(today),
            form_stage: 0,
            form_bufs: Vec::new(),
            input_buffer: String::new(),
            rental_vehicle: None,
            rental_prefill: None,
            attached_docs: Vec::new(),
            pending_extraction: None,
            notice: None,
        }
    }

    /// Single transition point between views. Clears per-view form state and
    /// cancels the pending extraction when the rental view is left.
    fn enter_view(&mut self, view: ViewState) {
        if view != ViewState::NewRental {
            self.pending_extraction = None;
            self.rental_prefill = None;
            self.attached_docs.clear();
            self.rental_vehicle = None;
        }
        self.view_state = view;
        self.list_cursor = 0;
        self.form_stage = 0;
        self.form_bufs.clear();
        self.input_buffer.clear();
    }

    /// Opens the detail view for `id`; unknown ids fall back to the fleet
    /// list.
    fn open_detail(&mut self, id: u32) {
        if self.fleet.get(id).is_some() {
            self.enter_view(ViewState::Detail);
            self.detail_id = Some(id);
            self.calendar = CalendarCursor::from_date(self.today);
        } else {
            self.enter_view(ViewState::Fleet);
        }
    }

    fn detail_vehicle(&self) -> Option<&Vehicle> {
        self.detail_id.and_then(|id| self.fleet.get(id))
    }

    // ── Timed extraction ──────────────────────────────────────────────────

    /// Fires the simulated extraction once its deadline has passed. Called
    /// from the event loop on every iteration.
    pub fn tick(&mut self, now: Instant) {
        let due = self
            .pending_extraction
            .as_ref()
            .is_some_and(|t| now >= t.deadline);
        if due {
            self.pending_extraction = None;
            self.apply_extraction();
        }
    }

    fn apply_extraction(&mut self) {
        let prefill = [
            MOCK_RENTER.to_string(),
            MOCK_DOCUMENT.to_string(),
            MOCK_START_DATE.to_string(),
            MOCK_END_DATE.to_string(),
        ];
        // Fill the field currently being edited if the user has not typed yet.
        if self.form_stage >= 1 && self.input_buffer.is_empty() {
            if let Some(value) = prefill.get(self.form_stage as usize - 1) {
                self.input_buffer = value.clone();
            }
        }
        self.rental_prefill = Some(prefill);
        self.notice = Some((
            "Documents processed, form prefilled".to_string(),
            Color::Green,
        ));
    }

    // ── Key handling ──────────────────────────────────────────────────────

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        // Clear the transient notice on every keypress
        self.notice = None;

        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        match self.view_state {
            ViewState::Dashboard => self.handle_dashboard_key(code),
            ViewState::Fleet => {
                self.handle_fleet_key(code);
                false
            }
            ViewState::Detail => {
                self.handle_detail_key(code);
                false
            }
            ViewState::NewRental => {
                self.handle_rental_key(code);
                false
            }
            ViewState::AddVehicle => {
                self.handle_add_vehicle_key(code);
                false
            }
        }
    }

    fn handle_dashboard_key(&mut self, code: KeyCode) -> bool {
        let rented_ids: Vec<u32> = self
            .fleet
            .by_status(StatusFilter::Rented)
            .iter()
            .map(|v| v.id)
            .collect();
        match code {
            KeyCode::Up => {
                if self.list_cursor > 0 {
                    self.list_cursor -= 1;
                }
            }
            KeyCode::Down => {
                if self.list_cursor + 1 < rented_ids.len() {
                    self.list_cursor += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(&id) = rented_ids.get(self.list_cursor) {
                    self.open_detail(id);
                }
            }
            KeyCode::Char('f') => {
                self.enter_view(ViewState::Fleet);
            }
            KeyCode::Char('r') => {
                self.enter_view(ViewState::NewRental);
            }
            KeyCode::Char('a') => {
                self.enter_view(ViewState::AddVehicle);
                self.form_stage = 1;
            }
            KeyCode::Char('q') => return true,
            _ => {}
        }
        false
    }

    fn handle_fleet_key(&mut self, code: KeyCode) {
        let ids: Vec<u32> = self
            .fleet
            .by_status(self.fleet_filter)
            .iter()
            .map(|v| v.id)
            .collect();
        match code {
            KeyCode::Up => {
                if self.list_cursor > 0 {
                    self.list_cursor -= 1;
                }
            }
            KeyCode::Down => {
                if self.list_cursor + 1 < ids.len() {
                    self.list_cursor += 1;
                }
            }
            KeyCode::Char('f') | KeyCode::Tab => {
                self.fleet_filter = self.fleet_filter.next();
                self.list_cursor = 0;
            }
            KeyCode::Enter => {
                if let Some(&id) = ids.get(self.list_cursor) {
                    self.open_detail(id);
                }
            }
            KeyCode::Char('a') => {
                self.enter_view(ViewState::AddVehicle);
                self.form_stage = 1;
            }
            KeyCode::Char('r') => {
                self.enter_view(ViewState::NewRental);
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                self.enter_view(ViewState::Dashboard);
            }
            _ => {}
        }
    }

    // ── Detail view (calendar + maintenance form) ─────────────────────────

    fn handle_detail_key(&mut self, code: KeyCode) {
        // The vehicle can only vanish if the id was bad to begin with.
        if self.detail_vehicle().is_none() {
            self.enter_view(ViewState::Fleet);
            return;
        }

        if self.form_stage == 0 {
            match code {
                KeyCode::Char('n') | KeyCode::Right => {
                    self.calendar.advance(1);
                }
                KeyCode::Char('p') | KeyCode::Left => {
                    self.calendar.advance(-1);
                }
                KeyCode::Char('m') => {
                    self.form_stage = 1;
                    self.form_bufs.clear();
                    self.input_buffer.clear();
                }
                KeyCode::Esc | KeyCode::Char('q') => {
                    self.enter_view(ViewState::Fleet);
                }
                _ => {}
            }
        } else {
            // Maintenance form field entry
            match code {
                KeyCode::Char(c) => {
                    self.input_buffer.push(c);
                }
                KeyCode::Backspace => {
                    self.input_buffer.pop();
                }
                KeyCode::Enter => {
                    if let Err(msg) = self.validate_maintenance_stage() {
                        self.input_buffer = msg;
                        return;
                    }
                    self.form_bufs.push(self.input_buffer.clone());
                    self.input_buffer.clear();
                    if self.form_stage as usize == MAINTENANCE_FIELDS.len() {
                        self.submit_maintenance();
                    } else {
                        self.form_stage += 1;
                    }
                }
                KeyCode::Esc => {
                    self.form_stage = 0;
                    self.form_bufs.clear();
                    self.input_buffer.clear();
                }
                _ => {}
            }
        }
    }

    fn validate_maintenance_stage(&self) -> Result<(), String> {
        match self.form_stage {
            1 => self.input_buffer.parse::<MaintenanceKind>().map(|_| ()),
            2 => NaiveDate::parse_from_str(&self.input_buffer, "%Y-%m-%d")
                .map(|_| ())
                .map_err(|_| "Invalid date, use YYYY-MM-DD".to_string()),
            _ => Ok(()),
        }
    }

    fn submit_maintenance(&mut self) {
        let Some(id) = self.detail_id else { return };
        // Both fields were validated at entry.
        let kind: MaintenanceKind = match self.form_bufs[0].parse() {
            Ok(k) => k,
            Err(_) => return,
        };
        let date = match NaiveDate::parse_from_str(&self.form_bufs[1], "%Y-%m-%d") {
            Ok(d) => d,
            Err(_) => return,
        };
        let notes = self.form_bufs.get(2).cloned().unwrap_or_default();
        self.maintenance
            .add(MaintenanceEntry::new(id, kind, date, &notes));
        self.form_stage = 0;
        self.form_bufs.clear();
        self.input_buffer.clear();
        self.notice = Some((
            format!("Maintenance scheduled for {}", date.format("%Y-%m-%d")),
            Color::Green,
        ));
    }

    // ── New rental view ───────────────────────────────────────────────────

    fn handle_rental_key(&mut self, code: KeyCode) {
        if self.form_stage == 0 {
            // Vehicle selection
            let available_ids: Vec<u32> = self
                .fleet
                .by_status(StatusFilter::Available)
                .iter()
                .map(|v| v.id)
                .collect();
            match code {
                KeyCode::Up => {
                    if self.list_cursor > 0 {
                        self.list_cursor -= 1;
                    }
                }
                KeyCode::Down => {
                    if self.list_cursor + 1 < available_ids.len() {
                        self.list_cursor += 1;
                    }
                }
                KeyCode::Enter => {
                    if let Some(&id) = available_ids.get(self.list_cursor) {
                        self.rental_vehicle = Some(id);
                        self.advance_rental_stage();
                    }
                }
                KeyCode::Char('u') => {
                    self.attach_documents(Instant::now());
                }
                KeyCode::Esc | KeyCode::Char('q') => {
                    self.enter_view(ViewState::Dashboard);
                }
                _ => {}
            }
        } else {
            match code {
                KeyCode::Char(c) => {
                    self.input_buffer.push(c);
                }
                KeyCode::Backspace => {
                    self.input_buffer.pop();
                }
                KeyCode::Enter => {
                    if let Err(msg) = self.validate_rental_stage() {
                        self.input_buffer = msg;
                        return;
                    }
                    self.form_bufs.push(self.input_buffer.clone());
                    self.input_buffer.clear();
                    if self.form_stage as usize == RENTAL_FIELDS.len() {
                        self.submit_rental();
                    } else {
                        self.advance_rental_stage();
                    }
                }
                KeyCode::Esc => {
                    self.enter_view(ViewState::Dashboard);
                }
                _ => {}
            }
        }
    }

    /// Attaches the mock documents and starts the extraction timer.
    fn attach_documents(&mut self, now: Instant) {
        self.attached_docs = MOCK_DOCS.iter().map(|s| s.to_string()).collect();
        self.pending_extraction = Some(ExtractionTask {
            deadline: now + EXTRACTION_DELAY,
        });
    }

    /// Moves to the next rental field, prefilled from the extraction when
    /// one has completed.
    fn advance_rental_stage(&mut self) {
        self.form_stage += 1;
        self.input_buffer = self
            .rental_prefill
            .as_ref()
            .and_then(|p| p.get(self.form_stage as usize - 1))
            .cloned()
            .unwrap_or_default();
    }

    fn validate_rental_stage(&self) -> Result<(), String> {
        match self.form_stage {
            1 => {
                if self.input_buffer.trim().is_empty() {
                    Err("Renter name required".to_string())
                } else {
                    Ok(())
                }
            }
            3 => NaiveDate::parse_from_str(&self.input_buffer, "%Y-%m-%d")
                .map(|_| ())
                .map_err(|_| "Invalid date, use YYYY-MM-DD".to_string()),
            4 => {
                let end = NaiveDate::parse_from_str(&self.input_buffer, "%Y-%m-%d")
                    .map_err(|_| "Invalid date, use YYYY-MM-DD".to_string())?;
                let start = self
                    .form_bufs
                    .get(2)
                    .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
                match start {
                    Some(start) if end < start => {
                        Err("End date before start date".to_string())
                    }
                    _ => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }

    fn submit_rental(&mut self) {
        let Some(id) = self.rental_vehicle else { return };
        let form = match build_rental_form(&self.form_bufs) {
            Ok(f) => f,
            Err(msg) => {
                self.notice = Some((msg, Color::Red));
                return;
            }
        };
        let Some(vehicle) = self.fleet.get_mut(id) else {
            self.enter_view(ViewState::Fleet);
            return;
        };
        if vehicle.status != VehicleStatus::Available {
            self.notice = Some((
                format!("{} is no longer available", vehicle.model),
                Color::Red,
            ));
            return;
        }
        vehicle.status = VehicleStatus::Rented;
        vehicle.renter = Some(form.renter.clone());
        vehicle.rental_end = Some(form.end_date);
        let model = vehicle.model.clone();
        self.reservations.add(Reservation::new(
            id,
            &form.renter,
            form.start_date,
            form.end_date,
        ));
        self.enter_view(ViewState::Dashboard);
        self.notice = Some((
            format!("{} rented to {}", model, form.renter),
            Color::Green,
        ));
    }

    // ── Add vehicle view ──────────────────────────────────────────────────

    fn handle_add_vehicle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => {
                self.input_buffer.push(c);
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Enter => {
                if let Err(msg) = self.validate_vehicle_stage() {
                    self.input_buffer = msg;
                    return;
                }
                self.form_bufs.push(self.input_buffer.clone());
                self.input_buffer.clear();
                if self.form_stage as usize == VEHICLE_FIELDS.len() {
                    self.submit_vehicle();
                } else {
                    self.form_stage += 1;
                }
            }
            KeyCode::Esc => {
                self.enter_view(ViewState::Fleet);
            }
            _ => {}
        }
    }

    fn validate_vehicle_stage(&self) -> Result<(), String> {
        match self.form_stage {
            1 | 2 => {
                if self.input_buffer.trim().is_empty() {
                    Err("Value required".to_string())
                } else {
                    Ok(())
                }
            }
            3 => self.input_buffer.parse::<VehicleStatus>().map(|_| ()),
            4 => NaiveDate::parse_from_str(&self.input_buffer, "%Y-%m-%d")
                .map(|_| ())
                .map_err(|_| "Invalid date, use YYYY-MM-DD".to_string()),
            5..=8 => parse_finite(&self.input_buffer).map(|_| ()),
            _ => Ok(()),
        }
    }

    fn submit_vehicle(&mut self) {
        let form = match build_vehicle_form(&self.form_bufs) {
            Ok(f) => f,
            Err(msg) => {
                self.notice = Some((msg, Color::Red));
                return;
            }
        };
        let id = self.fleet.add(form);
        self.enter_view(ViewState::Fleet);
        self.notice = Some((format!("Vehicle #{} added", id), Color::Green));
    }

    // ── Rendering ─────────────────────────────────────────────────────────

    pub fn render(&mut self, f: &mut Frame) {
        let area = f.area();
        match self.view_state {
            ViewState::Dashboard => self.render_dashboard(f, area),
            ViewState::Fleet => self.render_fleet(f, area),
            ViewState::Detail => self.render_detail(f, area),
            ViewState::NewRental => self.render_new_rental(f, area),
            ViewState::AddVehicle => self.render_add_vehicle(f, area),
        }
    }

    fn render_dashboard(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(12), // stats + charts
                Constraint::Min(10),    // map + rented vehicles
                Constraint::Length(6),  // notice + help
            ])
            .split(area);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(32),
                Constraint::Min(40),
                Constraint::Length(42),
            ])
            .split(chunks[0]);

        let stats = calculate_fleet_stats(self.fleet);
        self.render_stats_panel(f, top[0], &stats);
        self.render_revenue_chart(f, top[1]);
        self.render_expense_chart(f, top[2]);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(50), Constraint::Length(58)])
            .split(chunks[1]);

        self.render_map(f, middle[0]);
        self.render_rented_table(f, middle[1]);

        self.render_footer(
            f,
            chunks[2],
            &[
                ("↑ ↓", "Select rented vehicle", "Enter", "Open detail"),
                ("f", "Fleet list", "r", "New rental"),
                ("a", "Add vehicle", "q/Ctrl+C", "Quit"),
            ],
        );
    }

    fn render_stats_panel(&self, f: &mut Frame, area: Rect, stats: &FleetStats) {
        let header_style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        let header = Row::new(vec![
            Cell::from("Metric").style(header_style),
            Cell::from("Value").style(header_style),
        ]);

        let rows = vec![
            data_row("Vehicles", plain(format!("{}", stats.total_vehicles))),
            data_row(
                "Available",
                colored(format!("{}", stats.available), AVAILABLE_COLOR),
            ),
            data_row("Rented", colored(format!("{}", stats.rented), RENTED_COLOR)),
            data_row(
                "Utilization",
                plain(format!("{:.1}%", stats.utilization_pct())),
            ),
            data_row(
                "Revenue",
                colored(self.money(stats.total_revenue), Color::Green),
            ),
            data_row(
                "Expenses",
                colored(self.money(stats.total_expenses), Color::Red),
            ),
            data_row(
                "Profit",
                colored(self.money(stats.total_profit), Color::Cyan),
            ),
        ];

        let table = Table::new(rows, [Constraint::Length(14), Constraint::Length(14)])
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(" Fleet "));
        f.render_widget(table, area);
    }

    fn render_revenue_chart(&self, f: &mut Frame, area: Rect) {
        let labels = crate::data::seed::MONTH_LABELS;
        let series = crate::data::seed::monthly_revenue();
        let points: Vec<(f64, f64)> = series
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64, *v as f64))
            .collect();

        let datasets = vec![Dataset::default()
            .name("Revenue")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&points)];

        let max_x = (series.len().saturating_sub(1)) as f64;
        let chart = Chart::new(datasets)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Revenue ({}) ", self.settings.currency)),
            )
            .x_axis(
                Axis::default()
                    .bounds([0.0, max_x])
                    .labels([labels[0], labels[labels.len() / 2], labels[labels.len() - 1]]),
            )
            .y_axis(
                Axis::default()
                    .bounds([30000.0, 55000.0])
                    .labels(["30k", "42k", "55k"]),
            );
        f.render_widget(chart, area);
    }

    fn render_expense_chart(&self, f: &mut Frame, area: Rect) {
        let breakdown = crate::data::seed::expense_breakdown();
        // BarChart values render in thousands to fit the bar labels.
        let data: Vec<(&str, u64)> = breakdown
            .iter()
            .map(|(label, value)| (*label, value / 1000))
            .collect();

        let chart = BarChart::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Expenses (k{}) ", self.settings.currency)),
            )
            .data(data.as_slice())
            .bar_width(8)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Red))
            .value_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
        f.render_widget(chart, area);
    }

    fn render_map(&self, f: &mut Frame, area: Rect) {
        // Bounds fit the fleet with a margin; fall back to the configured
        // center for an empty fleet.
        let (mut min_lng, mut max_lng, mut min_lat, mut max_lat) = (
            self.settings.map_center_lng - 0.05,
            self.settings.map_center_lng + 0.05,
            self.settings.map_center_lat - 0.05,
            self.settings.map_center_lat + 0.05,
        );
        for v in &self.fleet.vehicles {
            min_lng = min_lng.min(v.lng - 0.01);
            max_lng = max_lng.max(v.lng + 0.01);
            min_lat = min_lat.min(v.lat - 0.01);
            max_lat = max_lat.max(v.lat + 0.01);
        }

        let available: Vec<(f64, f64)> = self
            .fleet
            .vehicles
            .iter()
            .filter(|v| v.status == VehicleStatus::Available)
            .map(|v| (v.lng, v.lat))
            .collect();
        let rented: Vec<(f64, f64)> = self
            .fleet
            .vehicles
            .iter()
            .filter(|v| v.status == VehicleStatus::Rented)
            .map(|v| (v.lng, v.lat))
            .collect();
        let labels: Vec<(f64, f64, String, Color)> = self
            .fleet
            .vehicles
            .iter()
            .map(|v| {
                (
                    v.lng,
                    v.lat,
                    format!(" {}", v.plate),
                    status_color(v.status),
                )
            })
            .collect();

        let canvas = Canvas::default()
            .block(Block::default().borders(Borders::ALL).title(" Fleet Map "))
            .x_bounds([min_lng, max_lng])
            .y_bounds([min_lat, max_lat])
            .paint(|ctx| {
                ctx.draw(&Points {
                    coords: &available,
                    color: AVAILABLE_COLOR,
                });
                ctx.draw(&Points {
                    coords: &rented,
                    color: RENTED_COLOR,
                });
                for (x, y, label, color) in &labels {
                    ctx.print(
                        *x,
                        *y,
                        Line::from(Span::styled(
                            label.clone(),
                            Style::default().fg(*color),
                        )),
                    );
                }
            });
        f.render_widget(canvas, area);
    }

    fn render_rented_table(&self, f: &mut Frame, area: Rect) {
        let rented = self.fleet.by_status(StatusFilter::Rented);

        let header = Row::new(vec![
            Cell::from("Model").style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from("Plate").style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from("Renter").style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from("Until").style(Style::default().add_modifier(Modifier::BOLD)),
        ]);

        let rows: Vec<Row> = rented
            .iter()
            .map(|v| {
                Row::new(vec![
                    Cell::from(v.model.clone()),
                    Cell::from(v.plate.clone()),
                    Cell::from(v.renter.clone().unwrap_or_else(|| "?".to_string())),
                    Cell::from(
                        v.rental_end
                            .map(|d| d.format("%Y-%m-%d").to_string())
                            .unwrap_or_else(|| "?".to_string()),
                    ),
                ])
            })
            .collect();

        let mut table_state = TableState::default();
        if !rented.is_empty() {
            table_state.select(Some(self.list_cursor.min(rented.len() - 1)));
        }

        let table = Table::new(
            rows,
            [
                Constraint::Length(18),
                Constraint::Length(12),
                Constraint::Length(20),
                Constraint::Length(12),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Currently Rented "),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

        f.render_stateful_widget(table, area, &mut table_state);
    }

    // ── Fleet view ────────────────────────────────────────────────────────

    fn render_fleet(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(4)])
            .split(area);

        let vehicles = self.fleet.by_status(self.fleet_filter);

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let header = Row::new(vec![
            Cell::from("#").style(bold),
            Cell::from("Model").style(bold),
            Cell::from("Plate").style(bold),
            Cell::from("Status").style(bold),
            Cell::from("Renter").style(bold),
            Cell::from("Profit").style(bold),
            Cell::from("Image").style(bold),
        ]);

        let rows: Vec<Row> = vehicles
            .iter()
            .map(|v| {
                Row::new(vec![
                    Cell::from(format!("{}", v.id)),
                    Cell::from(v.model.clone()),
                    Cell::from(v.plate.clone()),
                    Cell::from(v.status.to_string())
                        .style(Style::default().fg(status_color(v.status))),
                    Cell::from(v.renter.clone().unwrap_or_default()),
                    Cell::from(self.money(v.profit())),
                    Cell::from(v.image_label().to_string()),
                ])
            })
            .collect();

        let mut table_state = TableState::default();
        if !vehicles.is_empty() {
            table_state.select(Some(self.list_cursor.min(vehicles.len() - 1)));
        }

        let table = Table::new(
            rows,
            [
                Constraint::Length(3),
                Constraint::Length(20),
                Constraint::Length(12),
                Constraint::Length(10),
                Constraint::Length(20),
                Constraint::Length(12),
                Constraint::Length(20),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Fleet [{}]  (f=filter  Enter=detail  a=add  r=rent  Esc=back) ",
            self.fleet_filter.label()
        )))
        .row_highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

        f.render_stateful_widget(table, chunks[0], &mut table_state);

        self.render_notice_and_hints(
            f,
            chunks[1],
            "↑↓=move  f=cycle filter  Enter=detail  a=add vehicle  r=new rental  Esc=back",
        );
    }

    // ── Detail view ───────────────────────────────────────────────────────

    fn render_detail(&self, f: &mut Frame, area: Rect) {
        let Some(vehicle) = self.detail_vehicle() else {
            let p = Paragraph::new("Vehicle not found.");
            f.render_widget(p, area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),  // identity
                Constraint::Min(14),    // calendar + sidebar
                Constraint::Length(7),  // form or hints
            ])
            .split(area);

        // Identity block
        let status_span = Span::styled(
            vehicle.status.to_string(),
            Style::default()
                .fg(status_color(vehicle.status))
                .add_modifier(Modifier::BOLD),
        );
        let info = Paragraph::new(vec![
            Line::from(vec![
                Span::styled(
                    vehicle.model.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                status_span,
            ]),
            Line::from(format!("Plate: {}", vehicle.plate)),
            Line::from(format!("Image: {}", vehicle.image_label())),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Vehicle #{} ", vehicle.id)),
        );
        f.render_widget(info, chunks[0]);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(26), Constraint::Min(40)])
            .split(chunks[1]);

        self.render_calendar_panel(f, middle[0], vehicle);
        self.render_detail_sidebar(f, middle[1], vehicle);

        // Bottom panel: maintenance form or key hints
        if self.form_stage > 0 {
            self.render_form_panel(
                f,
                chunks[2],
                "Schedule Maintenance",
                &MAINTENANCE_FIELDS,
            );
        } else {
            self.render_notice_and_hints(
                f,
                chunks[2],
                "n/p=month  m=schedule maintenance  Esc=back to fleet",
            );
        }
    }

    fn render_calendar_panel(&self, f: &mut Frame, area: Rect, vehicle: &Vehicle) {
        let grid = build_month_grid(
            vehicle.id,
            self.calendar,
            self.reservations,
            self.maintenance,
            self.today,
        );

        let mut lines: Vec<Line> = vec![
            Line::from(Span::styled(
                format!("{:^21}", self.calendar.title()),
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )),
            Line::from("Mo Tu We Th Fr Sa Su"),
        ];

        let mut row_cells: Vec<Span> = Vec::new();
        for _ in 0..grid.start_day {
            row_cells.push(Span::raw("   "));
        }
        let mut col = grid.start_day;
        for cell in &grid.days {
            row_cells.push(Span::styled(
                format!("{:2}", cell.day),
                day_cell_style(cell.kind, cell.is_today),
            ));
            row_cells.push(Span::raw(" "));
            col += 1;
            if col == 7 {
                lines.push(Line::from(std::mem::take(&mut row_cells)));
                col = 0;
            }
        }
        if !row_cells.is_empty() {
            lines.push(Line::from(row_cells));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("rented", Style::default().fg(RENTED_COLOR)),
            Span::raw("  "),
            Span::styled("maintenance", Style::default().fg(MAINTENANCE_COLOR)),
            Span::raw("  "),
            Span::styled("today", Style::default().add_modifier(Modifier::REVERSED)),
        ]));

        let p = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Rental Calendar "),
        );
        f.render_widget(p, area);
    }

    fn render_detail_sidebar(&self, f: &mut Frame, area: Rect, vehicle: &Vehicle) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(5)])
            .split(area);

        // Financials
        let financials = Table::new(
            vec![
                data_row("Revenue", colored(self.money(vehicle.revenue), Color::Green)),
                data_row("Expenses", colored(self.money(vehicle.expenses), Color::Red)),
                data_row("Profit", colored(self.money(vehicle.profit()), Color::Cyan)),
                data_row(
                    "Last maintenance",
                    plain(vehicle.last_maintenance.format("%Y-%m-%d").to_string()),
                ),
            ],
            [Constraint::Length(18), Constraint::Length(16)],
        )
        .block(Block::default().borders(Borders::ALL).title(" Financials "));
        f.render_widget(financials, chunks[0]);

        // Current rental plus maintenance history
        let mut lines: Vec<Line> = Vec::new();
        if vehicle.status == VehicleStatus::Rented {
            lines.push(Line::from(Span::styled(
                "Current rental",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!(
                "  Renter: {}",
                vehicle.renter.as_deref().unwrap_or("?")
            )));
            lines.push(Line::from(format!(
                "  Until:  {}",
                vehicle
                    .rental_end
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "?".to_string())
            )));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            "Scheduled maintenance",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        let entries = self.maintenance.for_vehicle(vehicle.id);
        if entries.is_empty() {
            lines.push(Line::from("  (none)"));
        } else {
            for e in entries {
                lines.push(Line::from(format!(
                    "  {}  {}  {}",
                    e.date.format("%Y-%m-%d"),
                    e.kind,
                    e.notes
                )));
            }
        }

        let p = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Status "));
        f.render_widget(p, chunks[1]);
    }

    // ── New rental view ───────────────────────────────────────────────────

    fn render_new_rental(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),     // vehicle list or chosen vehicle
                Constraint::Length(9),  // form
                Constraint::Length(5),  // documents + notice
            ])
            .split(area);

        if self.form_stage == 0 {
            let available = self.fleet.by_status(StatusFilter::Available);
            let bold = Style::default().add_modifier(Modifier::BOLD);
            let header = Row::new(vec![
                Cell::from("#").style(bold),
                Cell::from("Model").style(bold),
                Cell::from("Plate").style(bold),
            ]);
            let rows: Vec<Row> = available
                .iter()
                .map(|v| {
                    Row::new(vec![
                        Cell::from(format!("{}", v.id)),
                        Cell::from(v.model.clone()),
                        Cell::from(v.plate.clone()),
                    ])
                })
                .collect();
            let mut table_state = TableState::default();
            if !available.is_empty() {
                table_state.select(Some(self.list_cursor.min(available.len() - 1)));
            }
            let table = Table::new(
                rows,
                [
                    Constraint::Length(3),
                    Constraint::Length(24),
                    Constraint::Length(12),
                ],
            )
            .header(header)
            .block(
                Block::default().borders(Borders::ALL).title(
                    " New Rental: choose a vehicle  (Enter=select  u=attach documents  Esc=back) ",
                ),
            )
            .row_highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            );
            f.render_stateful_widget(table, chunks[0], &mut table_state);
        } else {
            let chosen = self
                .rental_vehicle
                .and_then(|id| self.fleet.get(id))
                .map(|v| format!("{} ({})", v.model, v.plate))
                .unwrap_or_else(|| "?".to_string());
            let p = Paragraph::new(vec![Line::from(vec![
                Span::raw("Vehicle: "),
                Span::styled(chosen, Style::default().add_modifier(Modifier::BOLD)),
            ])])
            .block(Block::default().borders(Borders::ALL).title(" New Rental "));
            f.render_widget(p, chunks[0]);
        }

        if self.form_stage > 0 {
            self.render_form_panel(f, chunks[1], "Rental Details", &RENTAL_FIELDS);
        }

        // Documents panel
        let mut doc_lines: Vec<Line> = Vec::new();
        if self.attached_docs.is_empty() {
            doc_lines.push(Line::from(Span::styled(
                "No documents attached (press u)",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            for name in &self.attached_docs {
                doc_lines.push(Line::from(format!("  {}", name)));
            }
        }
        if self.pending_extraction.is_some() {
            doc_lines.push(Line::from(Span::styled(
                "Processing documents...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        if let Some((msg, color)) = &self.notice {
            doc_lines.push(notice_line(msg, *color));
        }
        let docs = Paragraph::new(doc_lines)
            .block(Block::default().borders(Borders::ALL).title(" Documents "));
        f.render_widget(docs, chunks[2]);
    }

    // ── Add vehicle view ──────────────────────────────────────────────────

    fn render_add_vehicle(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(13), Constraint::Min(3)])
            .split(area);

        self.render_form_panel(f, chunks[0], "Add Vehicle", &VEHICLE_FIELDS);
        self.render_notice_and_hints(f, chunks[1], "Enter=confirm field  Esc=cancel");
    }

    // ── Shared panels ─────────────────────────────────────────────────────

    /// Staged form: completed fields, the field being edited with a cursor
    /// marker, and the pending ones blank.
    fn render_form_panel(&self, f: &mut Frame, area: Rect, title: &str, labels: &[&str]) {
        let mut form_lines: Vec<Line> = Vec::new();
        for (i, label) in labels.iter().enumerate() {
            let field_num = (i + 1) as u8;
            let value = if field_num < self.form_stage {
                self.form_bufs.get(i).cloned().unwrap_or_default()
            } else if field_num == self.form_stage {
                format!("{}_", self.input_buffer)
            } else {
                String::new()
            };
            form_lines.push(Line::from(format!("{}: {}", label, value)));
        }
        form_lines.push(Line::from(""));
        form_lines.push(Line::from(Span::styled(
            "Enter=confirm  Esc=cancel",
            Style::default().fg(Color::DarkGray),
        )));
        let p = Paragraph::new(form_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title)),
        );
        f.render_widget(p, area);
    }

    fn render_notice_and_hints(&self, f: &mut Frame, area: Rect, hints: &str) {
        let mut lines: Vec<Line> = Vec::new();
        if let Some((msg, color)) = &self.notice {
            lines.push(notice_line(msg, *color));
        }
        lines.push(Line::from(Span::styled(
            hints.to_string(),
            Style::default().fg(Color::DarkGray),
        )));
        let p = Paragraph::new(lines).block(Block::default().borders(Borders::NONE));
        f.render_widget(p, area);
    }

    fn render_footer(
        &self,
        f: &mut Frame,
        area: Rect,
        key_rows: &[(&str, &str, &str, &str)],
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(3)])
            .split(area);

        if let Some((msg, color)) = &self.notice {
            f.render_widget(Paragraph::new(notice_line(msg, *color)), chunks[0]);
        }

        let rows: Vec<Row> = key_rows
            .iter()
            .map(|(k1, a1, k2, a2)| Row::new(vec![*k1, *a1, *k2, *a2]))
            .collect();
        let help_table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Length(26),
                Constraint::Length(12),
                Constraint::Length(26),
            ],
        )
        .block(Block::default().borders(Borders::NONE))
        .column_spacing(1);
        f.render_widget(help_table, chunks[1]);
    }

    fn money(&self, amount: f64) -> String {
        format!("{:.0} {}", amount, self.settings.currency)
    }
}

// ── Row construction helpers ──────────────────────────────────────────────────

/// A data row with a two-space indent on the label.
fn data_row(label: impl Into<String>, value: Cell<'static>) -> Row<'static> {
    Row::new(vec![Cell::from(format!("  {}", label.into())), value])
}

/// Plain (unstyled) cell.
fn plain(s: impl Into<String>) -> Cell<'static> {
    Cell::from(s.into())
}

/// Colored cell.
fn colored(s: impl Into<String>, color: Color) -> Cell<'static> {
    Cell::from(s.into()).style(Style::default().fg(color))
}

fn notice_line(msg: &str, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            "[ info ] ",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            msg.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|f| app.render(f))?;
        if event::poll(StdDuration::from_millis(16))? {
            if let CEvent::Key(key) = event::read()? {
                if app.handle_key(key.code, key.modifiers) {
                    break;
                }
            }
        }
    }
    Ok(())
}

// ── Style and form helpers ────────────────────────────────────────────────────

fn status_color(status: VehicleStatus) -> Color {
    match status {
        VehicleStatus::Available => AVAILABLE_COLOR,
        VehicleStatus::Rented => RENTED_COLOR,
    }
}

/// Determines the style for a calendar day cell from its classification.
pub(crate) fn day_cell_style(kind: DayKind, is_today: bool) -> Style {
    let mut style = match kind {
        DayKind::Rented => Style::default()
            .fg(RENTED_COLOR)
            .add_modifier(Modifier::BOLD),
        DayKind::Maintenance => Style::default()
            .fg(MAINTENANCE_COLOR)
            .add_modifier(Modifier::BOLD),
        DayKind::Free => Style::default(),
    };
    if is_today {
        style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
    }
    style
}

/// Rejects values that parse but are useless downstream (NaN, infinities).
fn parse_finite(s: &str) -> Result<f64, String> {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err("Invalid number".to_string()),
    }
}

/// Maps the eight ordered form fields into the typed vehicle record.
fn build_vehicle_form(bufs: &[String]) -> Result<VehicleForm, String> {
    if bufs.len() != VEHICLE_FIELDS.len() {
        return Err("Incomplete form".to_string());
    }
    Ok(VehicleForm {
        model: bufs[0].trim().to_string(),
        plate: bufs[1].trim().to_string(),
        status: bufs[2].parse()?,
        last_maintenance: NaiveDate::parse_from_str(bufs[3].trim(), "%Y-%m-%d")
            .map_err(|_| "Invalid date".to_string())?,
        lat: parse_finite(&bufs[4])?,
        lng: parse_finite(&bufs[5])?,
        revenue: parse_finite(&bufs[6])?,
        expenses: parse_finite(&bufs[7])?,
    })
}

fn build_rental_form(bufs: &[String]) -> Result<RentalForm, String> {
    if bufs.len() != RENTAL_FIELDS.len() {
        return Err("Incomplete form".to_string());
    }
    let start_date = NaiveDate::parse_from_str(bufs[2].trim(), "%Y-%m-%d")
        .map_err(|_| "Invalid start date".to_string())?;
    let end_date = NaiveDate::parse_from_str(bufs[3].trim(), "%Y-%m-%d")
        .map_err(|_| "Invalid end date".to_string())?;
    if end_date < start_date {
        return Err("End date before start date".to_string());
    }
    Ok(RentalForm {
        renter: bufs[0].trim().to_string(),
        start_date,
        end_date,
    })
}
