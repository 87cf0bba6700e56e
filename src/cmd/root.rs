use crate::data::{seed, AppSettings};
use crate::ui::dashboard_view::{run_app, App};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::Result;
use chrono::Local;

pub fn run() -> Result<()> {
    let settings = AppSettings::load()?;
    let today = Local::now().date_naive();

    // Domain data lives in memory only; it is seeded here and discarded on
    // exit. Only config.yaml persists between runs.
    let mut fleet = seed::demo_fleet(today);
    let mut reservations = seed::demo_reservations(today);
    let mut maintenance = seed::demo_maintenance(today);

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen
        );
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;

    let mut app = App::new(
        &mut fleet,
        &mut reservations,
        &mut maintenance,
        settings,
        today,
    );

    let result = run_app(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;

    // Extract settings before dropping app (which holds borrows on the data
    // fields), then write config back out.
    let final_settings = app.settings.clone();
    drop(app);
    final_settings.save()?;

    result
}
