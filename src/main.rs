mod logger;
mod screen;
mod style;
mod widget;

use std::path::PathBuf;
use std::sync::Arc;

use data::{Config, PriceChart, Selection, Series};
use enum_map::EnumMap;
use feed::StockRecord;
use iced::widget::{center, column, container};
use iced::{Color, Element, Size, Task, Theme};

use screen::controls;
use widget::chart::StockChart;

const WINDOW_SIZE: Size = Size::new(780.0, 600.0);

fn main() -> iced::Result {
    if let Err(e) = logger::setup(cfg!(debug_assertions)) {
        eprintln!("Failed to initialize logger: {e}");
    }

    iced::application(App::new, App::update, App::view)
        .title("Stockline")
        .theme(App::theme)
        .window_size(WINDOW_SIZE)
        .run()
}

#[derive(Debug, Clone)]
enum Message {
    Controls(controls::Message),
}

struct App {
    records: Arc<[StockRecord]>,
    selection: Selection,
    chart: PriceChart,
    colors: EnumMap<Series, Color>,
    theme: data::Theme,
}

impl App {
    fn new() -> (Self, Task<Message>) {
        let config = Config::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {e}");
            Config::default()
        });

        let records = load_records(&config);
        let selection = config.selection();
        log::info!(
            "Starting on {} {} with the {} theme",
            selection.company,
            selection.month,
            config.theme.name()
        );

        let app = Self {
            chart: PriceChart::new(Arc::clone(&records), selection),
            records,
            selection,
            colors: config.series_colors(),
            theme: config.theme,
        };

        (app, Task::none())
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Controls(msg) => {
                controls::update(&mut self.selection, msg);
                self.chart.sync(&self.records, self.selection);
            }
        }

        Task::none()
    }

    fn view(&self) -> Element<'_, Message> {
        let chart = container(StockChart::new(&self.chart, self.colors))
            .style(style::chart_surface);

        let content = column![
            controls::view(self.selection).map(Message::Controls),
            chart,
        ]
        .spacing(16);

        center(content).padding(20).into()
    }

    fn theme(&self) -> Theme {
        self.theme.clone().into()
    }
}

/// CSV path from the first CLI argument, else from the config.
fn data_path(config: &Config) -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.data_path.clone())
}

fn load_records(config: &Config) -> Arc<[StockRecord]> {
    let Some(path) = data_path(config) else {
        log::warn!("No data file given; pass a CSV path or set data_path in the config");
        return Arc::from(Vec::new());
    };

    match feed::load_records(&path) {
        Ok(records) => records.into(),
        Err(e) => {
            log::error!("Failed to load {}: {e}", path.display());
            Arc::from(Vec::new())
        }
    }
}
