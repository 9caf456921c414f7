use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use directory_core::{update, AppViewModel, Filter, GalleryKey, Msg, SearchSession};
use directory_engine::{
    EngineEvent, EngineHandle, EngineServices, PreviewInput, PreviewState, SubmissionRequest,
};
use directory_logging::{dir_info, dir_warn};

use super::config::AppConfig;
use super::effects::{event_to_msg, EffectRunner};
use super::render::{render_page, render_summary};

const POLL_INTERVAL: Duration = Duration::from_millis(20);
const SEARCH_DEADLINE: Duration = Duration::from_secs(60);

/// Owns the search session and feeds it messages from the user and the engine.
pub struct App {
    state: SearchSession,
    runner: EffectRunner,
}

impl App {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let services = EngineServices::local(&config.engine())
            .context("setting up engine services")?;
        Ok(Self {
            state: SearchSession::new(config.session()),
            runner: EffectRunner::new(EngineHandle::new(services)),
        })
    }

    /// Applies `msg` and runs the resulting effects. Returns whether the view changed.
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let dirty = state.consume_dirty();
        self.state = state;
        self.runner.run(effects);
        dirty
    }

    /// Waits up to `timeout` for one engine event and applies it. Returns
    /// `None` when nothing arrived, otherwise whether the view changed.
    pub fn pump(&mut self, timeout: Duration) -> Option<bool> {
        let event = self.runner.next_event(timeout)?;
        match event_to_msg(event) {
            Some(msg) => Some(self.dispatch(msg)),
            None => Some(false),
        }
    }

    /// Pumps until no search or debounce is pending, or the deadline passes.
    pub fn settle(&mut self, deadline: Duration) {
        let started = Instant::now();
        while self.state.is_searching() || self.state.has_pending_debounce() {
            if started.elapsed() >= deadline {
                dir_warn!("Gave up waiting for search token={}", self.state.current_token());
                break;
            }
            self.pump(POLL_INTERVAL);
        }
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn runner(&self) -> &EffectRunner {
        &self.runner
    }
}

fn write_output(out: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
            dir_info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

pub fn run_search(
    config: &AppConfig,
    query: &str,
    filter: Filter,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let mut app = App::new(config)?;
    app.dispatch(Msg::FilterSelected(filter));
    app.dispatch(Msg::InputChanged(query.to_string()));
    app.dispatch(Msg::SearchSubmitted);
    app.settle(SEARCH_DEADLINE);
    write_output(out, &render_page(&app.view()))
}

pub fn run_open(config: &AppConfig, location: &str, out: Option<&Path>) -> anyhow::Result<()> {
    let mut app = App::new(config)?;
    app.dispatch(Msg::LocationLoaded(location.to_string()));
    app.settle(SEARCH_DEADLINE);
    write_output(out, &render_page(&app.view()))
}

enum Input {
    Msg(Msg),
    Html(String),
    Quit,
    Unknown(String),
}

fn parse_line(line: &str) -> Input {
    let Some(command) = line.strip_prefix(':') else {
        return Input::Msg(Msg::InputChanged(line.to_string()));
    };
    let (name, arg) = command
        .split_once(' ')
        .map(|(name, arg)| (name, arg.trim()))
        .unwrap_or((command.trim(), ""));
    match name {
        "go" => Input::Msg(Msg::SearchSubmitted),
        "clear" => Input::Msg(Msg::InputChanged(String::new())),
        "filter" => match arg.parse::<Filter>() {
            Ok(filter) => Input::Msg(Msg::FilterSelected(filter)),
            Err(err) => Input::Unknown(err.to_string()),
        },
        "open" => match arg.parse::<usize>() {
            Ok(index) => Input::Msg(Msg::ImageActivated { index }),
            Err(_) => Input::Unknown(format!("not an index: {arg}")),
        },
        "next" => Input::Msg(Msg::GalleryNext),
        "prev" => Input::Msg(Msg::GalleryPrev),
        "left" => Input::Msg(Msg::GalleryKey(GalleryKey::Left)),
        "right" => Input::Msg(Msg::GalleryKey(GalleryKey::Right)),
        "esc" => Input::Msg(Msg::GalleryKey(GalleryKey::Escape)),
        "close" => Input::Msg(Msg::GalleryCloseRequested),
        "location" => Input::Msg(Msg::LocationLoaded(arg.to_string())),
        "html" if !arg.is_empty() => Input::Html(arg.to_string()),
        "quit" | "q" => Input::Quit,
        _ => Input::Unknown(format!("unknown command :{name}")),
    }
}

const HELP: &str = "type to search (debounced); :go submit, :clear, :filter all|images|websites|videos, \
:open N, :next, :prev, :left, :right, :esc, :close, :location ?q=..., :html FILE, :quit";

/// Line-driven session: stdin lines become messages, engine events are
/// pumped in between, and the summary is reprinted whenever the view changes.
pub fn run_interactive(config: &AppConfig) -> anyhow::Result<()> {
    let mut app = App::new(config)?;
    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    println!("{HELP}");
    loop {
        let mut changed = false;
        match line_rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => match parse_line(line.trim_end()) {
                Input::Msg(msg) => changed |= app.dispatch(msg),
                Input::Html(path) => write_output(Some(Path::new(&path)), &render_page(&app.view()))?,
                Input::Quit => break,
                Input::Unknown(message) => println!("{message}\n{HELP}"),
            },
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
        while let Some(dirty) = app.pump(Duration::ZERO) {
            changed |= dirty;
        }
        if changed {
            print!("{}", render_summary(&app.view()));
            if let Some(location) = app.runner().location() {
                println!("location: {location}");
            }
            if app.runner().scroll_locked() {
                println!("(scroll locked)");
            }
        }
    }
    Ok(())
}

pub fn run_submit(config: &AppConfig, request: SubmissionRequest) -> anyhow::Result<bool> {
    let app = App::new(config)?;
    let kind = request.kind();
    app.runner().submit(request);

    let started = Instant::now();
    while started.elapsed() < SEARCH_DEADLINE {
        if let Some(EngineEvent::SubmitFinished { result, .. }) =
            app.runner().next_event(POLL_INTERVAL)
        {
            return Ok(match result {
                Ok(receipt) => {
                    println!("{}", receipt.user_message());
                    if let Some(media) = receipt.media_url {
                        println!("media: {media}");
                    }
                    true
                }
                Err(err) => {
                    dir_warn!("Submission failed: {}", err);
                    println!("{}", err.user_message(kind));
                    false
                }
            });
        }
    }
    anyhow::bail!("submission did not finish within {:?}", SEARCH_DEADLINE)
}

pub fn run_preview(config: &AppConfig, input: PreviewInput) -> anyhow::Result<()> {
    let app = App::new(config)?;
    if input.link.trim().is_empty() && input.image_url.trim().is_empty() {
        println!("Enter an image URL or website link to preview.");
        return Ok(());
    }
    if input.image_url.trim().is_empty() {
        println!("Searching for site favicon...");
    }
    app.runner().preview(input);

    let budget = config.preview_budget();
    let started = Instant::now();
    while started.elapsed() < budget {
        if let Some(EngineEvent::Preview(report)) = app.runner().next_event(POLL_INTERVAL) {
            match report.state {
                PreviewState::Valid(url) => println!("{url}"),
                state => println!("{state}"),
            }
            return Ok(());
        }
    }
    anyhow::bail!("preview did not finish within {:?}", budget)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(line: &str) -> Msg {
        match parse_line(line) {
            Input::Msg(msg) => msg,
            _ => panic!("expected a message for {line:?}"),
        }
    }

    #[test]
    fn plain_lines_are_typed_input() {
        assert_eq!(msg("cats and dogs"), Msg::InputChanged("cats and dogs".into()));
        assert_eq!(msg(":go"), Msg::SearchSubmitted);
    }

    #[test]
    fn commands_take_arguments() {
        assert_eq!(msg(":filter images"), Msg::FilterSelected(Filter::Images));
        assert_eq!(msg(":open 3"), Msg::ImageActivated { index: 3 });
        assert_eq!(msg(":esc"), Msg::GalleryKey(GalleryKey::Escape));
        assert!(matches!(parse_line(":filter nope"), Input::Unknown(_)));
        assert!(matches!(parse_line(":open x"), Input::Unknown(_)));
        assert!(matches!(parse_line(":quit"), Input::Quit));
    }
}
